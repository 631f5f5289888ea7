//! CLI for the Nunge image ingestion service.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nunge_core::config::{self, NungeConfig};
use nunge_core::logging::{self, LogOptions};
use std::path::PathBuf;

use commands::{run_batch, run_fetch, run_serve, run_show_config};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "nunge")]
#[command(about = "Nunge Returns image ingestion: localize remote blog images", long_about = None)]
pub struct Cli {
    /// Override the public image directory from config.
    #[arg(long, global = true, value_name = "DIR")]
    pub public_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the HTTP endpoint (`POST /api/download-images`).
    Serve {
        /// Listen address, e.g. 127.0.0.1:3000 (default from config).
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Materialize a single image and print its public path.
    Fetch {
        /// Remote http(s) URL.
        url: String,
        /// Local file name under the public directory.
        filename: String,
    },

    /// Materialize every descriptor in a JSON file and print per-image outcomes.
    Batch {
        /// JSON file: `[{"url","filename"}, ...]` or `{"images": [...]}`.
        path: PathBuf,
    },

    /// Print the effective configuration as TOML.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        if let Some(dir) = cli.public_dir {
            cfg.public_dir = dir;
        }
        // The server echoes to the terminal; one-shot commands keep stdout
        // clean for their output and log to the file only.
        init_logging(&cfg, matches!(cli.command, CliCommand::Serve { .. }));
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Serve { bind } => run_serve(&cfg, bind.as_deref()).await?,
            CliCommand::Fetch { url, filename } => run_fetch(&cfg, &url, &filename).await?,
            CliCommand::Batch { path } => run_batch(&cfg, &path).await?,
            CliCommand::Config => run_show_config(&cfg)?,
        }

        Ok(())
    }
}

fn init_logging(cfg: &NungeConfig, echo_stderr: bool) {
    let opts = LogOptions::from_env(cfg.log_file.clone(), echo_stderr);
    if let Err(e) = logging::init_logging(&opts) {
        logging::init_logging_stderr(&opts.filter);
        tracing::warn!("file logging unavailable ({:#}), logging to stderr", e);
    }
}
