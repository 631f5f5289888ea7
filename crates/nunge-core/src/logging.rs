//! Subscriber setup: one log file (configured, or under the XDG state dir)
//! plus an optional stderr echo for the foreground server.
//!
//! The file layer records span closes, so each `TraceLayer` request span ends
//! up in the log with its timing next to the fetch events it enclosed.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter directive env var, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "NUNGE_LOG";

const DEFAULT_FILTER: &str = "info,nunge=debug,nunge_core=debug,nunge_server=debug,tower_http=debug";

#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Log file; `None` means `$XDG_STATE_HOME/nunge/nunge.log`.
    pub file: Option<PathBuf>,
    /// `EnvFilter` directives.
    pub filter: String,
    /// Also write human-readable events to stderr.
    pub echo_stderr: bool,
}

impl LogOptions {
    /// Options for `file`, with the filter taken from the process environment.
    pub fn from_env(file: Option<PathBuf>, echo_stderr: bool) -> Self {
        Self {
            file,
            filter: filter_directives(|key| std::env::var(key).ok()),
            echo_stderr,
        }
    }
}

/// `NUNGE_LOG`, else `RUST_LOG`, else the built-in default. Empty values are
/// skipped.
pub fn filter_directives<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    [LOG_ENV, "RUST_LOG"]
        .iter()
        .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Where the log file goes: `configured` if set, else the XDG state dir.
pub fn log_path(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }
    let xdg_dirs = xdg::BaseDirectories::with_prefix("nunge")?;
    Ok(xdg_dirs.get_state_home().join("nunge").join("nunge.log"))
}

fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|e| {
        eprintln!("nunge: ignoring bad log filter {directives:?}: {e}");
        EnvFilter::new(DEFAULT_FILTER)
    })
}

/// Install the global subscriber. Returns the log file in use. Fails if the
/// file cannot be opened or a subscriber is already set, so the caller can
/// fall back to `init_logging_stderr`.
pub fn init_logging(opts: &LogOptions) -> Result<PathBuf> {
    let path = log_path(opts.file.as_deref())?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE);
    let stderr_layer = opts
        .echo_stderr
        .then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(build_filter(&opts.filter))
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already set: {}", e))?;

    tracing::info!("nunge logging initialized at {}", path.display());
    Ok(path)
}

/// Stderr-only logging, used when the log file is unusable.
pub fn init_logging_stderr(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(filter))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
