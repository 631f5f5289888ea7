//! `nunge config` – print the effective configuration.

use anyhow::Result;
use nunge_core::config::{self, NungeConfig};

pub fn run_show_config(cfg: &NungeConfig) -> Result<()> {
    if let Ok(path) = config::config_path() {
        println!("# {}", path.display());
    }
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
