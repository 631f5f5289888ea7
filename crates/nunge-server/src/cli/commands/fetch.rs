//! `nunge fetch <url> <filename>` – materialize one image.

use anyhow::{Context, Result};
use nunge_core::config::NungeConfig;
use nunge_core::fetcher::ImageFetcher;

pub async fn run_fetch(cfg: &NungeConfig, url: &str, filename: &str) -> Result<()> {
    let fetcher = ImageFetcher::from_config(cfg)?;
    let path = fetcher
        .fetch_one(url, filename)
        .await
        .with_context(|| format!("fetching {url}"))?;
    println!("{path}");
    Ok(())
}
