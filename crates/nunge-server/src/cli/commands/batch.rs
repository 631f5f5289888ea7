//! `nunge batch <file.json>` – materialize a list of images.

use anyhow::{Context, Result};
use nunge_core::config::NungeConfig;
use nunge_core::descriptor::ImageDescriptor;
use nunge_core::fetcher::ImageFetcher;
use serde::Deserialize;
use std::path::Path;

/// Either a bare array or the HTTP request shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchFile {
    List(Vec<ImageDescriptor>),
    Request { images: Vec<ImageDescriptor> },
}

pub(crate) fn parse_batch_file(data: &str) -> Result<Vec<ImageDescriptor>> {
    let parsed: BatchFile =
        serde_json::from_str(data).context("expected a descriptor array or {\"images\": [...]}")?;
    Ok(match parsed {
        BatchFile::List(images) | BatchFile::Request { images } => images,
    })
}

pub async fn run_batch(cfg: &NungeConfig, path: &Path) -> Result<()> {
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let images = parse_batch_file(&data)?;

    let fetcher = ImageFetcher::from_config(cfg)?;
    let outcomes = fetcher.fetch_batch_detailed(&images).await;
    println!("{}", serde_json::to_string_pretty(&outcomes)?);
    Ok(())
}
