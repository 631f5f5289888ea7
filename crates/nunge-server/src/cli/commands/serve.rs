//! `nunge serve` – run the HTTP endpoint.

use anyhow::{Context, Result};
use nunge_core::config::NungeConfig;
use nunge_core::fetcher::ImageFetcher;
use tokio::net::TcpListener;

use crate::api::{self, AppState};

pub async fn run_serve(cfg: &NungeConfig, bind: Option<&str>) -> Result<()> {
    let fetcher = ImageFetcher::from_config(cfg)?;
    fetcher
        .ensure_public_dir()
        .await
        .with_context(|| format!("cannot create {}", fetcher.public_dir().display()))?;
    let public_dir = fetcher.public_dir().to_path_buf();
    let max_concurrent = fetcher.max_concurrent();

    let app = api::router(AppState { fetcher });

    let address = bind.unwrap_or(&cfg.bind_addr);
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(
        public_dir = %public_dir.display(),
        max_concurrent,
        "server listening on {address}"
    );
    println!("Listening on http://{address}");

    api::serve(listener, app).await.context("server error")?;
    tracing::info!("server shut down");
    Ok(())
}
