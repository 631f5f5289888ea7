//! Image materialization: make each remote image available as a file under
//! the public directory, reusing whatever is already there.
//!
//! Per-item lifecycle: `PENDING → (CACHED | FETCHING) → (LOCAL_PATH | FALLBACK_URL)`.
//! A file's presence on disk is the only cache key; its content is never
//! compared against the URL it came from.

mod batch;
mod error;
mod one;

pub use error::DownloadError;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;

use crate::config::NungeConfig;
use crate::descriptor::local_path;
use crate::retry::RetryPolicy;
use crate::transport::{CurlTransport, Transport};

pub const DEFAULT_URL_PREFIX: &str = "/blog";
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Cheap to clone; clones share the transport and the transfer permits, so
/// `max_concurrent` bounds network transfers across every batch running
/// through the same fetcher, not just within one.
#[derive(Clone)]
pub struct ImageFetcher {
    public_dir: PathBuf,
    url_prefix: String,
    transport: Arc<dyn Transport>,
    max_concurrent: usize,
    permits: Arc<Semaphore>,
    retry: Option<RetryPolicy>,
}

impl std::fmt::Debug for ImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetcher")
            .field("public_dir", &self.public_dir)
            .field("url_prefix", &self.url_prefix)
            .field("max_concurrent", &self.max_concurrent)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl ImageFetcher {
    pub fn new(public_dir: impl Into<PathBuf>, transport: Arc<dyn Transport>) -> Self {
        Self {
            public_dir: public_dir.into(),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            transport,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            permits: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT)),
            retry: None,
        }
    }

    /// Fetcher over libcurl with directory, prefix, pool size, timeouts and
    /// retry taken from `cfg`. Fails if the retry section is unusable.
    pub fn from_config(cfg: &NungeConfig) -> Result<Self> {
        let mut fetcher = Self::new(
            cfg.public_dir.clone(),
            Arc::new(CurlTransport::from_config(cfg)),
        )
        .with_url_prefix(&cfg.url_prefix)
        .with_max_concurrent(cfg.max_concurrent_fetches);
        if let Some(retry) = &cfg.retry {
            fetcher = fetcher.with_retry_policy(retry.to_policy()?);
        }
        Ok(fetcher)
    }

    pub fn with_url_prefix(mut self, prefix: &str) -> Self {
        self.url_prefix = prefix.to_string();
        self
    }

    /// Upper bound on network transfers in flight across all clones of this
    /// fetcher. Zero is treated as one. Clones made before this call keep
    /// their old permits.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self.permits = Arc::new(Semaphore::new(self.max_concurrent));
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// On-disk destination for `filename`.
    pub fn destination(&self, filename: &str) -> PathBuf {
        self.public_dir.join(filename)
    }

    /// Public path for `filename`, e.g. `/blog/a.png`.
    pub fn local_path(&self, filename: &str) -> String {
        local_path(&self.url_prefix, filename)
    }
}
