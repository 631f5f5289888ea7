//! HTTP transport seam.
//!
//! The fetcher only needs "GET this URL, stream the body somewhere, tell me the
//! status". Implementations are blocking and are driven from
//! `tokio::task::spawn_blocking`.

mod curl_easy;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use curl_easy::CurlTransport;

use std::io;
use thiserror::Error;

/// Failure below the HTTP status level.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("connection failed: {0}")]
    Connection(String),
    /// The body could not be written to the sink (disk full, permissions).
    #[error("writing response body failed: {0}")]
    Sink(#[source] io::Error),
}

pub trait Transport: Send + Sync {
    /// Issue a GET for `url`, streaming whatever body arrives into `sink`, and
    /// return the HTTP status. Redirects are not followed, so a 3xx comes back
    /// as-is. Non-2xx bodies are written too; the caller decides what to keep.
    fn get(&self, url: &str, sink: &mut dyn io::Write) -> Result<u32, TransportError>;
}
