use std::io;
use thiserror::Error;

use crate::transport::TransportError;

/// Why a single image could not be materialized.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("filename {0:?} is not a plain file name")]
    InvalidFilename(String),
    #[error("unsupported url {0:?} (only http and https are fetched)")]
    UnsupportedUrl(String),
    #[error("HTTP {0}")]
    HttpStatus(u32),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("storage: {0}")]
    Storage(#[from] io::Error),
    /// The blocking download task panicked or was cancelled.
    #[error("fetch task failed: {0}")]
    Task(String),
}

impl DownloadError {
    /// Status code for `HttpStatus`, if that is what this is.
    pub fn status(&self) -> Option<u32> {
        match self {
            DownloadError::HttpStatus(code) => Some(*code),
            _ => None,
        }
    }
}
