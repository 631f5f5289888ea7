//! Request and result types shared by the fetcher and the HTTP boundary.

use serde::{Deserialize, Serialize};

/// A remote image and the local base name it should be stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub url: String,
    pub filename: String,
}

impl ImageDescriptor {
    pub fn new(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: filename.into(),
        }
    }
}

/// Where a batch entry's `path` points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// Served from this app's public directory.
    Local,
    /// Localization failed; `path` is the original remote URL.
    Fallback,
}

/// Per-item batch result. `path` is either a local path (`/blog/a.png`) or the
/// original URL, depending on `source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOutcome {
    pub path: String,
    pub source: ImageSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageOutcome {
    pub fn local(path: String) -> Self {
        Self {
            path,
            source: ImageSource::Local,
            error: None,
        }
    }

    pub fn fallback(url: &str, error: impl ToString) -> Self {
        Self {
            path: url.to_string(),
            source: ImageSource::Fallback,
            error: Some(error.to_string()),
        }
    }

    pub fn is_local(&self) -> bool {
        self.source == ImageSource::Local
    }
}

/// Joins a public URL prefix and a file name: `("/blog", "a.png")` → `"/blog/a.png"`.
pub fn local_path(url_prefix: &str, filename: &str) -> String {
    format!("{}/{}", url_prefix.trim_end_matches('/'), filename)
}
