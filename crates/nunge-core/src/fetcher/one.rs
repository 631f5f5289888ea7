//! Single-image path: cache check, then GET into a staged file.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{DownloadError, ImageFetcher};
use crate::filename::{is_contained_filename, is_fetchable_url};
use crate::retry::run_with_retry;
use crate::storage::{temp_path, StagedFile};
use crate::transport::Transport;

impl ImageFetcher {
    /// Create the public directory (and parents) if missing. Concurrent
    /// callers racing on creation all succeed.
    pub async fn ensure_public_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.public_dir).await
    }

    /// Cache check: `Some(local path)` if `filename` already exists as a
    /// regular file under the public directory.
    pub async fn cached_path(&self, filename: &str) -> Result<Option<String>, DownloadError> {
        if !is_contained_filename(filename) {
            return Err(DownloadError::InvalidFilename(filename.to_string()));
        }
        match tokio::fs::metadata(self.destination(filename)).await {
            Ok(meta) if meta.is_file() => Ok(Some(self.local_path(filename))),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DownloadError::Storage(e)),
        }
    }

    /// Make `url` available as `<public_dir>/<filename>` and return its public
    /// path. An existing file is returned as-is without touching the network.
    /// Only an HTTP 200 counts as success; the path is returned after the
    /// body is synced and renamed into place.
    pub async fn fetch_one(&self, url: &str, filename: &str) -> Result<String, DownloadError> {
        if !is_contained_filename(filename) {
            return Err(DownloadError::InvalidFilename(filename.to_string()));
        }
        self.ensure_public_dir().await?;

        if let Some(path) = self.cached_path(filename).await? {
            tracing::debug!(filename, "image already present, skipping fetch");
            return Ok(path);
        }

        if !is_fetchable_url(url) {
            return Err(DownloadError::UnsupportedUrl(url.to_string()));
        }

        let dest = self.destination(filename);
        let transport = Arc::clone(&self.transport);
        let permits = Arc::clone(&self.permits);
        // One permit per attempt, so retry backoff does not hold a slot.
        let bytes = run_with_retry(self.retry.as_ref(), || {
            let permits = Arc::clone(&permits);
            let download = download_staged(Arc::clone(&transport), url.to_string(), dest.clone());
            async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| DownloadError::Task(e.to_string()))?;
                download.await
            }
        })
        .await?;

        tracing::info!(url, filename, bytes, "image materialized");
        Ok(self.local_path(filename))
    }
}

async fn download_staged(
    transport: Arc<dyn Transport>,
    url: String,
    dest: PathBuf,
) -> Result<u64, DownloadError> {
    tokio::task::spawn_blocking(move || download_blocking(transport.as_ref(), &url, &dest))
        .await
        .map_err(|e| DownloadError::Task(e.to_string()))?
}

fn download_blocking(
    transport: &dyn Transport,
    url: &str,
    dest: &Path,
) -> Result<u64, DownloadError> {
    let mut staged = StagedFile::create(&temp_path(dest))?;
    let status = match transport.get(url, &mut staged) {
        Ok(status) => status,
        Err(e) => {
            staged.discard();
            return Err(e.into());
        }
    };
    if status != 200 {
        staged.discard();
        return Err(DownloadError::HttpStatus(status));
    }
    Ok(staged.finalize(dest)?)
}
