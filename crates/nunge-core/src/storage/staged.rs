//! Sequential writer for a staged download.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Temp file receiving a response body. `finalize` renames it onto the real
/// path; anything else (`discard`, an early return, a panic unwinding through
/// the writer) removes it on drop.
pub struct StagedFile {
    file: Option<BufWriter<File>>,
    temp_path: PathBuf,
    written: u64,
    committed: bool,
}

impl StagedFile {
    /// Create (or truncate) the temp file at `temp_path`.
    pub fn create(temp_path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)?;
        Ok(Self {
            file: Some(BufWriter::new(file)),
            temp_path: temp_path.to_path_buf(),
            written: 0,
            committed: false,
        })
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("staged file already closed"))
    }

    /// Flush buffered data and fsync.
    pub fn sync(&mut self) -> io::Result<()> {
        let file = self.writer()?;
        file.flush()?;
        file.get_ref().sync_all()
    }

    /// Sync, close, and rename onto `final_path`. Returns bytes written.
    /// On error the temp file is removed.
    pub fn finalize(mut self, final_path: &Path) -> io::Result<u64> {
        self.sync()?;
        // Close before rename.
        drop(self.file.take());
        std::fs::rename(&self.temp_path, final_path)?;
        self.committed = true;
        Ok(self.written)
    }

    /// Close and delete the temp file; the removal happens in `Drop`.
    pub fn discard(self) {}
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        drop(self.file.take());
        if let Err(e) = std::fs::remove_file(&self.temp_path) {
            tracing::debug!("could not remove {}: {}", self.temp_path.display(), e);
        }
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.writer()?.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer()?.flush()
    }
}
