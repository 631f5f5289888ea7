//! Disk side of a fetch: stage the body in a temp file next to the target,
//! then atomically rename it into place.
//!
//! Readers of the public directory only ever see complete files. Concurrent
//! fetches of the same name each get their own temp file, so the final path
//! is replaced whole by whichever rename lands last.

mod staged;

pub use staged::StagedFile;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Unique temp path beside `final_path`: `a.png` → `a.png.<pid>-<seq>.part`.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut o = final_path.as_os_str().to_owned();
    o.push(format!(".{}-{}{}", std::process::id(), seq, TEMP_SUFFIX));
    PathBuf::from(o)
}

/// True if `path` names a temp file produced by `temp_path`.
pub fn is_temp_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(TEMP_SUFFIX))
}
