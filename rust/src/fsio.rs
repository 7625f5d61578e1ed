//! Filesystem helpers for the two sealed files.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;
use tracing::warn;

/// `Ok(false)` only when the path does not exist; every other failure is
/// returned so callers can tell "absent" from "unreadable".
pub(crate) fn exists(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Replaces `path` with `contents` in full. The bytes go to a sibling temp
/// file which is then renamed over the target, so readers never see a
/// partially written file.
pub(crate) fn replace(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = Builder::new()
        .prefix(".sealed-config.")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Removes a file created by a start-up that went on to fail.
pub(crate) fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %err, "could not remove file left by failed start-up");
    }
}
