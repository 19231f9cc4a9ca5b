//! On-disk footprint of an artifact directory.

use crate::error::{BenchError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Bytes per reported megabyte (binary megabyte).
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Sum the byte size of every file under `root`.
///
/// Directories are walked recursively. Symlinked files count with the size
/// of their target; symlinked directories are not descended. A plain file
/// `root` yields its own size. The model is never loaded.
///
/// # Errors
///
/// Returns [`BenchError::ArtifactNotFound`] if `root` does not exist, or an
/// I/O error if a directory cannot be read.
pub fn footprint_bytes(root: &Path) -> Result<u64> {
    let meta = fs::metadata(root).map_err(|_| BenchError::ArtifactNotFound {
        path: root.to_path_buf(),
    })?;
    if meta.is_file() {
        return Ok(meta.len());
    }
    let total = dir_bytes(root)?;
    debug!(path = %root.display(), bytes = total, "artifact footprint");
    Ok(total)
}

/// [`footprint_bytes`] converted to megabytes.
///
/// # Errors
///
/// Same as [`footprint_bytes`].
pub fn footprint_mb(root: &Path) -> Result<f64> {
    footprint_bytes(root).map(|b| b as f64 / BYTES_PER_MB)
}

fn dir_bytes(dir: &Path) -> Result<u64> {
    let mut total = 0_u64;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            total += dir_bytes(&path)?;
        } else if file_type.is_file() {
            total += entry.metadata()?.len();
        } else if file_type.is_symlink() {
            // Dangling links contribute nothing.
            if let Ok(target) = fs::metadata(&path)
                && target.is_file()
            {
                total += target.len();
            }
        }
    }
    Ok(total)
}
