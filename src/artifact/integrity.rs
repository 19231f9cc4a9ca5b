//! Model file digest verification.
//!
//! When a variant is configured with an expected SHA-256 digest, the model
//! file is hashed before loading. A mismatch means the artifact on disk is
//! not the one the comparison was configured for, and is reported as
//! [`BenchError::ArtifactCorrupt`].

use crate::error::{BenchError, Result};
use sha2::{Digest, Sha256};
use std::io::{self, Read};
use std::path::Path;
use tracing::{info, warn};

/// Compute the SHA-256 hex digest of a file's contents.
///
/// Reads the file in 64 KiB chunks so large model files are never held in
/// memory all at once.
///
/// # Errors
///
/// Returns an `io::Error` if the file cannot be opened or read.
pub fn sha256_hex(path: &Path) -> io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 65_536];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let digest = hasher.finalize();
    Ok(format!("{digest:x}"))
}

/// Check `path` against an expected hex digest (case-insensitive).
///
/// # Errors
///
/// Returns [`BenchError::ArtifactNotFound`] if the file cannot be read and
/// [`BenchError::ArtifactCorrupt`] if the digest does not match.
pub fn verify_sha256(path: &Path, expected: &str) -> Result<()> {
    let actual = sha256_hex(path).map_err(|_| BenchError::ArtifactNotFound {
        path: path.to_path_buf(),
    })?;
    if actual.eq_ignore_ascii_case(expected.trim()) {
        info!(path = %path.display(), "model digest ok");
        Ok(())
    } else {
        warn!(
            path = %path.display(),
            expected,
            actual = %actual,
            "model digest mismatch"
        );
        Err(BenchError::ArtifactCorrupt {
            path: path.to_path_buf(),
            reason: format!("sha256 mismatch: expected {expected}, got {actual}"),
        })
    }
}
