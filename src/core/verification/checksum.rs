//! Checksum calculation for artifact verification
//!
//! Generated files are hashed with SHA-256 when they are recorded in the
//! export summary and hashed again when a summary is verified.

use crate::domain::Result;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Calculate SHA-256 checksum of raw bytes
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
///
/// # Examples
///
/// ```
/// use ocpgen::core::verification::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"#define ACADO_N 20\n");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}

/// Calculate SHA-256 checksum of a file's contents
///
/// # Errors
///
/// Returns an error if the file cannot be read
pub fn file_checksum(path: &Path) -> Result<String> {
    let data = fs::read(path)?;
    Ok(calculate_checksum_bytes(&data))
}
