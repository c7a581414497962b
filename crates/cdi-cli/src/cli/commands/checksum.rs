//! Checksum command: digest a file the way installs verify archives.

use anyhow::Result;
use cdi_core::checksum::{digest_path, ChecksumAlgorithm};
use std::path::Path;

/// Compute and print the digest of the given file.
pub fn run_checksum(path: &Path, algorithm: ChecksumAlgorithm) -> Result<()> {
    let digest = digest_path(path, algorithm)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
