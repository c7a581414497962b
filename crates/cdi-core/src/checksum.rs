//! Checksum validation of downloaded archives.
//!
//! Digests are computed on demand from the cached file, in chunks, and
//! compared case-sensitively against the caller-supplied set.

use crate::error::{InstallError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const BUF_SIZE: usize = 64 * 1024;

/// Digest algorithm used for archive checksums. Published driver checksums are MD5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl ChecksumAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            ChecksumAlgorithm::Md5 => "md5",
            ChecksumAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown checksum algorithm {0:?} (expected md5 or sha256)")]
pub struct ParseAlgorithmError(String);

impl FromStr for ChecksumAlgorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(ChecksumAlgorithm::Md5),
            "sha256" | "sha-256" => Ok(ChecksumAlgorithm::Sha256),
            _ => Err(ParseAlgorithmError(s.to_string())),
        }
    }
}

/// Hash `path` with `D` and return the digest as lowercase hex.
fn hash_file<D: Digest>(path: &Path) -> Result<String> {
    let mut f = File::open(path).map_err(|e| InstallError::io(path, e))?;
    let mut hasher = D::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf).map_err(|e| InstallError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compute the digest of a file with `algorithm`, as lowercase hex.
pub fn digest_path(path: &Path, algorithm: ChecksumAlgorithm) -> Result<String> {
    match algorithm {
        ChecksumAlgorithm::Md5 => hash_file::<md5::Md5>(path),
        ChecksumAlgorithm::Sha256 => hash_file::<Sha256>(path),
    }
}

/// Acceptable archive digests, in caller order. Empty means "skip verification".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumSet {
    entries: Vec<String>,
}

impl ChecksumSet {
    /// Parses a comma-separated list; entries are trimmed and empty ones dropped.
    pub fn parse(list: &str) -> Self {
        Self::from_entries(list.split(','))
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        ChecksumSet { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn matches(&self, digest: &str) -> bool {
        self.entries.iter().any(|c| c == digest)
    }

    /// Verifies `path` against the set. Returns the computed digest, or `None`
    /// when the set is empty and nothing was hashed.
    pub fn verify(&self, path: &Path, algorithm: ChecksumAlgorithm) -> Result<Option<String>> {
        if self.is_empty() {
            tracing::debug!(path = %path.display(), "no checksums given, skipping verification");
            return Ok(None);
        }
        let actual = digest_path(path, algorithm)?;
        if self.matches(&actual) {
            tracing::debug!(%algorithm, digest = %actual, "checksum accepted");
            return Ok(Some(actual));
        }
        Err(InstallError::ChecksumMismatch {
            algorithm: algorithm.as_str(),
            actual,
            expected: self.entries.clone(),
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HELLO_MD5: &str = "b1946ac92492d2347c6235b4d2611184";
    const HELLO_SHA256: &str = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03";

    fn hello_file() -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn digest_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(
            digest_path(f.path(), ChecksumAlgorithm::Md5).unwrap(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            digest_path(f.path(), ChecksumAlgorithm::Sha256).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_known_content() {
        let f = hello_file();
        assert_eq!(digest_path(f.path(), ChecksumAlgorithm::Md5).unwrap(), HELLO_MD5);
        assert_eq!(
            digest_path(f.path(), ChecksumAlgorithm::Sha256).unwrap(),
            HELLO_SHA256
        );
    }

    #[test]
    fn digest_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = digest_path(&dir.path().join("absent.zip"), ChecksumAlgorithm::Md5).unwrap_err();
        assert!(matches!(err, InstallError::Io { .. }));
    }

    #[test]
    fn parse_trims_and_drops_empty_entries() {
        let set = ChecksumSet::parse(" foo, bar ,,baz,");
        assert_eq!(set.entries(), ["foo", "bar", "baz"]);
        assert!(ChecksumSet::parse("").is_empty());
        assert!(ChecksumSet::parse(" , ").is_empty());
    }

    #[test]
    fn empty_set_skips_verification() {
        let dir = tempfile::tempdir().unwrap();
        // Not even opened.
        let missing = dir.path().join("absent.zip");
        assert_eq!(
            ChecksumSet::default()
                .verify(&missing, ChecksumAlgorithm::Md5)
                .unwrap(),
            None
        );
    }

    #[test]
    fn any_matching_entry_is_accepted() {
        let f = hello_file();
        let set = ChecksumSet::from_entries(["nope", HELLO_MD5, "other"]);
        assert_eq!(
            set.verify(f.path(), ChecksumAlgorithm::Md5).unwrap().as_deref(),
            Some(HELLO_MD5)
        );
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let f = hello_file();
        let set = ChecksumSet::from_entries([HELLO_MD5.to_ascii_uppercase()]);
        assert!(matches!(
            set.verify(f.path(), ChecksumAlgorithm::Md5),
            Err(InstallError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn mismatch_message_lists_rejected_checksums() {
        let f = hello_file();
        let err = ChecksumSet::parse("foo,bar,baz")
            .verify(f.path(), ChecksumAlgorithm::Md5)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("matches none of the checksums foo, bar, baz!"), "{msg}");
        assert!(msg.contains(HELLO_MD5));
    }

    #[test]
    fn algorithm_parses_from_str() {
        assert_eq!("MD5".parse::<ChecksumAlgorithm>().unwrap(), ChecksumAlgorithm::Md5);
        assert_eq!(
            "sha-256".parse::<ChecksumAlgorithm>().unwrap(),
            ChecksumAlgorithm::Sha256
        );
        assert!("crc32".parse::<ChecksumAlgorithm>().is_err());
    }
}
