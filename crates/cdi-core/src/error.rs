//! Error type shared by every install step.

use std::path::PathBuf;

/// Failure of one step of the install pipeline. Each attempt is all-or-nothing.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("invalid chromedriver version {0:?}: expected dot-separated numbers like 2.21")]
    InvalidVersion(String),

    #[error("invalid download URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Network or HTTP failure while fetching the archive.
    #[error("download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    /// The archive digest is not in the caller-supplied checksum set.
    #[error(
        "the {algorithm} checksum {actual} of {} matches none of the checksums {}!",
        .path.display(),
        .expected.join(", ")
    )]
    ChecksumMismatch {
        algorithm: &'static str,
        actual: String,
        expected: Vec<String>,
        path: PathBuf,
    },

    /// Corrupt archive, or archive without a driver entry.
    #[error("archive {}: {reason}", .path.display())]
    Archive { path: PathBuf, reason: String },

    #[error("installed chromedriver reports {reported:?}, expected version {expected}")]
    VersionMismatch { expected: String, reported: String },

    #[error("no binary directory: pass --bin-dir, set bin_dir in the config, or activate a virtualenv")]
    NoBinDir,

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InstallError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = InstallError> = std::result::Result<T, E>;
