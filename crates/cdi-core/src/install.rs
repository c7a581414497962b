//! Install pipeline: resolve → download-or-reuse-cache → verify → extract.

use crate::cache::{self, CacheOutcome};
use crate::checksum::{ChecksumAlgorithm, ChecksumSet};
use crate::config::InstallerConfig;
use crate::error::{InstallError, Result};
use crate::fetch::FetchOptions;
use crate::resolver::{self, Platform, Version};
use crate::status;
use crate::unpack;
use std::path::{Path, PathBuf};

/// Everything one install needs. Build with [`InstallRequest::new`] and
/// override fields as required.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub version: Version,
    pub checksums: ChecksumSet,
    pub algorithm: ChecksumAlgorithm,
    pub platform: Platform,
    pub base_url: String,
    pub cache_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub fetch: FetchOptions,
    /// Drop any cached archive and download again.
    pub force: bool,
    /// Run the installed driver and require it to report `version`.
    pub verify_version: bool,
}

impl InstallRequest {
    pub fn new(version: Version, bin_dir: PathBuf, cfg: &InstallerConfig) -> Self {
        Self {
            platform: Platform::current(&version),
            version,
            checksums: ChecksumSet::default(),
            algorithm: cfg.checksum_algorithm,
            base_url: cfg.base_url.clone(),
            cache_dir: cfg.cache_dir(),
            bin_dir,
            fetch: FetchOptions::from(cfg),
            force: false,
            verify_version: false,
        }
    }
}

/// What an install did.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub version: Version,
    pub url: String,
    pub archive: PathBuf,
    pub cache: CacheOutcome,
    /// Digest of the archive; `None` when no checksums were given.
    pub digest: Option<String>,
    pub executable: PathBuf,
}

/// Runs the full pipeline for `req`.
///
/// A checksum mismatch or an unreadable archive deletes the cached archive
/// before failing, so the next attempt downloads again. The version check
/// runs on the staged executable, so a mismatch keeps the previous install.
pub fn install(req: &InstallRequest) -> Result<InstallReport> {
    let url = resolver::download_url(&req.base_url, &req.version, req.platform)?;
    let archive = cache::cache_path(&req.cache_dir, &req.version);
    tracing::info!(version = %req.version, platform = %req.platform, %url, "installing chromedriver");

    if req.force && cache::remove_if_present(&archive)? {
        tracing::info!(path = %archive.display(), "discarded cached archive");
    }

    let outcome = cache::ensure_cached(&url, &archive, &req.fetch)?;

    let digest = match req.checksums.verify(&archive, req.algorithm) {
        Ok(d) => d,
        Err(err @ InstallError::ChecksumMismatch { .. }) => {
            discard_rejected(&archive);
            return Err(err);
        }
        Err(e) => return Err(e),
    };

    let installed = if req.verify_version {
        unpack::install_executable_checked(&archive, &req.bin_dir, |staged| {
            verify_installed_version(staged, &req.version)
        })
    } else {
        unpack::install_executable(&archive, &req.bin_dir)
    };
    let executable = match installed {
        Ok(path) => path,
        Err(err @ InstallError::Archive { .. }) => {
            discard_rejected(&archive);
            return Err(err);
        }
        Err(e) => return Err(e),
    };

    Ok(InstallReport {
        version: req.version.clone(),
        url,
        archive,
        cache: outcome,
        digest,
        executable,
    })
}

fn discard_rejected(archive: &Path) {
    match cache::remove_if_present(archive) {
        Ok(_) => tracing::debug!(path = %archive.display(), "removed rejected archive"),
        Err(e) => tracing::warn!("could not remove rejected archive: {}", e),
    }
}

fn verify_installed_version(executable: &Path, version: &Version) -> Result<()> {
    let reported = status::reported_version(executable)?.unwrap_or_default();
    if !status::version_matches(&reported, version) {
        return Err(InstallError::VersionMismatch {
            expected: version.to_string(),
            reported,
        });
    }
    tracing::debug!(%reported, "installed driver reports expected version");
    Ok(())
}

/// Picks the install directory: explicit choice, then config, then the
/// active virtualenv's script directory.
pub fn resolve_bin_dir(explicit: Option<&Path>, cfg: &InstallerConfig) -> Result<PathBuf> {
    if let Some(dir) = explicit.or(cfg.bin_dir.as_deref()) {
        return Ok(dir.to_path_buf());
    }
    let venv = std::env::var_os("VIRTUAL_ENV").filter(|v| !v.is_empty());
    venv.map(|v| virtualenv_bin_dir(Path::new(&v)))
        .ok_or(InstallError::NoBinDir)
}

/// `bin` (or `Scripts` on Windows) under a virtualenv root.
pub fn virtualenv_bin_dir(venv: &Path) -> PathBuf {
    if cfg!(windows) {
        venv.join("Scripts")
    } else {
        venv.join("bin")
    }
}
