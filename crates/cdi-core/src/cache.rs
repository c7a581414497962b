//! Archive cache: one zip per version at a deterministic path.
//!
//! A file at the cache path means "already downloaded". The fetcher only
//! ever renames complete downloads onto that path.

use crate::error::{InstallError, Result};
use crate::fetch::{self, FetchOptions};
use crate::resolver::Version;
use std::path::{Path, PathBuf};

const CACHE_PREFIX: &str = "chromedriver_";
const CACHE_SUFFIX: &str = ".zip";

/// Cache path for `version` under `cache_dir`, e.g. `/tmp/chromedriver_2.21.zip`.
pub fn cache_path(cache_dir: &Path, version: &Version) -> PathBuf {
    cache_dir.join(format!("{}{}{}", CACHE_PREFIX, version, CACHE_SUFFIX))
}

/// Whether `ensure_cached` reused the file or downloaded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Fetched { bytes: u64 },
}

impl CacheOutcome {
    pub fn is_hit(self) -> bool {
        matches!(self, CacheOutcome::Hit)
    }
}

/// Downloads `url` to `path` unless `path` already exists.
pub fn ensure_cached(url: &str, path: &Path, opts: &FetchOptions) -> Result<CacheOutcome> {
    if path.is_file() {
        tracing::debug!(path = %path.display(), "archive already cached");
        return Ok(CacheOutcome::Hit);
    }
    let bytes = fetch::fetch_to_path(url, path, opts)?;
    Ok(CacheOutcome::Fetched { bytes })
}

/// Removes the cached archive for `version`. Returns whether a file was removed.
pub fn remove_cached(cache_dir: &Path, version: &Version) -> Result<bool> {
    remove_if_present(&cache_path(cache_dir, version))
}

/// Removes every cached archive under `cache_dir`. Returns the removed paths.
pub fn remove_all_cached(cache_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for (_, path) in cached_versions(cache_dir)? {
        if remove_if_present(&path)? {
            removed.push(path);
        }
    }
    Ok(removed)
}

/// Lists `(version, path)` of cached archives under `cache_dir`, sorted by path.
pub fn cached_versions(cache_dir: &Path) -> Result<Vec<(Version, PathBuf)>> {
    let entries = match std::fs::read_dir(cache_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(InstallError::io(cache_dir, e)),
    };
    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| InstallError::io(cache_dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(version) = name
            .strip_prefix(CACHE_PREFIX)
            .and_then(|rest| rest.strip_suffix(CACHE_SUFFIX))
            .and_then(|v| v.parse::<Version>().ok())
        else {
            continue;
        };
        let path = entry.path();
        if path.is_file() {
            found.push((version, path));
        }
    }
    found.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(found)
}

pub(crate) fn remove_if_present(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed file");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(InstallError::io(path, e)),
    }
}
