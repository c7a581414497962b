//! Remove the installed driver and its cached archives.

use crate::cache;
use crate::error::Result;
use crate::resolver::Version;
use crate::unpack::executable_path;
use std::path::{Path, PathBuf};

/// What `uninstall` removed. Missing files are skipped, not errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallReport {
    pub executable: Option<PathBuf>,
    pub archives: Vec<PathBuf>,
}

impl UninstallReport {
    pub fn is_empty(&self) -> bool {
        self.executable.is_none() && self.archives.is_empty()
    }
}

/// Removes the executable from `bin_dir` and, unless `keep_cache`, the cached
/// archive for `version` (or every cached archive when `version` is `None`).
pub fn uninstall(
    bin_dir: &Path,
    cache_dir: &Path,
    version: Option<&Version>,
    keep_cache: bool,
) -> Result<UninstallReport> {
    let mut report = UninstallReport::default();

    let exe = executable_path(bin_dir);
    if cache::remove_if_present(&exe)? {
        tracing::info!(path = %exe.display(), "removed chromedriver executable");
        report.executable = Some(exe);
    }

    if keep_cache {
        return Ok(report);
    }
    match version {
        Some(v) => {
            let path = cache::cache_path(cache_dir, v);
            if cache::remove_if_present(&path)? {
                report.archives.push(path);
            }
        }
        None => report.archives = cache::remove_all_cached(cache_dir)?,
    }
    for path in &report.archives {
        tracing::info!(path = %path.display(), "removed cached archive");
    }
    Ok(report)
}
