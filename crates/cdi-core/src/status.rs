//! Inspect what is installed and cached.

use crate::cache;
use crate::error::{InstallError, Result};
use crate::resolver::Version;
use crate::unpack::executable_path;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Snapshot of the installed driver and the archive cache.
#[derive(Debug, Clone)]
pub struct Status {
    pub executable: PathBuf,
    pub installed: bool,
    /// Version the executable reports, when it could be run.
    pub reported_version: Option<String>,
    pub cached: Vec<(Version, PathBuf)>,
}

pub fn status(bin_dir: &Path, cache_dir: &Path) -> Result<Status> {
    let executable = executable_path(bin_dir);
    let installed = executable.is_file();
    let reported_version = if installed {
        match reported_version(&executable) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(path = %executable.display(), "could not query driver version: {}", e);
                None
            }
        }
    } else {
        None
    };
    Ok(Status {
        executable,
        installed,
        reported_version,
        cached: cache::cached_versions(cache_dir)?,
    })
}

/// Runs `<exe> --version` and returns the version token it prints, e.g.
/// `2.21.371459` for `ChromeDriver 2.21.371459 (19d6ce...)`.
pub fn reported_version(executable: &Path) -> Result<Option<String>> {
    let output = Command::new(executable)
        .arg("--version")
        .output()
        .map_err(|e| InstallError::io(executable, e))?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_version_output(&stdout))
}

/// First whitespace-separated token starting with a digit.
pub fn parse_version_output(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .find(|t| t.starts_with(|c: char| c.is_ascii_digit()))
        .map(|t| t.to_string())
}

/// True when `reported` is `requested` or a build of it (`2.21` vs `2.21.371459`).
pub fn version_matches(reported: &str, requested: &Version) -> bool {
    let requested = requested.as_str();
    reported == requested
        || reported
            .strip_prefix(requested)
            .map_or(false, |rest| rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chromedriver_banner() {
        assert_eq!(
            parse_version_output("ChromeDriver 2.21.371459 (19d6ce6ea4ca5ee1a6cfde8f4ea9c2b2da3b01f3)\n")
                .as_deref(),
            Some("2.21.371459")
        );
        assert_eq!(parse_version_output("").as_deref(), None);
        assert_eq!(parse_version_output("usage: chromedriver").as_deref(), None);
    }

    #[test]
    fn version_match_requires_component_boundary() {
        let v: Version = "2.2".parse().unwrap();
        assert!(version_matches("2.2", &v));
        assert!(version_matches("2.2.123", &v));
        assert!(!version_matches("2.21.371459", &v));
        let v21: Version = "2.21".parse().unwrap();
        assert!(version_matches("2.21.371459", &v21));
    }

    #[test]
    fn empty_dirs_report_nothing_installed() {
        let dir = tempfile::tempdir().unwrap();
        let st = status(&dir.path().join("bin"), dir.path()).unwrap();
        assert!(!st.installed);
        assert!(st.reported_version.is_none());
        assert!(st.cached.is_empty());
    }
}
