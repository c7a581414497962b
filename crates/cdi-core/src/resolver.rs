//! Version resolver: turns a requested driver version into the archive URL.
//!
//! Archives are published as `<base>/<version>/chromedriver_<platform>.zip`.
//! Resolution is pure; nothing here touches the network.

use crate::error::{InstallError, Result};
use std::fmt;
use std::str::FromStr;

/// Default release host for driver archives.
pub const DEFAULT_BASE_URL: &str = "https://chromedriver.storage.googleapis.com";

/// A released driver build, e.g. `2.21`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    raw: String,
    parts: Vec<u32>,
}

impl Version {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when this version sorts strictly before `major.minor`.
    pub fn is_before(&self, major: u32, minor: u32) -> bool {
        let own = (
            self.parts.first().copied().unwrap_or(0),
            self.parts.get(1).copied().unwrap_or(0),
        );
        own < (major, minor)
    }
}

impl FromStr for Version {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(InstallError::InvalidVersion(s.to_string()));
        }
        let parts = raw
            .split('.')
            .map(|p| {
                if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                p.parse::<u32>().ok()
            })
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(|| InstallError::InvalidVersion(s.to_string()))?;
        Ok(Version {
            raw: raw.to_string(),
            parts,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Platform suffix of a published archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux32,
    Linux64,
    Mac32,
    Mac64,
    Win32,
}

impl Platform {
    /// Platform for the running build. Mac builds before 2.23 were only
    /// published as `mac32`.
    pub fn current(version: &Version) -> Platform {
        if cfg!(target_os = "windows") {
            Platform::Win32
        } else if cfg!(target_os = "macos") {
            if version.is_before(2, 23) {
                Platform::Mac32
            } else {
                Platform::Mac64
            }
        } else if cfg!(target_pointer_width = "64") {
            Platform::Linux64
        } else {
            Platform::Linux32
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Linux32 => "linux32",
            Platform::Linux64 => "linux64",
            Platform::Mac32 => "mac32",
            Platform::Mac64 => "mac64",
            Platform::Win32 => "win32",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown platform {0:?} (expected linux32, linux64, mac32, mac64 or win32)")]
pub struct ParsePlatformError(String);

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux32" => Ok(Platform::Linux32),
            "linux64" => Ok(Platform::Linux64),
            "mac32" => Ok(Platform::Mac32),
            "mac64" => Ok(Platform::Mac64),
            "win32" => Ok(Platform::Win32),
            _ => Err(ParsePlatformError(s.to_string())),
        }
    }
}

/// File name of the archive for `platform`, e.g. `chromedriver_linux64.zip`.
pub fn archive_filename(platform: Platform) -> String {
    format!("chromedriver_{}.zip", platform)
}

/// Builds the download URL for `version` on `platform` under `base_url`.
///
/// A missing trailing slash on `base_url` is tolerated, so mirrors with a
/// path prefix (e.g. `https://mirror.example/chromedriver`) keep the prefix.
pub fn download_url(base_url: &str, version: &Version, platform: Platform) -> Result<String> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let invalid = |reason: String| InstallError::InvalidUrl {
        url: base_url.to_string(),
        reason,
    };
    let parsed = url::Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
    if parsed.cannot_be_a_base() {
        return Err(invalid("not a base URL".to_string()));
    }
    let joined = parsed
        .join(&format!("{}/{}", version, archive_filename(platform)))
        .map_err(|e| invalid(e.to_string()))?;
    Ok(joined.to_string())
}
