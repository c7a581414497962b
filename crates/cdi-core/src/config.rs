use crate::checksum::ChecksumAlgorithm;
use crate::resolver::DEFAULT_BASE_URL;
use crate::retry::RetryPolicy;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Application name used for XDG config/state directories.
pub const APP_NAME: &str = "chromedriver-installer";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.5,
            max_delay_secs: 10,
        }
    }
}

impl RetryConfig {
    /// Backoff policy for these settings. Out-of-range delays are clamped to
    /// `max_delay_secs`; negative or NaN delays become zero.
    pub fn to_policy(&self) -> RetryPolicy {
        let max_delay = Duration::from_secs(self.max_delay_secs);
        let base_delay = Duration::try_from_secs_f64(self.base_delay_secs.max(0.0))
            .unwrap_or(max_delay)
            .min(max_delay);
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }
}

/// Global configuration loaded from `~/.config/chromedriver-installer/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Release host serving `<version>/chromedriver_<platform>.zip`.
    pub base_url: String,
    /// Directory holding cached archives (None = system temp dir).
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Directory the driver is installed into (None = `$VIRTUAL_ENV/bin`).
    #[serde(default)]
    pub bin_dir: Option<PathBuf>,
    /// Digest used to check archives against the given checksums.
    #[serde(default)]
    pub checksum_algorithm: ChecksumAlgorithm,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Overall transfer timeout in seconds.
    pub timeout_secs: u64,
    /// Optional retry policy; if missing, a download is attempted once.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: None,
            bin_dir: None,
            checksum_algorithm: ChecksumAlgorithm::Md5,
            connect_timeout_secs: 30,
            timeout_secs: 600,
            retry: None,
        }
    }
}

impl InstallerConfig {
    /// Effective cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Effective retry policy (a single attempt when `[retry]` is absent).
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_else(RetryPolicy::single_attempt)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME)?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<InstallerConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = InstallerConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: InstallerConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = InstallerConfig::default();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.checksum_algorithm, ChecksumAlgorithm::Md5);
        assert!(cfg.cache_dir.is_none());
        assert!(cfg.bin_dir.is_none());
        assert_eq!(cfg.cache_dir(), std::env::temp_dir());
        assert_eq!(cfg.retry_policy().max_attempts, 1);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = InstallerConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: InstallerConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.base_url, cfg.base_url);
        assert_eq!(parsed.connect_timeout_secs, cfg.connect_timeout_secs);
        assert_eq!(parsed.timeout_secs, cfg.timeout_secs);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            base_url = "http://mirror.local/chromedriver"
            cache_dir = "/var/cache/chromedriver"
            bin_dir = "/opt/venv/bin"
            checksum_algorithm = "sha256"
            connect_timeout_secs = 5
            timeout_secs = 60
        "#;
        let cfg: InstallerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.base_url, "http://mirror.local/chromedriver");
        assert_eq!(cfg.cache_dir(), PathBuf::from("/var/cache/chromedriver"));
        assert_eq!(cfg.bin_dir, Some(PathBuf::from("/opt/venv/bin")));
        assert_eq!(cfg.checksum_algorithm, ChecksumAlgorithm::Sha256);
        assert!(cfg.retry.is_none());
    }

    #[test]
    fn config_toml_retry_section() {
        let toml = r#"
            base_url = "https://chromedriver.storage.googleapis.com"
            connect_timeout_secs = 30
            timeout_secs = 600

            [retry]
            max_attempts = 4
            base_delay_secs = 0.25
            max_delay_secs = 5
        "#;
        let cfg: InstallerConfig = toml::from_str(toml).unwrap();
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Duration::from_secs(5));
    }

    #[test]
    fn retry_config_never_yields_zero_attempts() {
        let rc = RetryConfig {
            max_attempts: 0,
            base_delay_secs: -1.0,
            max_delay_secs: 1,
        };
        let policy = rc.to_policy();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.base_delay, Duration::ZERO);
    }

    #[test]
    fn huge_or_infinite_base_delay_is_clamped() {
        for delay in ["1e30", "inf", "nan"] {
            let toml = format!(
                r#"
                base_url = "https://chromedriver.storage.googleapis.com"
                connect_timeout_secs = 30
                timeout_secs = 600

                [retry]
                max_attempts = 2
                base_delay_secs = {delay}
                max_delay_secs = 7
                "#
            );
            let cfg: InstallerConfig = toml::from_str(&toml).unwrap();
            let policy = cfg.retry_policy();
            assert!(policy.base_delay <= Duration::from_secs(7), "{delay}");
            assert_eq!(policy.max_delay, Duration::from_secs(7));
        }
    }
}
