//! Single-stream HTTP GET of a driver archive.
//!
//! The body is written to `<dest>.part` and renamed onto `dest` only once the
//! transfer finished with a 2xx status, so `dest` existing always means a
//! complete download.

use crate::config::InstallerConfig;
use crate::error::{InstallError, Result};
use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` (e.g. `chromedriver_2.21.zip.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Transfer settings for one archive download.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(600),
            retry: RetryPolicy::single_attempt(),
        }
    }
}

impl From<&InstallerConfig> for FetchOptions {
    fn from(cfg: &InstallerConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            retry: cfg.retry_policy(),
        }
    }
}

/// Downloads `url` to `dest`, replacing any existing file. Returns the number
/// of bytes written.
pub fn fetch_to_path(url: &str, dest: &Path, opts: &FetchOptions) -> Result<u64> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| InstallError::io(parent, e))?;
    }
    let part = temp_path(dest);
    tracing::info!(url, dest = %dest.display(), "downloading chromedriver archive");

    let fetched = run_with_retry(&opts.retry, || fetch_once(url, &part, opts));
    let written = match fetched {
        Ok(n) => n,
        Err(e) => {
            remove_part(&part);
            return Err(InstallError::Download {
                url: url.to_string(),
                reason: e.to_string(),
            });
        }
    };

    std::fs::rename(&part, dest).map_err(|e| {
        remove_part(&part);
        InstallError::io(dest, e)
    })?;
    tracing::debug!(bytes = written, dest = %dest.display(), "download complete");
    Ok(written)
}

fn remove_part(part: &Path) {
    match std::fs::remove_file(part) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %part.display(), "could not remove partial download: {}", e),
    }
}

/// One GET attempt, truncating `part` first.
fn fetch_once(url: &str, part: &Path, opts: &FetchOptions) -> Result<u64, FetchError> {
    let mut file = File::create(part).map_err(FetchError::Storage)?;
    let mut written = 0u64;
    let mut write_err: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    easy.fail_on_error(false)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_err = Some(e);
                // Short count aborts the transfer.
                Ok(0)
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(FetchError::Storage(e));
    }
    performed?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    file.sync_all().map_err(FetchError::Storage)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("/tmp/chromedriver_2.21.zip"));
        assert_eq!(p.to_string_lossy(), "/tmp/chromedriver_2.21.zip.part");
    }

    #[test]
    fn options_follow_config() {
        let cfg = InstallerConfig {
            connect_timeout_secs: 3,
            timeout_secs: 9,
            ..InstallerConfig::default()
        };
        let opts = FetchOptions::from(&cfg);
        assert_eq!(opts.connect_timeout, Duration::from_secs(3));
        assert_eq!(opts.timeout, Duration::from_secs(9));
        assert_eq!(opts.retry, RetryPolicy::single_attempt());
    }

    #[test]
    fn unreachable_host_is_download_error_and_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("chromedriver_2.21.zip");
        // Port 9 on loopback: nothing listens there in test environments.
        let opts = FetchOptions {
            connect_timeout: Duration::from_secs(2),
            timeout: Duration::from_secs(5),
            ..FetchOptions::default()
        };
        let err = fetch_to_path("http://127.0.0.1:9/2.21/chromedriver_linux64.zip", &dest, &opts)
            .unwrap_err();
        assert!(matches!(err, InstallError::Download { .. }), "{err}");
        assert!(!dest.exists());
        assert!(!temp_path(&dest).exists());
    }
}
