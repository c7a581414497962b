//! Extract the driver executable from a verified archive into the bin dir.

use crate::error::{InstallError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// File name of the driver executable on this platform.
pub fn executable_name() -> &'static str {
    if cfg!(windows) {
        "chromedriver.exe"
    } else {
        "chromedriver"
    }
}

/// Install location of the driver executable inside `bin_dir`.
pub fn executable_path(bin_dir: &Path) -> PathBuf {
    bin_dir.join(executable_name())
}

/// Extracts the single driver entry of `archive_path` to `bin_dir`, replacing
/// any previous installation, and marks it executable. Returns the installed path.
///
/// The entry is matched by file name at any depth in the archive. It is
/// written to a temp file in `bin_dir` first and renamed over the target.
pub fn install_executable(archive_path: &Path, bin_dir: &Path) -> Result<PathBuf> {
    install_executable_checked(archive_path, bin_dir, |_| Ok(()))
}

/// Like [`install_executable`], but runs `check` on the staged executable
/// before it replaces the target. A failed check leaves any previous
/// installation untouched.
pub fn install_executable_checked<F>(archive_path: &Path, bin_dir: &Path, check: F) -> Result<PathBuf>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let archive_err = |reason: String| InstallError::Archive {
        path: archive_path.to_path_buf(),
        reason,
    };

    let file = File::open(archive_path).map_err(|e| InstallError::io(archive_path, e))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| archive_err(format!("failed to read zip archive: {}", e)))?;

    let wanted = executable_name();
    let index = (0..archive.len())
        .find(|&i| {
            archive
                .by_index_raw(i)
                .map(|entry| {
                    !entry.is_dir()
                        && Path::new(entry.name())
                            .file_name()
                            .map_or(false, |n| n == wanted)
                })
                .unwrap_or(false)
        })
        .ok_or_else(|| archive_err(format!("no {} entry in archive", wanted)))?;

    std::fs::create_dir_all(bin_dir).map_err(|e| InstallError::io(bin_dir, e))?;
    let target = executable_path(bin_dir);

    let mut entry = archive
        .by_index(index)
        .map_err(|e| archive_err(format!("failed to read zip entry: {}", e)))?;
    tracing::debug!(entry = entry.name(), size = entry.size(), "extracting driver");

    let mut staged = tempfile::Builder::new()
        .prefix(".chromedriver")
        .tempfile_in(bin_dir)
        .map_err(|e| InstallError::io(bin_dir, e))?;
    std::io::copy(&mut entry, staged.as_file_mut())
        .map_err(|e| archive_err(format!("failed to extract {}: {}", wanted, e)))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| InstallError::io(staged.path(), e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(staged.path(), std::fs::Permissions::from_mode(0o755))
            .map_err(|e| InstallError::io(staged.path(), e))?;
    }

    // Close the write handle so the staged file can be executed.
    let staged = staged.into_temp_path();
    check(&staged)?;

    staged
        .persist(&target)
        .map_err(|e| InstallError::io(&target, e.error))?;
    tracing::info!(path = %target.display(), "installed chromedriver executable");
    Ok(target)
}
