//! `chromedriver-installer uninstall` – remove the executable and cached archives.

use super::resolve_dirs;
use crate::cli::DirArgs;
use anyhow::Result;
use cdi_core::config::InstallerConfig;
use cdi_core::resolver::Version;
use cdi_core::uninstall::uninstall;

pub fn run_uninstall(
    cfg: &InstallerConfig,
    version: Option<&Version>,
    keep_cache: bool,
    dirs: &DirArgs,
) -> Result<()> {
    let (bin_dir, cache_dir) = resolve_dirs(cfg, dirs)?;
    let report = uninstall(&bin_dir, &cache_dir, version, keep_cache)?;
    if report.is_empty() {
        println!("Nothing to remove");
        return Ok(());
    }
    if let Some(exe) = &report.executable {
        println!("Removed {}", exe.display());
    }
    for archive in &report.archives {
        println!("Removed {}", archive.display());
    }
    Ok(())
}
