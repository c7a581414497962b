//! CLI command handlers, one per file.

mod checksum;
mod completions;
mod install;
mod status;
mod uninstall;
mod url;

pub use checksum::run_checksum;
pub use completions::run_completions;
pub use install::{run_install, InstallArgs};
pub use status::run_status;
pub use uninstall::run_uninstall;
pub use url::run_url;

use super::DirArgs;
use cdi_core::config::InstallerConfig;
use cdi_core::install::resolve_bin_dir;
use std::path::PathBuf;

/// Effective `(bin_dir, cache_dir)`: flags first, then config.
pub(crate) fn resolve_dirs(cfg: &InstallerConfig, dirs: &DirArgs) -> anyhow::Result<(PathBuf, PathBuf)> {
    let bin_dir = resolve_bin_dir(dirs.bin_dir.as_deref(), cfg)?;
    let cache_dir = dirs.cache_dir.clone().unwrap_or_else(|| cfg.cache_dir());
    Ok((bin_dir, cache_dir))
}
