//! `chromedriver-installer status` – installed driver and cached archives.

use super::resolve_dirs;
use crate::cli::DirArgs;
use anyhow::Result;
use cdi_core::config::InstallerConfig;
use cdi_core::status::status;

pub fn run_status(cfg: &InstallerConfig, dirs: &DirArgs) -> Result<()> {
    let (bin_dir, cache_dir) = resolve_dirs(cfg, dirs)?;
    let st = status(&bin_dir, &cache_dir)?;

    if st.installed {
        let version = st.reported_version.as_deref().unwrap_or("unknown version");
        println!("installed  {}  ({})", st.executable.display(), version);
    } else {
        println!("not installed  ({})", st.executable.display());
    }
    if st.cached.is_empty() {
        println!("no cached archives in {}", cache_dir.display());
    }
    for (version, path) in &st.cached {
        println!("cached  {:<12} {}", version, path.display());
    }
    Ok(())
}
