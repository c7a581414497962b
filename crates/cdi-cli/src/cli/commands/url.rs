//! `chromedriver-installer url` – print the archive URL for a version.

use anyhow::Result;
use cdi_core::config::InstallerConfig;
use cdi_core::resolver::{download_url, Platform, Version};

pub fn run_url(cfg: &InstallerConfig, version: &Version, platform: Option<Platform>) -> Result<()> {
    let platform = platform.unwrap_or_else(|| Platform::current(version));
    println!("{}", download_url(&cfg.base_url, version, platform)?);
    Ok(())
}
