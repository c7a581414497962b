//! `chromedriver-installer install` – resolve, fetch or reuse, verify, install.

use super::resolve_dirs;
use crate::cli::DirArgs;
use anyhow::{Context, Result};
use cdi_core::checksum::{ChecksumAlgorithm, ChecksumSet};
use cdi_core::config::InstallerConfig;
use cdi_core::install::{install, InstallRequest};
use cdi_core::resolver::{Platform, Version};

/// Parsed `install` arguments.
#[derive(Debug)]
pub struct InstallArgs {
    pub version: Version,
    pub checksums: Option<String>,
    pub algorithm: Option<ChecksumAlgorithm>,
    pub platform: Option<Platform>,
    pub base_url: Option<String>,
    pub force: bool,
    pub verify_version: bool,
    pub dirs: DirArgs,
}

pub fn run_install(cfg: &InstallerConfig, args: InstallArgs) -> Result<()> {
    let (bin_dir, cache_dir) = resolve_dirs(cfg, &args.dirs)?;
    let mut req = InstallRequest::new(args.version, bin_dir, cfg);
    req.cache_dir = cache_dir;
    if let Some(list) = args.checksums.as_deref() {
        req.checksums = ChecksumSet::parse(list);
    }
    if let Some(algorithm) = args.algorithm {
        req.algorithm = algorithm;
    }
    if let Some(platform) = args.platform {
        req.platform = platform;
    }
    if let Some(base_url) = args.base_url {
        req.base_url = base_url;
    }
    req.force = args.force;
    req.verify_version = args.verify_version;

    let report = install(&req).with_context(|| format!("installing chromedriver {}", req.version))?;

    let source = if report.cache.is_hit() {
        "cached archive"
    } else {
        "downloaded archive"
    };
    println!(
        "Installed chromedriver {} to {} (from {} {})",
        report.version,
        report.executable.display(),
        source,
        report.archive.display()
    );
    if let Some(digest) = report.digest {
        println!("{} {}  {}", req.algorithm, digest, report.archive.display());
    }
    Ok(())
}
