//! CLI for the ChromeDriver installer.

mod commands;

use anyhow::Result;
use cdi_core::checksum::ChecksumAlgorithm;
use cdi_core::config::{self, InstallerConfig};
use cdi_core::resolver::{Platform, Version};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_checksum, run_completions, run_install, run_status, run_uninstall, run_url};

/// Top-level CLI for the ChromeDriver installer.
#[derive(Debug, Parser)]
#[command(name = "chromedriver-installer")]
#[command(about = "Download, verify and install prebuilt ChromeDriver binaries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Where the driver is installed and archives are cached.
#[derive(Debug, Clone, Default, Args)]
pub struct DirArgs {
    /// Install directory (default: config `bin_dir`, then `$VIRTUAL_ENV/bin`).
    #[arg(long, value_name = "DIR")]
    pub bin_dir: Option<PathBuf>,
    /// Archive cache directory (default: config `cache_dir`, then the system temp dir).
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download (or reuse the cached archive), verify and install a driver version.
    Install {
        /// Driver version to install, e.g. 2.21.
        #[arg(long = "chromedriver-version", value_name = "VERSION")]
        version: Version,
        /// Comma-separated list of acceptable archive checksums. Empty skips verification.
        #[arg(long = "chromedriver-checksums", value_name = "LIST")]
        checksums: Option<String>,
        /// Checksum algorithm (md5 or sha256; default from config).
        #[arg(long, value_name = "ALGO")]
        algorithm: Option<ChecksumAlgorithm>,
        /// Archive platform (default: detected).
        #[arg(long, value_name = "PLATFORM")]
        platform: Option<Platform>,
        /// Release host to download from (default from config).
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
        /// Discard the cached archive and download again.
        #[arg(long)]
        force: bool,
        /// Run the installed driver and check it reports the requested version.
        #[arg(long)]
        verify_version: bool,
        #[command(flatten)]
        dirs: DirArgs,
    },

    /// Remove the installed driver and cached archives.
    Uninstall {
        /// Only remove the cached archive of this version (default: all cached versions).
        #[arg(long = "chromedriver-version", value_name = "VERSION")]
        version: Option<Version>,
        /// Leave cached archives in place.
        #[arg(long)]
        keep_cache: bool,
        #[command(flatten)]
        dirs: DirArgs,
    },

    /// Show the installed driver and cached archives.
    Status {
        #[command(flatten)]
        dirs: DirArgs,
    },

    /// Print the download URL for a version.
    Url {
        #[arg(long = "chromedriver-version", value_name = "VERSION")]
        version: Version,
        #[arg(long, value_name = "PLATFORM")]
        platform: Option<Platform>,
    },

    /// Compute the checksum of a file (e.g. a downloaded archive).
    Checksum {
        /// Path to the file.
        path: PathBuf,
        #[arg(long, value_name = "ALGO")]
        algorithm: Option<ChecksumAlgorithm>,
    },

    /// Print a shell completion script.
    Completions {
        shell: clap_complete::Shell,
    },
}

/// Line printed to stderr when a command fails, with the full context chain.
pub fn error_message(err: &anyhow::Error) -> String {
    format!("chromedriver-installer error: {:#}", err)
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        match cli.command {
            // No config file is created just to print completions.
            CliCommand::Completions { shell } => run_completions(shell),
            command => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                command.run(&cfg)
            }
        }
    }

    fn run(self, cfg: &InstallerConfig) -> Result<()> {
        match self {
            CliCommand::Install {
                version,
                checksums,
                algorithm,
                platform,
                base_url,
                force,
                verify_version,
                dirs,
            } => run_install(
                cfg,
                commands::InstallArgs {
                    version,
                    checksums,
                    algorithm,
                    platform,
                    base_url,
                    force,
                    verify_version,
                    dirs,
                },
            )?,
            CliCommand::Uninstall {
                version,
                keep_cache,
                dirs,
            } => run_uninstall(cfg, version.as_ref(), keep_cache, &dirs)?,
            CliCommand::Status { dirs } => run_status(cfg, &dirs)?,
            CliCommand::Url { version, platform } => run_url(cfg, &version, platform)?,
            CliCommand::Checksum { path, algorithm } => {
                run_checksum(&path, algorithm.unwrap_or(cfg.checksum_algorithm))?
            }
            CliCommand::Completions { shell } => run_completions(shell)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
