pub mod config;
pub mod error;
pub mod logging;

// Install pipeline, in order
pub mod resolver;
pub mod cache;
pub mod fetch;
pub mod retry;
pub mod checksum;
pub mod unpack;
pub mod install;

pub mod status;
pub mod uninstall;

pub use error::{InstallError, Result};
