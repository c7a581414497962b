use cdi_core::logging;

mod cli;

use crate::cli::{error_message, CliCommand};

fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {:#}", e);
    }

    if let Err(err) = CliCommand::run_from_args() {
        tracing::error!("{:#}", err);
        eprintln!("{}", error_message(&err));
        std::process::exit(1);
    }
}
