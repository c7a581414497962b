//! Retry and backoff policy for archive downloads.
//!
//! Classifies fetch failures (timeouts, throttling, connection errors) and
//! decides exponential backoff so the fetcher retries only what can succeed
//! on a second attempt.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
