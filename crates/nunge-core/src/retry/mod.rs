//! Retry and backoff policy for image fetches.
//!
//! Classifies fetch failures (timeouts, throttling, connection errors, 5xx)
//! and decides whether and when to try again. Without a policy every image
//! gets exactly one attempt.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
