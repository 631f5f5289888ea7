//! Async retry loop.

use std::future::Future;

use super::classify::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::fetcher::DownloadError;

/// Runs `f` until it succeeds or the policy gives up. With `policy == None`
/// `f` runs exactly once.
pub async fn run_with_retry<T, F, Fut>(
    policy: Option<&RetryPolicy>,
    mut f: F,
) -> Result<T, DownloadError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DownloadError>>,
{
    let mut attempt = 1u32;
    loop {
        let err = match f().await {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };
        let Some(policy) = policy else {
            return Err(err);
        };
        match policy.decide(attempt, classify(&err)) {
            RetryDecision::NoRetry => return Err(err),
            RetryDecision::RetryAfter(delay) => {
                tracing::debug!(attempt, ?delay, error = %err, "retrying fetch");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
