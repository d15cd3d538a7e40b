//! Optimistic-concurrency retry for updates
//!
//! Only conflicts are retried, with a fixed delay and no backoff. The
//! operation is rebuilt for every attempt.

use std::future::Future;
use tracing::debug;

use crate::config::ConflictRetry;
use crate::error::Result;

/// Run `op` until it succeeds, fails with a non-conflict error, or the
/// attempt budget is spent (the last conflict is returned)
pub async fn retry_on_conflict<T, F, Fut>(policy: &ConflictRetry, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Err(e) if e.is_conflict() && attempt < attempts => {
                debug!(attempt, max_attempts = attempts, error = %e, "conflict, retrying");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
