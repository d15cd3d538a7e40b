//! Bounded retry-until-true polling

use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{KubeError, Result};

/// Call `predicate` until it returns `true`
///
/// A predicate error is returned immediately. After `max_attempts` calls
/// that all returned `false` the result is [`KubeError::Timeout`].
/// `interval` is slept between attempts, never after the last one.
pub async fn retry_until_true<F, Fut>(
    description: &str,
    max_attempts: u32,
    interval: Duration,
    mut predicate: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    for attempt in 1..=max_attempts {
        if predicate().await? {
            info!(description, attempt, "condition met");
            return Ok(());
        }

        debug!(description, attempt, max_attempts, "condition not met yet");
        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }

    Err(KubeError::Timeout {
        description: description.to_string(),
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    const TICK: Duration = Duration::from_millis(1);

    #[tokio::test]
    async fn test_returns_when_condition_met() {
        let calls = &AtomicU32::new(0);
        let result = retry_until_true("rollout", 10, TICK, move || async move {
            Ok(calls.fetch_add(1, Ordering::SeqCst) + 1 == 4)
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_times_out_after_budget() {
        let calls = &AtomicU32::new(0);
        let err = retry_until_true("rollout", 7, TICK, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 7);
        match err {
            KubeError::Timeout {
                description,
                attempts,
            } => {
                assert_eq!(description, "rollout");
                assert_eq!(attempts, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_predicate_error_propagates_immediately() {
        let calls = &AtomicU32::new(0);
        let err = retry_until_true("rollout", 10, TICK, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(KubeError::api_status(500, "InternalError", "boom"))
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!matches!(err, KubeError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_zero_attempts_times_out() {
        let result = retry_until_true("nothing", 0, TICK, move || async move { Ok(true) }).await;
        assert!(matches!(result, Err(KubeError::Timeout { attempts: 0, .. })));
    }
}
