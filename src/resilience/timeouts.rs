//! Timeout enforcement for blocking work.
//!
//! # Responsibilities
//! - Run blocking filesystem work on Tokio's blocking pool
//! - Bound it with a deadline so one slow stat can't hold a request forever
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from a panicking task
//! - The blocking task itself is not cancelled; only the caller stops waiting

use std::time::Duration;

use thiserror::Error;

/// Error running blocking work.
#[derive(Debug, Error)]
pub enum BlockingError {
    #[error("operation timed out after {0:?}")]
    Elapsed(Duration),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Run `f` on the blocking pool, giving up after `deadline`.
pub async fn blocking_with_timeout<T, F>(deadline: Duration, f: F) -> Result<T, BlockingError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(deadline, tokio::task::spawn_blocking(f)).await {
        Ok(joined) => Ok(joined?),
        Err(_) => Err(BlockingError::Elapsed(deadline)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_value() {
        let value = blocking_with_timeout(Duration::from_secs(1), || 40 + 2)
            .await
            .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_times_out() {
        let err = blocking_with_timeout(Duration::from_millis(10), || {
            std::thread::sleep(Duration::from_millis(200));
        })
        .await
        .unwrap_err();
        assert!(matches!(err, BlockingError::Elapsed(_)));
    }

    #[tokio::test]
    async fn test_panic_is_reported() {
        let err = blocking_with_timeout(Duration::from_secs(1), || -> u8 { panic!("boom") })
            .await
            .unwrap_err();
        assert!(matches!(err, BlockingError::Join(_)));
    }
}
