//! Shared exponential backoff retry logic for LLM providers.

use std::future::Future;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use tracing::debug;

/// 3 total attempts, base 1s, max 30s.
pub const MAX_ATTEMPTS: u32 = 3;
const INITIAL_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 30;

/// Retry an async operation with exponential backoff.
///
/// `attempt` runs up to [`MAX_ATTEMPTS`] times, sleeping between failures.
/// `wrap_exhausted` turns the last error into the caller's
/// `RetriesExhausted` variant.
pub async fn retry_with_backoff<T, E, Fut, F, W>(
    mut attempt: F,
    wrap_exhausted: W,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    W: FnOnce(E) -> E,
{
    let mut backoff = ExponentialBackoff {
        initial_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
        max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
        max_elapsed_time: None,
        ..Default::default()
    };

    let mut attempts = 0;

    loop {
        attempts += 1;

        let error = match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if attempts >= MAX_ATTEMPTS {
            return Err(wrap_exhausted(error));
        }

        debug!(attempt = attempts, error = %error, "Provider attempt failed, retrying");
        if let Some(wait) = backoff.next_backoff() {
            tokio::time::sleep(wait).await;
        }
    }
}
