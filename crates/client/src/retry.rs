//! Bounded immediate retry for client fetches.
//!
//! No backoff and no circuit breaking: a failed fetch is repeated at most
//! `retries` times right away, then the last error is returned.

use std::future::Future;

use crate::error::ClientError;

/// Run `op`, repeating it up to `retries` extra times while it fails with a
/// retryable error.
pub async fn with_retry<T, F, Fut>(label: &str, retries: u32, mut op: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt <= retries => {
                tracing::warn!(label, attempt, error = %e, "Fetch failed, retrying");
            }
            Err(e) => return Err(e),
        }
    }
}
