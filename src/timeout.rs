//! Request-scoped deadlines for service calls

use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

/// Run `fut` under `limit`. On expiry the in-flight future is dropped, which
/// cancels the pending store round trip.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "service call timed out");
            Err(Error::Timeout)
        }
    }
}
