//! Async utilities and patterns
//!
//! Provides timeouts and bounded concurrency control

use crate::error::{ContainerizerError, ContainerizerResult, ErrorContext};
use futures::stream::{self, StreamExt};
use std::future::Future;
use tokio::time::{timeout, Duration};

/// Timeout wrapper for async operations
pub async fn with_timeout<F, T>(
    future: F,
    timeout_ms: u64,
    operation_name: &str,
) -> ContainerizerResult<T>
where
    F: Future<Output = T>,
{
    match timeout(Duration::from_millis(timeout_ms), future).await {
        Ok(result) => Ok(result),
        Err(_) => Err(Box::new(ContainerizerError::Timeout {
            operation: operation_name.to_string(),
            duration_ms: timeout_ms,
            context: ErrorContext::new("async_utils")
                .with_operation("timeout")
                .with_metadata("timeout_ms", &timeout_ms.to_string())
                .with_suggestion("Increase pipeline.generation_timeout_secs")
                .with_suggestion("Verify service availability"),
        })),
    }
}

/// Run `processor` over `items` with at most `max_concurrent` futures in flight
///
/// Results come back in completion order.
pub async fn process_concurrently<T, R, F, Fut>(
    items: impl IntoIterator<Item = T>,
    max_concurrent: usize,
    processor: F,
) -> Vec<R>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    stream::iter(items)
        .map(processor)
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(tokio::time::sleep(Duration::from_millis(200)), 10, "sleep").await;
        match result {
            Err(e) => assert!(matches!(*e, ContainerizerError::Timeout { .. })),
            Ok(_) => panic!("expected timeout"),
        }
    }

    #[tokio::test]
    async fn test_process_concurrently_respects_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = process_concurrently(0..20, 3, |i| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                i * 2
            }
        })
        .await;

        assert_eq!(results.len(), 20);
        assert_eq!(results.iter().sum::<i32>(), (0..20).map(|i| i * 2).sum::<i32>());
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }
}
