//! Latency and failure simulation shared by the mock data sources.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::dependency::DependencyTag;
use crate::error::FetchError;

const ALWAYS: u32 = u32::MAX;

/// Injects failures into a mock dependency.
#[derive(Debug, Default)]
pub(crate) struct FaultInjector {
    reason: Option<String>,
    remaining: AtomicU32,
}

impl FaultInjector {
    /// Fail every attempt.
    pub(crate) fn always(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            remaining: AtomicU32::new(ALWAYS),
        }
    }

    /// Fail the next `times` attempts, then succeed.
    pub(crate) fn times(times: u32, reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            remaining: AtomicU32::new(times),
        }
    }

    /// One simulated round trip: wait `latency`, then maybe fail.
    pub(crate) async fn round_trip(
        &self,
        tag: DependencyTag,
        latency: Duration,
    ) -> Result<(), FetchError> {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let Some(reason) = &self.reason else {
            return Ok(());
        };
        let fail = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match n {
                0 => None,
                ALWAYS => Some(ALWAYS),
                n => Some(n - 1),
            })
            .is_ok();

        if fail {
            debug!(dependency = %tag, reason = %reason, "injected failure");
            return Err(FetchError::Unavailable {
                tag,
                reason: reason.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fails_exactly_n_times() {
        let fault = FaultInjector::times(2, "flaky");
        let tag = DependencyTag::Catalog;

        assert!(fault.round_trip(tag, Duration::ZERO).await.is_err());
        assert!(fault.round_trip(tag, Duration::ZERO).await.is_err());
        assert!(fault.round_trip(tag, Duration::ZERO).await.is_ok());
    }

    #[tokio::test]
    async fn test_default_never_fails() {
        let fault = FaultInjector::default();
        assert!(fault.round_trip(DependencyTag::Reliability, Duration::ZERO).await.is_ok());
    }
}
