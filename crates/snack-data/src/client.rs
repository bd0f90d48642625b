//! Fetch client with dependency tagging.

use std::future::Future;
use std::time::Instant;

use tracing::{debug, warn};

use crate::dependency::DependencyTag;
use crate::error::FetchError;
use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    /// Create a new fetch policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }

    /// Create from a dependency tag's defaults.
    pub fn from_tag(tag: DependencyTag) -> Self {
        let retries = tag.default_max_retries();
        Self {
            timeout: TimeoutConfig::for_attempts(tag.default_timeout(), retries),
            retry: RetryPolicy::new(retries),
        }
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: TimeoutConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Runs calls against one dependency with timeout and retry.
///
/// Every attempt is bounded by the attempt timeout; the whole call, backoff
/// included, by the total timeout.
#[derive(Debug, Clone)]
pub struct FetchClient {
    tag: DependencyTag,
    policy: FetchPolicy,
}

impl FetchClient {
    /// Create a client using the tag's default policy.
    pub fn new(tag: DependencyTag) -> Self {
        Self {
            tag,
            policy: FetchPolicy::from_tag(tag),
        }
    }

    /// Override the policy.
    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run `attempt_fn` until it succeeds or the policy gives up.
    pub async fn execute<T, F, Fut>(&self, operation: &str, mut attempt_fn: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let tag = self.tag;
        let policy = &self.policy;
        let started = Instant::now();

        let attempts = async {
            let mut attempt = 0u32;
            loop {
                debug!(dependency = %tag, operation, attempt, "fetch attempt");
                let error = match tokio::time::timeout(policy.timeout.attempt, attempt_fn()).await {
                    Ok(Ok(value)) => return Ok(value),
                    Ok(Err(e)) => e,
                    Err(_) => FetchError::Timeout {
                        tag,
                        after: policy.timeout.attempt,
                    },
                };

                if !policy.retry.should_retry(&error, attempt) {
                    return Err(error);
                }

                let delay = policy.retry.backoff.delay_for_attempt(attempt);
                warn!(
                    dependency = %tag,
                    operation,
                    attempt,
                    error = %error,
                    delay_ms = delay.as_millis() as u64,
                    "fetch failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        };

        let result = match tokio::time::timeout(policy.timeout.total, attempts).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                tag,
                after: policy.timeout.total,
            }),
        };

        debug!(
            dependency = %tag,
            operation,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "fetch finished"
        );
        result
    }

    /// The dependency this client calls.
    pub fn tag(&self) -> DependencyTag {
        self.tag
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }
}
