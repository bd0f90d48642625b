//! Fixture-backed reliability scorer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use snack_commerce::checkout::{ReliabilityScore, ReliabilityScorer};
use snack_commerce::{CommerceError, ProductId};
use tracing::info;

use crate::client::{FetchClient, FetchPolicy};
use crate::dependency::DependencyTag;
use crate::fault::FaultInjector;

/// Score for products without a fixed score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FallbackScore {
    /// Uniformly random in `[low, high)`.
    Random { low: f64, high: f64 },
    /// Always the same value.
    Fixed(f64),
}

impl FallbackScore {
    fn sample(&self) -> f64 {
        match *self {
            Self::Random { low, high } if low < high => rand::thread_rng().gen_range(low..high),
            Self::Random { low, .. } => low,
            Self::Fixed(score) => score,
        }
    }
}

impl Default for FallbackScore {
    fn default() -> Self {
        Self::Random {
            low: 0.4,
            high: 0.8,
        }
    }
}

/// In-process scorer with fixed scores for the known problem products.
///
/// 101 scores 0.35, 102 scores 0.55 and 103 scores 0.25; everything else
/// draws from the fallback.
#[derive(Debug)]
pub struct MockReliabilityScorer {
    overrides: HashMap<ProductId, f64>,
    fallback: FallbackScore,
    latency: Duration,
    client: FetchClient,
    fault: FaultInjector,
    calls: AtomicUsize,
}

impl MockReliabilityScorer {
    pub fn new() -> Self {
        let overrides = [(101, 0.35), (102, 0.55), (103, 0.25)]
            .into_iter()
            .map(|(id, score)| (ProductId::new(id), score))
            .collect();
        Self {
            overrides,
            fallback: FallbackScore::default(),
            latency: Duration::from_millis(1500),
            client: FetchClient::new(DependencyTag::Reliability),
            fault: FaultInjector::default(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Pin the score of one product.
    pub fn with_score(mut self, id: impl Into<ProductId>, score: f64) -> Self {
        self.overrides.insert(id.into(), score);
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackScore) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.client = self.client.with_policy(policy);
        self
    }

    /// Fail every request with `reason`.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.fault = FaultInjector::always(reason);
        self
    }

    /// Number of `predict` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockReliabilityScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReliabilityScorer for MockReliabilityScorer {
    async fn predict(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<ReliabilityScore>, CommerceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.client
            .execute("predict", || {
                self.fault.round_trip(DependencyTag::Reliability, self.latency)
            })
            .await?;

        let scores: Vec<ReliabilityScore> = product_ids
            .iter()
            .map(|id| {
                let score = self
                    .overrides
                    .get(id)
                    .copied()
                    .unwrap_or_else(|| self.fallback.sample());
                ReliabilityScore::new(*id, score)
            })
            .collect();
        info!(count = scores.len(), "reliability scores predicted");
        Ok(scores)
    }
}
