//! Fixture-backed catalog source.

use std::time::Duration;

use async_trait::async_trait;
use snack_commerce::catalog::{CatalogSource, Product};
use snack_commerce::{CommerceError, ProductId};
use tracing::info;

use crate::client::{FetchClient, FetchPolicy};
use crate::dependency::DependencyTag;
use crate::fault::FaultInjector;
use crate::fixtures;

/// Simulated latency per catalog operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLatency {
    pub list: Duration,
    pub lookup: Duration,
    pub search: Duration,
}

impl CatalogLatency {
    /// No delay at all.
    pub fn none() -> Self {
        Self::uniform(Duration::ZERO)
    }

    /// Same delay for every operation.
    pub fn uniform(latency: Duration) -> Self {
        Self {
            list: latency,
            lookup: latency,
            search: latency,
        }
    }
}

impl Default for CatalogLatency {
    fn default() -> Self {
        Self {
            list: Duration::from_millis(800),
            lookup: Duration::from_millis(300),
            search: Duration::from_millis(400),
        }
    }
}

/// In-process catalog serving the fixture products.
#[derive(Debug)]
pub struct MockCatalog {
    products: Vec<Product>,
    latency: CatalogLatency,
    client: FetchClient,
    fault: FaultInjector,
}

impl MockCatalog {
    /// Serve the built-in fixtures with the default latencies.
    pub fn new() -> Self {
        Self::with_products(fixtures::products())
    }

    /// Serve `products` instead of the fixtures.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products,
            latency: CatalogLatency::default(),
            client: FetchClient::new(DependencyTag::Catalog),
            fault: FaultInjector::default(),
        }
    }

    pub fn with_latency(mut self, latency: CatalogLatency) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.client = self.client.with_policy(policy);
        self
    }

    /// Fail every attempt with `reason`.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.fault = FaultInjector::always(reason);
        self
    }

    /// Fail the first `times` attempts, then recover.
    pub fn failing_times(mut self, times: u32, reason: impl Into<String>) -> Self {
        self.fault = FaultInjector::times(times, reason);
        self
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for MockCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, CommerceError> {
        self.client
            .execute("fetch_products", || {
                self.fault.round_trip(DependencyTag::Catalog, self.latency.list)
            })
            .await?;
        info!(count = self.products.len(), "catalog fetched");
        Ok(self.products.clone())
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, CommerceError> {
        self.client
            .execute("fetch_product", || {
                self.fault.round_trip(DependencyTag::Catalog, self.latency.lookup)
            })
            .await?;
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, CommerceError> {
        self.client
            .execute("search_products", || {
                self.fault.round_trip(DependencyTag::Catalog, self.latency.search)
            })
            .await?;

        let needle = query.trim().to_lowercase();
        Ok(self
            .products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle) || p.id.to_string().contains(&needle)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{BackoffStrategy, RetryPolicy};
    use crate::timeout::TimeoutConfig;

    fn instant() -> MockCatalog {
        MockCatalog::new().with_latency(CatalogLatency::none())
    }

    fn no_backoff(retries: u32) -> FetchPolicy {
        FetchPolicy::new(
            TimeoutConfig::default(),
            RetryPolicy::new(retries).with_backoff(BackoffStrategy::None),
        )
    }

    #[tokio::test]
    async fn test_fetch_products_in_display_order() {
        let products = instant().fetch_products().await.unwrap();
        assert_eq!(products.len(), 8);
        assert_eq!(products[0].name, "Organic Tomatoes");
        assert_eq!(products[7].name, "Greek Yogurt");
    }

    #[tokio::test]
    async fn test_fetch_product_by_id() {
        let catalog = instant();
        let found = catalog.fetch_product(ProductId::new(105)).await.unwrap();
        assert_eq!(found.unwrap().name, "Almond Butter");
        assert!(catalog.fetch_product(ProductId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_by_name_or_id() {
        let catalog = instant();

        let names: Vec<String> = catalog
            .search_products("BREAD")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Sourdough Bread".to_string()]);

        let by_id = catalog.search_products("104").await.unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].id, ProductId::new(104));

        assert_eq!(catalog.search_products("").await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let catalog = instant()
            .with_policy(no_backoff(2))
            .failing_times(2, "503");

        assert_eq!(catalog.fetch_products().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_persistent_failure_surfaces() {
        let catalog = instant().with_policy(no_backoff(2)).failing("offline");

        let err = catalog.fetch_products().await.unwrap_err();
        assert!(matches!(err, CommerceError::CatalogUnavailable(ref m) if m.contains("offline")));
    }
}
