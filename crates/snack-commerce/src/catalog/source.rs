//! Catalog source collaborator.

use async_trait::async_trait;

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;

/// Supplies the product catalog.
///
/// Implementations own transport concerns (latency, retries); the stores
/// only ever see the resulting product list or a
/// [`CommerceError::CatalogUnavailable`].
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the full catalog, in display order.
    async fn fetch_products(&self) -> Result<Vec<Product>, CommerceError>;

    /// Fetch a single product, `None` if the id is unknown.
    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, CommerceError>;

    /// Search products whose name or id contains `query`, case-insensitive.
    async fn search_products(&self, query: &str) -> Result<Vec<Product>, CommerceError>;
}
