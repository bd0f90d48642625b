//! Product filter store.

use tokio::sync::watch;
use tracing::debug;

use crate::catalog::Product;
use crate::search::FilterCriteria;

/// Load state of the catalog, for display only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The catalog has been loaded.
    Ready,
    /// The last fetch failed.
    Failed(String),
}

impl CatalogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogStatus::Idle => "idle",
            CatalogStatus::Loading => "loading",
            CatalogStatus::Ready => "ready",
            CatalogStatus::Failed(_) => "failed",
        }
    }
}

/// Holds the full catalog and the filtered view derived from it.
///
/// Every mutating call ends with [`recompute`](Self::recompute), so
/// [`filtered`](Self::filtered) is never stale.
#[derive(Debug)]
pub struct ProductFilterStore {
    catalog: Vec<Product>,
    criteria: FilterCriteria,
    filtered: Vec<Product>,
    status: CatalogStatus,
    revision: u64,
    changes: watch::Sender<u64>,
}

impl ProductFilterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            catalog: Vec::new(),
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            status: CatalogStatus::Idle,
            revision: 0,
            changes,
        }
    }

    /// Replace the catalog wholesale and re-derive the view.
    pub fn set_catalog(&mut self, products: Vec<Product>) {
        debug!(count = products.len(), "catalog replaced");
        self.catalog = products;
        self.status = CatalogStatus::Ready;
        self.recompute();
    }

    /// Merge `update` into the current criteria and re-derive the view.
    pub fn set_filter_criteria(&mut self, update: FilterCriteria) {
        self.criteria.merge(update);
        self.recompute();
    }

    /// Reset the criteria; the view reverts to the full catalog.
    pub fn clear_filter_criteria(&mut self) {
        self.criteria = FilterCriteria::default();
        self.recompute();
    }

    /// Mark a catalog fetch as in flight.
    pub fn set_loading(&mut self) {
        self.status = CatalogStatus::Loading;
        self.bump();
    }

    /// Record a failed catalog fetch. The current catalog is kept.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = CatalogStatus::Failed(message.into());
        self.bump();
    }

    /// Re-derive the filtered view from the catalog and criteria.
    pub fn recompute(&mut self) {
        self.filtered = self
            .catalog
            .iter()
            .filter(|p| self.criteria.matches(p))
            .cloned()
            .collect();
        debug!(
            catalog = self.catalog.len(),
            visible = self.filtered.len(),
            "filtered view recomputed"
        );
        self.bump();
    }

    /// The full catalog.
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    /// The filtered view, in catalog order.
    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    /// The current criteria.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The catalog load status.
    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    /// Monotonic counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Subscribe to revision changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    fn bump(&mut self) {
        self.revision += 1;
        self.changes.send_replace(self.revision);
    }
}

impl Default for ProductFilterStore {
    fn default() -> Self {
        Self::new()
    }
}
