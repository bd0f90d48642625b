//! Persisted cart store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snack_cache::Cache;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cart::{CartLine, CartState, MAX_QUANTITY_PER_LINE};
use crate::catalog::Product;
use crate::checkout::ProductWarning;
use crate::ids::ProductId;
use crate::money::Money;

/// Fixed storage key of the persisted cart.
pub const CART_STORAGE_KEY: &str = "cart-storage";

const SNAPSHOT_VERSION: u32 = 1;

/// What is written under [`CART_STORAGE_KEY`].
#[derive(Debug, Serialize, Deserialize)]
struct CartSnapshot {
    version: u32,
    saved_at: DateTime<Utc>,
    state: CartState,
}

/// Owns the cart and keeps its totals and storage in step with every
/// mutation.
///
/// All mutations are synchronous; each one recomputes totals, bumps the
/// revision and writes the full state to storage before returning.
#[derive(Debug)]
pub struct CartStore {
    state: CartState,
    cache: Option<Cache>,
    epoch: u64,
    occupied: bool,
    revision: u64,
    changes: watch::Sender<u64>,
}

impl CartStore {
    /// Create an empty cart that is not persisted.
    pub fn new() -> Self {
        Self::from_parts(CartState::new(), None)
    }

    /// Open the cart persisted in `cache`.
    ///
    /// Missing or unreadable state yields an empty cart.
    pub fn open(cache: Cache) -> Self {
        let state = load_state(&cache);
        Self::from_parts(state, Some(cache))
    }

    fn from_parts(state: CartState, cache: Option<Cache>) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            occupied: !state.is_empty(),
            state,
            cache,
            epoch: 0,
            revision: 0,
            changes,
        }
    }

    /// Add one unit of `product`.
    pub fn add_item(&mut self, product: &Product) {
        match self.state.line_mut(product.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1).min(MAX_QUANTITY_PER_LINE);
                debug!(product_id = %product.id, quantity = line.quantity, "cart line incremented");
            }
            None => {
                self.state.push(CartLine::new(product.clone()));
                debug!(product_id = %product.id, "cart line added");
            }
        }
        self.commit();
    }

    /// Remove the line for `product_id`. Unknown ids are ignored.
    pub fn remove_item(&mut self, product_id: ProductId) {
        if self.state.remove(product_id) {
            debug!(%product_id, "cart line removed");
        }
        self.commit();
    }

    /// Set the quantity of a line. Non-positive quantities remove the line.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        let capped = quantity.min(i64::from(MAX_QUANTITY_PER_LINE)) as u32;
        if let Some(line) = self.state.line_mut(product_id) {
            line.quantity = capped;
            debug!(%product_id, quantity = capped, "cart line quantity set");
        }
        self.commit();
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        self.state.clear();
        debug!("cart cleared");
        self.commit();
    }

    /// Quantity of a product in the cart, 0 if absent.
    pub fn item_quantity(&self, product_id: ProductId) -> u32 {
        self.state.line(product_id).map(|l| l.quantity).unwrap_or(0)
    }

    /// Attach the mapped warning to every line, clearing lines with none.
    ///
    /// Lines are never added or removed here.
    pub fn update_warnings(&mut self, warnings: &HashMap<ProductId, ProductWarning>) {
        for line in self.state.lines_mut() {
            line.warning = warnings.get(&line.product.id).cloned();
        }
        self.commit();
    }

    /// Number of lines carrying a warning.
    pub fn warning_count(&self) -> usize {
        self.state
            .items()
            .iter()
            .filter(|l| l.warning.is_some())
            .count()
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        self.state.items()
    }

    /// Product ids of all lines, in insertion order.
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.state.items().iter().map(|l| l.product_id()).collect()
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> u64 {
        self.state.total_items()
    }

    /// Sum of price x quantity over all lines.
    pub fn total_price(&self) -> Money {
        self.state.total_price()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// The full state.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Counter bumped every time the cart goes from holding lines to empty,
    /// whether by [`clear_cart`](Self::clear_cart) or by removing the last
    /// line.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Monotonic counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Subscribe to revision changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    fn commit(&mut self) {
        let occupied = !self.state.is_empty();
        if self.occupied && !occupied {
            self.epoch += 1;
            debug!(epoch = self.epoch, "cart emptied");
        }
        self.occupied = occupied;
        self.state.recompute();
        self.revision += 1;
        self.persist();
        self.changes.send_replace(self.revision);
    }

    fn persist(&self) {
        let Some(cache) = &self.cache else {
            return;
        };
        let snapshot = CartSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            state: self.state.clone(),
        };
        if let Err(e) = cache.set(CART_STORAGE_KEY, &snapshot) {
            warn!(error = %e, "failed to persist cart");
        }
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

fn load_state(cache: &Cache) -> CartState {
    match cache.get::<CartSnapshot>(CART_STORAGE_KEY) {
        Ok(Some(snapshot)) if snapshot.version == SNAPSHOT_VERSION => {
            let mut state = snapshot.state;
            state.normalize();
            debug!(
                lines = state.items().len(),
                saved_at = %snapshot.saved_at,
                "cart restored"
            );
            state
        }
        Ok(Some(snapshot)) => {
            warn!(version = snapshot.version, "unsupported cart snapshot version, starting empty");
            CartState::new()
        }
        Ok(None) => CartState::new(),
        Err(e) => {
            warn!(error = %e, "stored cart unreadable, starting empty");
            CartState::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{ReliabilityScore, warning};
    use snack_cache::MemoryBackend;

    fn tomatoes() -> Product {
        Product::new(101, "PROD-001", "Organic Tomatoes", Money::usd(499))
    }

    fn mozzarella() -> Product {
        Product::new(102, "PROD-002", "Fresh Mozzarella", Money::usd(850))
            .with_allergens(["Dairy"])
    }

    fn flour() -> Product {
        Product::new(103, "PROD-001", "Whole Wheat Flour", Money::usd(325))
            .with_allergens(["Gluten"])
    }

    fn assert_totals_consistent(cart: &CartStore) {
        let items: u64 = cart.lines().iter().map(|l| u64::from(l.quantity)).sum();
        let price: i64 = cart
            .lines()
            .iter()
            .map(|l| l.product.price.amount_cents * i64::from(l.quantity))
            .sum();
        assert_eq!(cart.total_items(), items);
        assert_eq!(cart.total_price().amount_cents, price);
    }

    #[test]
    fn test_totals_track_every_add() {
        let mut cart = CartStore::new();
        for product in [tomatoes(), mozzarella(), tomatoes(), flour(), tomatoes()] {
            cart.add_item(&product);
            assert_totals_consistent(&cart);
        }
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price().amount_cents, 3 * 499 + 850 + 325);
    }

    #[test]
    fn test_add_twice_increments_single_line() {
        let mut cart = CartStore::new();
        cart.add_item(&tomatoes());
        cart.add_item(&tomatoes());

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_quantity(ProductId::new(101)), 2);
    }

    #[test]
    fn test_update_quantity_non_positive_removes() {
        let mut cart = CartStore::new();
        cart.add_item(&tomatoes());
        cart.add_item(&mozzarella());

        cart.update_quantity(ProductId::new(101), 0);
        assert_eq!(cart.item_quantity(ProductId::new(101)), 0);

        cart.update_quantity(ProductId::new(102), -5);
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert!(cart.total_price().is_zero());
    }

    #[test]
    fn test_update_quantity_sets_absolute_value() {
        let mut cart = CartStore::new();
        cart.add_item(&tomatoes());
        cart.update_quantity(ProductId::new(101), 7);
        assert_eq!(cart.item_quantity(ProductId::new(101)), 7);
        assert_totals_consistent(&cart);

        cart.update_quantity(ProductId::new(101), 3);
        assert_eq!(cart.item_quantity(ProductId::new(101)), 3);
    }

    #[test]
    fn test_update_quantity_unknown_id_does_not_add() {
        let mut cart = CartStore::new();
        cart.update_quantity(ProductId::new(999), 4);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_capped() {
        let mut cart = CartStore::new();
        cart.add_item(&tomatoes());
        cart.update_quantity(ProductId::new(101), i64::MAX);
        assert_eq!(cart.item_quantity(ProductId::new(101)), MAX_QUANTITY_PER_LINE);

        cart.add_item(&tomatoes());
        assert_eq!(cart.item_quantity(ProductId::new(101)), MAX_QUANTITY_PER_LINE);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(&tomatoes());
        cart.remove_item(ProductId::new(555));
        assert_eq!(cart.lines().len(), 1);
        assert_totals_consistent(&cart);
    }

    #[test]
    fn test_clear_cart_resets_totals_and_bumps_epoch() {
        let mut cart = CartStore::new();
        cart.add_item(&tomatoes());
        cart.add_item(&flour());
        let epoch = cart.epoch();

        cart.clear_cart();

        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert!(cart.total_price().is_zero());
        assert_eq!(cart.epoch(), epoch + 1);
    }

    #[test]
    fn test_removing_last_line_bumps_epoch() {
        let mut cart = CartStore::new();
        cart.add_item(&tomatoes());
        cart.add_item(&flour());
        let epoch = cart.epoch();

        cart.remove_item(tomatoes().id);
        assert_eq!(cart.epoch(), epoch);

        cart.update_quantity(flour().id, 0);
        assert!(cart.is_empty());
        assert_eq!(cart.epoch(), epoch + 1);

        // Clearing an already empty cart has nothing left to invalidate.
        cart.clear_cart();
        assert_eq!(cart.epoch(), epoch + 1);
    }

    #[test]
    fn test_update_warnings_attaches_and_clears() {
        let mut cart = CartStore::new();
        cart.add_item(&tomatoes());
        cart.add_item(&mozzarella());
        cart.add_item(&mozzarella());
        let total = cart.total_price();

        let mut warnings = HashMap::new();
        let w = warning::classify(&ReliabilityScore::new(101, 0.35)).unwrap();
        warnings.insert(ProductId::new(101), w);
        // Warnings for products not in the cart never create lines.
        let stray = warning::classify(&ReliabilityScore::new(777, 0.1)).unwrap();
        warnings.insert(ProductId::new(777), stray);

        cart.update_warnings(&warnings);
        assert_eq!(cart.warning_count(), 1);
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.total_price(), total);

        cart.update_warnings(&HashMap::new());
        assert_eq!(cart.warning_count(), 0);
    }

    #[test]
    fn test_persisted_cart_roundtrip() {
        let backend = MemoryBackend::new();
        let mut cart = CartStore::open(Cache::with_backend(backend.clone()));
        cart.add_item(&tomatoes());
        cart.add_item(&mozzarella());
        cart.add_item(&mozzarella());
        cart.add_item(&flour());
        let mut warnings = HashMap::new();
        warnings.insert(
            ProductId::new(102),
            warning::classify(&ReliabilityScore::new(102, 0.55)).unwrap(),
        );
        cart.update_warnings(&warnings);

        // Simulated restart.
        let restored = CartStore::open(Cache::with_backend(backend));

        assert_eq!(restored.state(), cart.state());
        assert_eq!(restored.lines().len(), 3);
        assert_eq!(restored.total_items(), 4);
        assert_eq!(restored.warning_count(), 1);
    }

    #[test]
    fn test_corrupt_storage_yields_empty_cart() {
        let cache = Cache::in_memory();
        cache.set_raw(CART_STORAGE_KEY, b"\x00{ definitely not json").unwrap();

        let cart = CartStore::open(cache);
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_wrong_shape_storage_yields_empty_cart() {
        let cache = Cache::in_memory();
        cache.set(CART_STORAGE_KEY, &vec![1, 2, 3]).unwrap();

        let cart = CartStore::open(cache);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_missing_storage_yields_empty_cart() {
        let cart = CartStore::open(Cache::in_memory());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_restored_totals_are_recomputed() {
        let backend = MemoryBackend::new();
        let cache = Cache::with_backend(backend.clone());
        let mut cart = CartStore::open(cache);
        cart.add_item(&flour());
        cart.add_item(&flour());

        let raw = Cache::with_backend(backend.clone());
        let mut json: serde_json::Value = raw.get(CART_STORAGE_KEY).unwrap().unwrap();
        json["state"]["total_items"] = serde_json::json!(42);
        raw.set(CART_STORAGE_KEY, &json).unwrap();

        let restored = CartStore::open(Cache::with_backend(backend));
        assert_eq!(restored.total_items(), 2);
        assert_eq!(restored.total_price().amount_cents, 650);
    }

    #[test]
    fn test_file_backed_cart_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut cart = CartStore::open(Cache::open(dir.path()).unwrap());
            cart.add_item(&tomatoes());
            cart.update_quantity(ProductId::new(101), 3);
        }

        let restored = CartStore::open(Cache::open(dir.path()).unwrap());
        assert_eq!(restored.item_quantity(ProductId::new(101)), 3);
        assert_eq!(restored.total_price().amount_cents, 3 * 499);
    }

    #[test]
    fn test_clear_is_persisted() {
        let backend = MemoryBackend::new();
        let mut cart = CartStore::open(Cache::with_backend(backend.clone()));
        cart.add_item(&tomatoes());
        cart.clear_cart();

        let restored = CartStore::open(Cache::with_backend(backend));
        assert!(restored.is_empty());
    }

    #[test]
    fn test_every_mutation_bumps_revision() {
        let mut cart = CartStore::new();
        let rx = cart.subscribe();
        cart.add_item(&tomatoes());
        cart.update_quantity(ProductId::new(101), 2);
        cart.remove_item(ProductId::new(101));
        assert_eq!(cart.revision(), 3);
        assert_eq!(*rx.borrow(), 3);
    }
}
