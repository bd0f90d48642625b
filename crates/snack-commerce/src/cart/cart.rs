//! Cart state and line types.

use std::collections::HashSet;

use crate::catalog::Product;
use crate::checkout::ProductWarning;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line.
pub const MAX_QUANTITY_PER_LINE: u32 = 9999;

/// One product's entry in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// The product, copied from the catalog.
    #[serde(flatten)]
    pub product: Product,
    /// Quantity, always at least 1.
    pub quantity: u32,
    /// Reliability warning from the last checkout analysis.
    #[serde(default)]
    pub warning: Option<ProductWarning>,
}

impl CartLine {
    /// Create a line with quantity 1.
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
            warning: None,
        }
    }

    /// The product identifier of this line.
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Price x quantity, `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.product.price.try_multiply(i64::from(self.quantity))
    }
}

/// The full cart: lines plus derived totals.
///
/// Totals are only ever written by [`recompute`](Self::recompute); the
/// persisted totals are ignored on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartState {
    items: Vec<CartLine>,
    #[serde(default)]
    total_items: u64,
    #[serde(default)]
    total_price: Money,
}

impl CartState {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            total_price: Money::zero(Currency::USD),
        }
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Sum of price x quantity over all lines.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the line for a product.
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.items.iter().find(|l| l.product.id == product_id)
    }

    pub(crate) fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.items.iter_mut().find(|l| l.product.id == product_id)
    }

    pub(crate) fn lines_mut(&mut self) -> impl Iterator<Item = &mut CartLine> {
        self.items.iter_mut()
    }

    pub(crate) fn push(&mut self, line: CartLine) {
        self.items.push(line);
    }

    /// Remove the line for a product, returning whether one existed.
    pub(crate) fn remove(&mut self, product_id: ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|l| l.product.id != product_id);
        self.items.len() < len_before
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    /// Recompute the totals from the lines.
    pub fn recompute(&mut self) {
        self.total_items = self.items.iter().map(|l| u64::from(l.quantity)).sum();

        let cents: i128 = self
            .items
            .iter()
            .map(|l| i128::from(l.product.price.amount_cents) * i128::from(l.quantity))
            .sum();
        let cents = cents.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        self.total_price = Money::new(cents, Currency::USD);
    }

    /// Repair state read from storage: drop empty and duplicate lines, cap
    /// quantities, then recompute totals.
    pub(crate) fn normalize(&mut self) {
        let mut seen = HashSet::new();
        self.items
            .retain(|l| l.quantity > 0 && seen.insert(l.product.id));
        for line in &mut self.items {
            line.quantity = line.quantity.min(MAX_QUANTITY_PER_LINE);
        }
        self.recompute();
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}
