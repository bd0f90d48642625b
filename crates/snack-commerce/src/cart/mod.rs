//! Shopping cart module.
//!
//! Contains cart lines, the persisted cart store, and the order summary.

mod cart;
mod pricing;
mod store;

pub use cart::{CartLine, CartState, MAX_QUANTITY_PER_LINE};
pub use pricing::{OrderSummary, PricingRules};
pub use store::{CartStore, CART_STORAGE_KEY};
