//! Storefront domain types and client-side state for Snack Overflow.
//!
//! This crate provides the state and derivation pipeline behind the storefront:
//!
//! - **Catalog**: Products and the catalog source collaborator
//! - **Search**: Filter criteria and the product filter store
//! - **Cart**: Cart lines, the persisted cart store, order summaries
//! - **Checkout**: Reliability scoring, warning classification, checkout flow
//!
//! # Example
//!
//! ```rust,ignore
//! use snack_commerce::prelude::*;
//!
//! let mut cart = CartStore::open(Cache::open(".snack")?);
//! cart.add_item(&product);
//!
//! let mut flow = CheckoutFlow::new();
//! flow.run(&mut cart, &scorer, &notifier).await;
//! println!("{} warnings", cart.warning_count());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod cart;
pub mod checkout;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{CatalogSource, Product};

    // Cart
    pub use crate::cart::{CartLine, CartState, CartStore, OrderSummary, PricingRules};

    // Checkout
    pub use crate::checkout::{
        CheckoutEntry, CheckoutFlow, CheckoutStep, Notifier, ProductWarning, ReliabilityScore,
        ReliabilityScorer, ScoringTicket, Severity,
    };

    // Search
    pub use crate::search::{CatalogStatus, FilterCriteria, ProductFilterStore};

    pub use snack_cache::Cache;
}
