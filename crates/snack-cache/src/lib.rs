//! Type-safe key-value storage for Snack Overflow.
//!
//! Provides a small, ergonomic API for keeping client state across restarts
//! with automatic JSON serialization. Two backends ship with the crate: a
//! directory of JSON files for real use and an in-memory map for tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use snack_cache::Cache;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Cart {
//!     items: Vec<CartItem>,
//! }
//!
//! let cache = Cache::open(".snack")?;
//!
//! // Store a value
//! cache.set("cart-storage", &cart)?;
//!
//! // Retrieve a value
//! let cart: Option<Cart> = cache.get("cart-storage")?;
//!
//! // Delete a value
//! cache.delete("cart-storage")?;
//! ```

mod backend;
mod error;
mod kv;

pub use backend::{FileBackend, KvBackend, MemoryBackend};
pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileBackend, KvBackend, MemoryBackend};
}
