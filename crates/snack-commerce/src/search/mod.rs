//! Search module.
//!
//! Contains the filter criteria and the store that derives the visible
//! product list from the catalog.

mod filter;
mod store;

pub use filter::FilterCriteria;
pub use store::{CatalogStatus, ProductFilterStore};
