//! Product catalog module.
//!
//! Contains the product record and the collaborator that supplies it.

mod product;
mod source;

pub use product::Product;
pub use source::CatalogSource;
