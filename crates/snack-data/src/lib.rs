//! Data access layer for the storefront.
//!
//! This crate provides:
//! - `FetchClient` - Timeout and retry wrapper for data source calls
//! - `DependencyTag` - Semantic dependency categories
//! - `TimeoutConfig` - Per-dependency timeouts
//! - `RetryPolicy` - Retry strategies
//! - `MockCatalog` - Fixture-backed [`CatalogSource`](snack_commerce::catalog::CatalogSource)
//! - `MockReliabilityScorer` - Fixture-backed [`ReliabilityScorer`](snack_commerce::checkout::ReliabilityScorer)

mod catalog;
mod client;
mod dependency;
mod error;
mod fault;
pub mod fixtures;
mod reliability;
mod retry;
mod timeout;

pub use catalog::*;
pub use client::*;
pub use dependency::*;
pub use error::*;
pub use reliability::*;
pub use retry::*;
pub use timeout::*;
