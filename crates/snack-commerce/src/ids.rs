//! Newtype IDs for type-safe identifiers.
//!
//! Product identifiers are numeric in the catalog; producer and checkout
//! identifiers are opaque strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric catalog identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Create a product ID.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw numeric value.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Macro to generate string-backed newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A string identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProducerId);
define_id!(CheckoutId);

impl CheckoutId {
    /// Generate an identifier for a new checkout session.
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};

        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let millis = chrono::Utc::now().timestamp_millis();
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("chk_{:x}_{:x}", millis, counter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_display() {
        assert_eq!(ProductId::new(101).to_string(), "101");
    }

    #[test]
    fn test_product_id_serializes_as_number() {
        let json = serde_json::to_string(&ProductId::new(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_producer_id_from_str() {
        let id: ProducerId = "PROD-001".into();
        assert_eq!(id.as_str(), "PROD-001");
    }

    #[test]
    fn test_checkout_id_generation() {
        let a = CheckoutId::generate();
        let b = CheckoutId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("chk_"));
    }
}
