//! Product filter criteria.

use crate::catalog::Product;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Criteria applied to the catalog.
///
/// Every field is optional; absent fields do not constrain the result. All
/// present fields compose with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive text matched against name, id and producer id.
    pub search: Option<String>,
    /// Products carrying any of these allergens are excluded.
    pub excluded_allergens: Option<Vec<String>>,
    /// Inclusive lower price bound.
    pub min_price: Option<Money>,
    /// Inclusive upper price bound.
    pub max_price: Option<Money>,
}

impl FilterCriteria {
    /// Create empty criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Set the excluded allergens.
    pub fn excluding_allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_allergens = Some(allergens.into_iter().map(Into::into).collect());
        self
    }

    /// Set the minimum price.
    pub fn with_min_price(mut self, price: Money) -> Self {
        self.min_price = Some(price);
        self
    }

    /// Set the maximum price.
    pub fn with_max_price(mut self, price: Money) -> Self {
        self.max_price = Some(price);
        self
    }

    /// Check whether no field constrains the catalog.
    pub fn is_empty(&self) -> bool {
        self.search_needle().is_none()
            && self.active_allergens().is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// Overlay the fields present in `update` onto these criteria.
    pub fn merge(&mut self, update: FilterCriteria) {
        if update.search.is_some() {
            self.search = update.search;
        }
        if update.excluded_allergens.is_some() {
            self.excluded_allergens = update.excluded_allergens;
        }
        if update.min_price.is_some() {
            self.min_price = update.min_price;
        }
        if update.max_price.is_some() {
            self.max_price = update.max_price;
        }
    }

    /// Check whether a product satisfies every present criterion.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(needle) = self.search_needle() {
            if !product.matches_text(&needle) {
                return false;
            }
        }

        if let Some(allergens) = self.active_allergens() {
            if allergens.iter().any(|a| product.contains_allergen(a)) {
                return false;
            }
        }

        if let Some(min) = self.min_price {
            if product.price.amount_cents < min.amount_cents {
                return false;
            }
        }

        if let Some(max) = self.max_price {
            if product.price.amount_cents > max.amount_cents {
                return false;
            }
        }

        true
    }

    /// Lowercased search text, `None` when absent or empty.
    fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn active_allergens(&self) -> Option<&[String]> {
        self.excluded_allergens
            .as_deref()
            .filter(|allergens| !allergens.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bread() -> Product {
        Product::new(107, "PROD-005", "Sourdough Bread", Money::usd(625)).with_allergens(["Gluten"])
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let criteria = FilterCriteria::new();
        assert!(criteria.is_empty());
        assert!(criteria.matches(&bread()));
    }

    #[test]
    fn test_empty_search_counts_as_absent() {
        let criteria = FilterCriteria::new().with_search("");
        assert!(criteria.is_empty());
        assert!(criteria.matches(&bread()));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        assert!(FilterCriteria::new().with_search("SOUR").matches(&bread()));
        assert!(FilterCriteria::new().with_search("prod-005").matches(&bread()));
        assert!(!FilterCriteria::new().with_search("rye").matches(&bread()));
    }

    #[test]
    fn test_allergen_exclusion() {
        let criteria = FilterCriteria::new().excluding_allergens(["Nuts", "Gluten"]);
        assert!(!criteria.matches(&bread()));

        let criteria = FilterCriteria::new().excluding_allergens(["Dairy"]);
        assert!(criteria.matches(&bread()));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let criteria = FilterCriteria::new()
            .with_min_price(Money::usd(625))
            .with_max_price(Money::usd(625));
        assert!(criteria.matches(&bread()));
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let mut criteria = FilterCriteria::new().with_search("bread");
        criteria.merge(FilterCriteria::new().with_max_price(Money::usd(1000)));

        assert_eq!(criteria.search.as_deref(), Some("bread"));
        assert_eq!(criteria.max_price, Some(Money::usd(1000)));

        criteria.merge(FilterCriteria::new().with_search("eggs"));
        assert_eq!(criteria.search.as_deref(), Some("eggs"));
        assert_eq!(criteria.max_price, Some(Money::usd(1000)));
    }
}
