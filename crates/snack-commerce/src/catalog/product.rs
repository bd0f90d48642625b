//! Product type.

use crate::ids::{ProducerId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// Products are immutable once fetched; the cart copies the record into its
/// lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Producer that supplies this product.
    pub producer_id: ProducerId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Units available from the producer.
    pub available_quantity: u32,
    /// Allergens contained in the product.
    #[serde(default)]
    pub allergens: Vec<String>,
    /// Allergens the product is free from.
    #[serde(default)]
    pub free_from: Vec<String>,
    /// Image reference.
    #[serde(default)]
    pub image_url: String,
}

impl Product {
    /// Create a product with no allergen information and no image.
    pub fn new(
        id: impl Into<ProductId>,
        producer_id: impl Into<ProducerId>,
        name: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            producer_id: producer_id.into(),
            name: name.into(),
            price,
            available_quantity: 0,
            allergens: Vec::new(),
            free_from: Vec::new(),
            image_url: String::new(),
        }
    }

    /// Set the available quantity.
    pub fn with_available_quantity(mut self, quantity: u32) -> Self {
        self.available_quantity = quantity;
        self
    }

    /// Set the allergen tags.
    pub fn with_allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allergens = allergens.into_iter().map(Into::into).collect();
        self
    }

    /// Set the free-from tags.
    pub fn with_free_from<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.free_from = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the image reference.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Check whether the product carries the given allergen tag.
    pub fn contains_allergen(&self, allergen: &str) -> bool {
        self.allergens.iter().any(|a| a == allergen)
    }

    /// Check whether the name, numeric id or producer id contains `needle`.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.id.to_string().contains(needle)
            || self.producer_id.as_str().to_lowercase().contains(needle)
    }

    /// Check if the producer has stock available.
    pub fn is_available(&self) -> bool {
        self.available_quantity > 0
    }
}
