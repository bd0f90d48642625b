//! Order summary shown next to the checkout lines.

use crate::cart::CartStore;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Tax and shipping rules applied to the cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingRules {
    /// Tax as a percentage of the subtotal.
    pub tax_rate_percent: f64,
    /// Subtotals strictly above this ship for free.
    pub free_shipping_threshold: Money,
    /// Flat shipping fee below the threshold.
    pub shipping_fee: Money,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            tax_rate_percent: 10.0,
            free_shipping_threshold: Money::usd(5000),
            shipping_fee: Money::usd(599),
        }
    }
}

/// Calculated totals for the checkout page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Number of distinct lines.
    pub line_count: usize,
    /// Sum of all line totals.
    pub subtotal: Money,
    /// Tax on the subtotal.
    pub tax: Money,
    /// Shipping charge (zero when free).
    pub shipping: Money,
    /// Subtotal + tax + shipping.
    pub total: Money,
    /// How much more to spend for free shipping, if anything.
    pub free_shipping_remaining: Option<Money>,
    /// Lines carrying a reliability warning.
    pub warning_count: usize,
}

impl OrderSummary {
    /// Summarize the cart under `rules`.
    pub fn calculate(cart: &CartStore, rules: &PricingRules) -> Self {
        let subtotal = cart.total_price();
        let currency = subtotal.currency;
        let tax = subtotal.percentage(rules.tax_rate_percent);

        let free_shipping = subtotal.amount_cents > rules.free_shipping_threshold.amount_cents;
        let shipping = if free_shipping {
            Money::zero(currency)
        } else {
            Money::new(rules.shipping_fee.amount_cents, currency)
        };

        let total = Money::new(
            subtotal
                .amount_cents
                .saturating_add(tax.amount_cents)
                .saturating_add(shipping.amount_cents),
            currency,
        );

        let free_shipping_remaining = (subtotal.amount_cents
            < rules.free_shipping_threshold.amount_cents)
            .then(|| {
                Money::new(
                    rules.free_shipping_threshold.amount_cents - subtotal.amount_cents,
                    currency,
                )
            });

        Self {
            line_count: cart.lines().len(),
            subtotal,
            tax,
            shipping,
            total,
            free_shipping_remaining,
            warning_count: cart.warning_count(),
        }
    }

    /// Check if shipping is free.
    pub fn ships_free(&self) -> bool {
        self.shipping.is_zero()
    }
}
