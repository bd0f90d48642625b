//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod products;

use clap::{Args, Subcommand};
use snack_commerce::search::FilterCriteria;
use snack_commerce::{Currency, Money};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: Option<ProductsCommand>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// Show one product.
    Show {
        /// Product ID.
        id: u64,
    },
    /// Search products by name or ID.
    Search {
        /// Text to look for.
        query: String,
    },
}

/// Catalog filters.
#[derive(Args, Default)]
pub struct FilterArgs {
    /// Text matched against name, ID and producer.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Hide products containing this allergen (repeatable or comma-separated).
    #[arg(short = 'x', long = "exclude-allergen", value_delimiter = ',')]
    pub exclude_allergens: Vec<String>,

    /// Minimum price in dollars.
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price in dollars.
    #[arg(long)]
    pub max_price: Option<f64>,
}

impl FilterArgs {
    /// Convert to filter criteria. Absent flags leave the field unset.
    pub fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        if let Some(search) = &self.search {
            criteria = criteria.with_search(search.clone());
        }
        if !self.exclude_allergens.is_empty() {
            criteria = criteria.excluding_allergens(self.exclude_allergens.iter().cloned());
        }
        if let Some(min) = self.min_price {
            criteria = criteria.with_min_price(Money::from_decimal(min, Currency::USD));
        }
        if let Some(max) = self.max_price {
            criteria = criteria.with_max_price(Money::from_decimal(max, Currency::USD));
        }
        criteria
    }
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart (default).
    Show,
    /// Add a product to the cart.
    Add {
        /// Product ID.
        id: u64,
        /// Units to add.
        #[arg(short, long, default_value = "1")]
        quantity: u32,
    },
    /// Remove a product from the cart.
    Remove {
        /// Product ID.
        id: u64,
    },
    /// Set the quantity of a product; zero or less removes it.
    Set {
        /// Product ID.
        id: u64,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove everything from the cart.
    Clear,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Only print the order summary, without the reliability check.
    #[arg(long)]
    pub skip_analysis: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
        /// Write snack.json instead of a commented snack.toml.
        #[arg(long = "as-json")]
        as_json: bool,
    },
    /// Validate the config file.
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_args() {
        assert!(FilterArgs::default().criteria().is_empty());
    }

    #[test]
    fn test_filter_args_to_criteria() {
        let args = FilterArgs {
            search: Some("bread".to_string()),
            exclude_allergens: vec!["Nuts".to_string(), "Dairy".to_string()],
            min_price: Some(5.0),
            max_price: Some(12.5),
        };
        let criteria = args.criteria();

        assert_eq!(criteria.search.as_deref(), Some("bread"));
        assert_eq!(
            criteria.excluded_allergens,
            Some(vec!["Nuts".to_string(), "Dairy".to_string()])
        );
        assert_eq!(criteria.min_price, Some(Money::usd(500)));
        assert_eq!(criteria.max_price, Some(Money::usd(1250)));
    }
}
