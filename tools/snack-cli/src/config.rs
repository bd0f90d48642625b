//! CLI configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use snack_commerce::cart::PricingRules;
use snack_commerce::{Currency, Money};
use snack_data::{CatalogLatency, FetchPolicy, RetryPolicy, TimeoutConfig};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cart storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Reliability scoring service.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Order summary pricing.
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Check the values for mistakes that would make the CLI misbehave.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.storage.dir.trim().is_empty() {
            errors.push("storage.dir must not be empty".to_string());
        }
        if !(0.0..=100.0).contains(&self.pricing.tax_rate_percent) {
            errors.push("pricing.tax_rate_percent must be 0-100".to_string());
        }
        if self.pricing.free_shipping_threshold < 0.0 {
            errors.push("pricing.free_shipping_threshold must not be negative".to_string());
        }
        if self.pricing.shipping_fee < 0.0 {
            errors.push("pricing.shipping_fee must not be negative".to_string());
        }
        if self.catalog.timeout_ms == 0 {
            errors.push("catalog.timeout_ms must be positive".to_string());
        }
        if self.scoring.timeout_ms == 0 {
            errors.push("scoring.timeout_ms must be positive".to_string());
        }

        errors
    }
}

/// Cart storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the file-backed store, relative to the working directory.
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

fn default_storage_dir() -> String {
    ".snack".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

/// Catalog source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Simulated latency of a full catalog fetch.
    #[serde(default = "default_catalog_latency")]
    pub latency_ms: u64,

    /// Simulated latency of a single product lookup.
    #[serde(default = "default_lookup_latency")]
    pub lookup_latency_ms: u64,

    /// Simulated latency of a product search.
    #[serde(default = "default_search_latency")]
    pub search_latency_ms: u64,

    /// Per-attempt timeout.
    #[serde(default = "default_catalog_timeout")]
    pub timeout_ms: u64,

    /// Retries after a failed attempt.
    #[serde(default = "default_catalog_retries")]
    pub max_retries: u32,
}

fn default_catalog_latency() -> u64 {
    800
}

fn default_lookup_latency() -> u64 {
    300
}

fn default_search_latency() -> u64 {
    400
}

fn default_catalog_timeout() -> u64 {
    3000
}

fn default_catalog_retries() -> u32 {
    2
}

impl CatalogConfig {
    pub fn latency(&self) -> CatalogLatency {
        CatalogLatency {
            list: Duration::from_millis(self.latency_ms),
            lookup: Duration::from_millis(self.lookup_latency_ms),
            search: Duration::from_millis(self.search_latency_ms),
        }
    }

    pub fn policy(&self) -> FetchPolicy {
        fetch_policy(self.timeout_ms, self.max_retries)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_catalog_latency(),
            lookup_latency_ms: default_lookup_latency(),
            search_latency_ms: default_search_latency(),
            timeout_ms: default_catalog_timeout(),
            max_retries: default_catalog_retries(),
        }
    }
}

/// Reliability scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Simulated latency of a scoring request.
    #[serde(default = "default_scoring_latency")]
    pub latency_ms: u64,

    /// Per-attempt timeout.
    #[serde(default = "default_scoring_timeout")]
    pub timeout_ms: u64,

    /// Retries after a failed attempt.
    #[serde(default)]
    pub max_retries: u32,

    /// Make every scoring request fail.
    #[serde(default)]
    pub fail: bool,
}

fn default_scoring_latency() -> u64 {
    1500
}

fn default_scoring_timeout() -> u64 {
    5000
}

impl ScoringConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn policy(&self) -> FetchPolicy {
        fetch_policy(self.timeout_ms, self.max_retries)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_scoring_latency(),
            timeout_ms: default_scoring_timeout(),
            max_retries: 0,
            fail: false,
        }
    }
}

fn fetch_policy(timeout_ms: u64, max_retries: u32) -> FetchPolicy {
    FetchPolicy::new(
        TimeoutConfig::for_attempts(Duration::from_millis(timeout_ms), max_retries),
        RetryPolicy::new(max_retries),
    )
}

/// Pricing configuration, amounts in dollars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_tax_rate")]
    pub tax_rate_percent: f64,

    /// Orders above this subtotal ship free.
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: f64,

    #[serde(default = "default_shipping_fee")]
    pub shipping_fee: f64,
}

fn default_tax_rate() -> f64 {
    10.0
}

fn default_free_shipping_threshold() -> f64 {
    50.0
}

fn default_shipping_fee() -> f64 {
    5.99
}

impl PricingConfig {
    pub fn rules(&self) -> PricingRules {
        PricingRules {
            tax_rate_percent: self.tax_rate_percent,
            free_shipping_threshold: Money::from_decimal(
                self.free_shipping_threshold,
                Currency::USD,
            ),
            shipping_fee: Money::from_decimal(self.shipping_fee, Currency::USD),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate_percent: default_tax_rate(),
            free_shipping_threshold: default_free_shipping_threshold(),
            shipping_fee: default_shipping_fee(),
        }
    }
}

/// Generate a default snack.toml config file.
pub fn generate_default_config() -> String {
    r#"# Snack Overflow storefront configuration

[storage]
# Directory holding the persisted cart
dir = ".snack"

[catalog]
latency_ms = 800
lookup_latency_ms = 300
search_latency_ms = 400
timeout_ms = 3000
max_retries = 2

[scoring]
latency_ms = 1500
timeout_ms = 5000
max_retries = 0
# Set to true to see how checkout behaves when scoring is down
fail = false

[pricing]
tax_rate_percent = 10.0
free_shipping_threshold = 50.0
shipping_fee = 5.99
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_matches_defaults() {
        let parsed: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        let defaults = CliConfig::default();

        assert_eq!(parsed.storage.dir, defaults.storage.dir);
        assert_eq!(parsed.catalog.max_retries, 2);
        assert_eq!(parsed.scoring.latency_ms, defaults.scoring.latency_ms);
        assert!(!parsed.scoring.fail);
        assert_eq!(parsed.pricing.shipping_fee, 5.99);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let parsed: CliConfig = toml::from_str("[scoring]\nfail = true\n").unwrap();
        assert!(parsed.scoring.fail);
        assert_eq!(parsed.scoring.timeout_ms, 5000);
        assert_eq!(parsed.catalog.latency_ms, 800);
        assert_eq!(parsed.pricing.tax_rate_percent, 10.0);
    }

    #[test]
    fn test_pricing_rules_in_cents() {
        let rules = PricingConfig::default().rules();
        assert_eq!(rules.free_shipping_threshold.amount_cents, 5000);
        assert_eq!(rules.shipping_fee.amount_cents, 599);
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snack.json");
        let path = path.to_str().unwrap();

        let mut config = CliConfig::default();
        config.storage.dir = "carts".to_string();
        config.save(path).unwrap();

        let loaded = CliConfig::load(path).unwrap();
        assert_eq!(loaded.storage.dir, "carts");
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let mut config = CliConfig::default();
        assert!(config.validate().is_empty());

        config.pricing.tax_rate_percent = 150.0;
        config.catalog.timeout_ms = 0;
        assert_eq!(config.validate().len(), 2);
    }
}
