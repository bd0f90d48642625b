//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use snack_cache::Cache;
use snack_commerce::cart::{CartStore, PricingRules};
use snack_commerce::search::ProductFilterStore;
use snack_data::{MockCatalog, MockReliabilityScorer};
use tracing::debug;

use crate::config::CliConfig;
use crate::output::Output;

const CONFIG_NAMES: [&str; 3] = ["snack.toml", ".snack.toml", "snack.json"];

/// Execution context for CLI commands.
///
/// Owns the stores and the data sources for the lifetime of one command.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration was loaded from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Persisted cart.
    pub cart: CartStore,
    /// Catalog and filtered view.
    pub filters: ProductFilterStore,
    /// Catalog source.
    pub catalog: MockCatalog,
    /// Reliability scoring service.
    pub scorer: MockReliabilityScorer,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };
        if let Some(path) = &config_path {
            output.debug(&format!("Using config: {}", path.display()));
        }

        let storage_dir = resolve_path(&cwd, &config.storage.dir);
        let cache = Cache::open(&storage_dir)
            .with_context(|| format!("Failed to open cart storage: {}", storage_dir.display()))?;
        let cart = CartStore::open(cache);
        debug!(dir = %storage_dir.display(), lines = cart.lines().len(), "cart opened");

        let catalog = MockCatalog::new()
            .with_latency(config.catalog.latency())
            .with_policy(config.catalog.policy());

        let mut scorer = MockReliabilityScorer::new()
            .with_latency(config.scoring.latency())
            .with_policy(config.scoring.policy());
        if config.scoring.fail {
            scorer = scorer.failing("scoring disabled by configuration");
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            cart,
            filters: ProductFilterStore::new(),
            catalog,
            scorer,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Pricing rules for order summaries.
    pub fn pricing(&self) -> PricingRules {
        self.config.pricing.rules()
    }

    /// Directory of the persisted cart.
    pub fn storage_dir(&self) -> PathBuf {
        resolve_path(&self.cwd, &self.config.storage.dir)
    }
}

/// Resolve a path relative to the working directory.
fn resolve_path(cwd: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        cwd.join(path)
    }
}
