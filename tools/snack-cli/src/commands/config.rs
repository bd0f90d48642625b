//! Configuration management commands.

use anyhow::{bail, Context as _, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force, as_json } => init_config(force, as_json, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("[storage]");
    ctx.output.kv("dir", &ctx.storage_dir().display().to_string());

    ctx.output.info("[catalog]");
    ctx.output.kv("latency_ms", &config.catalog.latency_ms.to_string());
    ctx.output.kv("lookup_latency_ms", &config.catalog.lookup_latency_ms.to_string());
    ctx.output.kv("search_latency_ms", &config.catalog.search_latency_ms.to_string());
    ctx.output.kv("timeout_ms", &config.catalog.timeout_ms.to_string());
    ctx.output.kv("max_retries", &config.catalog.max_retries.to_string());

    ctx.output.info("[scoring]");
    ctx.output.kv("latency_ms", &config.scoring.latency_ms.to_string());
    ctx.output.kv("timeout_ms", &config.scoring.timeout_ms.to_string());
    ctx.output.kv("max_retries", &config.scoring.max_retries.to_string());
    ctx.output.kv("fail", &config.scoring.fail.to_string());

    ctx.output.info("[pricing]");
    ctx.output.kv("tax_rate_percent", &config.pricing.tax_rate_percent.to_string());
    ctx.output.kv(
        "free_shipping_threshold",
        &config.pricing.free_shipping_threshold.to_string(),
    );
    ctx.output.kv("shipping_fee", &config.pricing.shipping_fee.to_string());

    Ok(())
}

fn init_config(force: bool, as_json: bool, ctx: &Context) -> Result<()> {
    let file_name = if as_json { "snack.json" } else { "snack.toml" };
    let config_path = ctx.cwd.join(file_name);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if as_json {
        let path = config_path.to_str().context("Config path is not valid UTF-8")?;
        CliConfig::default().save(path)?;
    } else {
        std::fs::write(&config_path, generate_default_config())
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
    }

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    let errors = ctx.config.validate();

    if errors.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }
    bail!("Configuration has {} error(s)", errors.len());
}
