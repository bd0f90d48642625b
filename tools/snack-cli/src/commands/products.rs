//! Catalog browsing commands.

use anyhow::{bail, Result};
use serde_json::json;
use snack_commerce::catalog::{CatalogSource, Product};
use snack_commerce::{CommerceError, ProductId};

use super::{FilterArgs, ProductsArgs, ProductsCommand};
use crate::context::Context;
use crate::output::{format_price, format_tags};

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &mut Context) -> Result<()> {
    match args.command {
        Some(ProductsCommand::Show { id }) => show_product(id, ctx).await,
        Some(ProductsCommand::Search { query }) => search_products(&query, ctx).await,
        None => list_products(&args.filter, ctx).await,
    }
}

async fn list_products(filter: &FilterArgs, ctx: &mut Context) -> Result<()> {
    ctx.filters.set_loading();
    let spinner = ctx.output.spinner("Loading products...");
    let fetched = ctx.catalog.fetch_products().await;
    spinner.finish_and_clear();

    match fetched {
        Ok(products) => ctx.filters.set_catalog(products),
        Err(e) => {
            ctx.filters.set_error(e.to_string());
            bail!("Failed to load products: {}", e);
        }
    }
    ctx.filters.set_filter_criteria(filter.criteria());

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "status": ctx.filters.status().as_str(),
            "criteria": ctx.filters.criteria(),
            "total": ctx.filters.catalog().len(),
            "count": ctx.filters.filtered().len(),
            "products": ctx.filters.filtered(),
        }));
        return Ok(());
    }

    ctx.output.header(&format!(
        "Products ({} of {})",
        ctx.filters.filtered().len(),
        ctx.filters.catalog().len()
    ));
    if ctx.filters.filtered().is_empty() {
        ctx.output.info("No products match the current filters");
        return Ok(());
    }
    print_table(ctx.filters.filtered(), ctx);

    Ok(())
}

async fn search_products(query: &str, ctx: &mut Context) -> Result<()> {
    let spinner = ctx.output.spinner("Searching...");
    let found = ctx.catalog.search_products(query).await;
    spinner.finish_and_clear();
    let products = found?;

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header(&format!("Results for \"{}\"", query));
    if products.is_empty() {
        ctx.output.info("No products found");
        return Ok(());
    }
    print_table(&products, ctx);

    Ok(())
}

async fn show_product(id: u64, ctx: &mut Context) -> Result<()> {
    let spinner = ctx.output.spinner("Looking up product...");
    let found = ctx.catalog.fetch_product(ProductId::new(id)).await;
    spinner.finish_and_clear();

    let Some(product) = found? else {
        return Err(CommerceError::ProductNotFound(id).into());
    };

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("id", &product.id.to_string());
    ctx.output.kv("producer", product.producer_id.as_str());
    ctx.output.kv("price", &format_price(&product.price));
    ctx.output.kv("available", &product.available_quantity.to_string());
    ctx.output.kv("allergens", &format_tags(&product.allergens));
    ctx.output.kv("free from", &format_tags(&product.free_from));
    ctx.output.kv("image", &product.image_url);
    let in_cart = ctx.cart.item_quantity(product.id);
    if in_cart > 0 {
        ctx.output.kv("in cart", &in_cart.to_string());
    }

    Ok(())
}

fn print_table(products: &[Product], ctx: &Context) {
    let widths = [5, 24, 10, 9, 7, 16, 7];
    ctx.output.table_row(
        &["ID", "NAME", "PRODUCER", "PRICE", "STOCK", "ALLERGENS", "IN CART"],
        &widths,
    );
    for product in products {
        let id = product.id.to_string();
        let price = format_price(&product.price);
        let stock = product.available_quantity.to_string();
        let allergens = format_tags(&product.allergens);
        let in_cart = match ctx.cart.item_quantity(product.id) {
            0 => String::new(),
            n => n.to_string(),
        };
        ctx.output.table_row(
            &[
                &id,
                &product.name,
                product.producer_id.as_str(),
                &price,
                &stock,
                &allergens,
                &in_cart,
            ],
            &widths,
        );
    }
}
