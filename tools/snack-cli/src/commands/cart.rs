//! Cart commands.

use anyhow::Result;
use serde_json::json;
use snack_commerce::cart::{CartStore, OrderSummary, PricingRules};
use snack_commerce::catalog::CatalogSource;
use snack_commerce::{CommerceError, ProductId};

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::{format_price, severity_badge, Output};

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &mut Context) -> Result<()> {
    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {}
        CartCommand::Add { id, quantity } => add_item(id, quantity, ctx).await?,
        CartCommand::Remove { id } => remove_item(id, ctx),
        CartCommand::Set { id, quantity } => set_quantity(id, quantity, ctx),
        CartCommand::Clear => {
            ctx.cart.clear_cart();
            ctx.output.success("Cart cleared");
        }
    }

    print_cart(&ctx.cart, &ctx.pricing(), &ctx.output);
    Ok(())
}

async fn add_item(id: u64, quantity: u32, ctx: &mut Context) -> Result<()> {
    let product_id = ProductId::new(id);
    let spinner = ctx.output.spinner("Looking up product...");
    let found = ctx.catalog.fetch_product(product_id).await;
    spinner.finish_and_clear();

    let Some(product) = found? else {
        return Err(CommerceError::ProductNotFound(id).into());
    };

    let target = i64::from(ctx.cart.item_quantity(product_id)) + i64::from(quantity);
    ctx.cart.add_item(&product);
    if quantity > 1 {
        ctx.cart.update_quantity(product_id, target);
    }

    ctx.output.success(&format!(
        "Added {} x {} to cart",
        quantity.max(1),
        product.name
    ));
    Ok(())
}

fn remove_item(id: u64, ctx: &mut Context) {
    let product_id = ProductId::new(id);
    if ctx.cart.item_quantity(product_id) == 0 {
        ctx.output.warn(&format!("Product {} is not in the cart", id));
    }
    ctx.cart.remove_item(product_id);
}

fn set_quantity(id: u64, quantity: i64, ctx: &mut Context) {
    let product_id = ProductId::new(id);
    if ctx.cart.item_quantity(product_id) == 0 {
        ctx.output.warn(&format!("Product {} is not in the cart", id));
        return;
    }
    ctx.cart.update_quantity(product_id, quantity);
    if quantity <= 0 {
        ctx.output.success(&format!("Removed product {}", id));
    }
}

/// Print the cart lines followed by the order summary.
pub fn print_cart(cart: &CartStore, pricing: &PricingRules, output: &Output) {
    let summary = OrderSummary::calculate(cart, pricing);

    if output.is_json() {
        output.json(&json!({
            "items": cart.lines(),
            "total_items": cart.total_items(),
            "total_price": cart.total_price(),
            "summary": summary,
        }));
        return;
    }

    output.header(&format!("Cart ({} items)", cart.total_items()));
    if cart.is_empty() {
        output.info("Your cart is empty");
        return;
    }

    let widths = [5, 24, 5, 9, 10, 8];
    output.table_row(&["ID", "NAME", "QTY", "PRICE", "TOTAL", "RISK"], &widths);
    for line in cart.lines() {
        let id = line.product.id.to_string();
        let qty = line.quantity.to_string();
        let price = format_price(&line.product.price);
        let total = line
            .line_total()
            .map(|t| format_price(&t))
            .unwrap_or_else(|| "-".to_string());
        let risk = line
            .warning
            .as_ref()
            .map(|w| severity_badge(w.severity).to_string())
            .unwrap_or_default();
        output.table_row(&[&id, &line.product.name, &qty, &price, &total, &risk], &widths);
    }

    print_summary(&summary, pricing, output);
}

/// Print the order summary block.
pub fn print_summary(summary: &OrderSummary, pricing: &PricingRules, output: &Output) {
    output.line("");
    output.kv("Subtotal", &format_price(&summary.subtotal));
    output.kv(
        &format!("Tax ({}%)", pricing.tax_rate_percent),
        &format_price(&summary.tax),
    );
    let shipping = if summary.ships_free() {
        "FREE".to_string()
    } else {
        format_price(&summary.shipping)
    };
    output.kv("Shipping", &shipping);
    output.kv("Total", &format_price(&summary.total));

    if let Some(remaining) = summary.free_shipping_remaining {
        output.info(&format!(
            "Add {} more for free shipping",
            format_price(&remaining)
        ));
    }
}
