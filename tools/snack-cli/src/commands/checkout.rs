//! Checkout command.

use anyhow::Result;
use chrono::Utc;
use console::style;
use serde_json::json;
use snack_commerce::cart::OrderSummary;
use snack_commerce::checkout::{CheckoutFlow, CheckoutStep, Notifier, RecordingNotifier};

use super::cart::print_summary;
use super::CheckoutArgs;
use crate::context::Context;
use crate::output::{format_price, severity_badge, step_badge, ConsoleNotifier};

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &mut Context) -> Result<()> {
    let pricing = ctx.pricing();

    if ctx.cart.is_empty() {
        if ctx.output.is_json() {
            ctx.output.json(&json!({
                "step": CheckoutStep::Complete.as_str(),
                "warning_count": 0,
                "summary": OrderSummary::calculate(&ctx.cart, &pricing),
            }));
        } else {
            ctx.output.info("Your cart is empty");
        }
        return Ok(());
    }

    let mut flow = CheckoutFlow::new();
    if !args.skip_analysis {
        // Notices are replayed once the spinner is gone so they don't tear it.
        let notices = RecordingNotifier::new();
        let spinner = ctx.output.spinner(CheckoutStep::Analyzing.display_name());
        flow.run(&mut ctx.cart, &ctx.scorer, &notices).await;
        spinner.finish_and_clear();

        let console = ConsoleNotifier::new(&ctx.output);
        for (level, message) in notices.notices() {
            console.notify(level, &message);
        }
    }

    let summary = OrderSummary::calculate(&ctx.cart, &pricing);

    if ctx.output.is_json() {
        let warnings: Vec<_> = ctx
            .cart
            .lines()
            .iter()
            .filter_map(|line| line.warning.as_ref())
            .collect();
        ctx.output.json(&json!({
            "checkout_id": flow.id().as_str(),
            "step": flow.step().as_str(),
            "analyzed_at": Utc::now().to_rfc3339(),
            "warning_count": ctx.cart.warning_count(),
            "banner": flow.banner(&ctx.cart),
            "failure": flow.failure(),
            "can_proceed_to_payment": flow.can_proceed_to_payment(),
            "warnings": warnings,
            "summary": summary,
        }));
        return Ok(());
    }

    ctx.output.header(&format!("Checkout {}", flow.id()));
    ctx.output.kv("reliability", &step_badge(flow.step()));

    if let Some(banner) = flow.banner(&ctx.cart) {
        ctx.output.line("");
        ctx.output.line(&style(format!("⚠ {}", banner)).yellow().bold().to_string());
        ctx.output.line(
            "Some items in your cart may have reliability issues. \
             Review the warnings below before proceeding.",
        );
    }

    ctx.output.line("");
    for line in ctx.cart.lines() {
        let total = line
            .line_total()
            .map(|t| format_price(&t))
            .unwrap_or_else(|| "-".to_string());
        ctx.output.list_item(&format!(
            "{} x{}  {}",
            line.product.name, line.quantity, total
        ));
        if let Some(warning) = &line.warning {
            ctx.output.line(&format!(
                "      [{}] {}",
                severity_badge(warning.severity),
                warning.message
            ));
            if let Some(details) = &warning.details {
                ctx.output.line(&format!("      {}", style(details).dim()));
            }
        }
    }

    print_summary(&summary, &pricing, &ctx.output);

    ctx.output.line("");
    if flow.step() == CheckoutStep::Error {
        ctx.output
            .warn("Reliability check unavailable; you can still proceed to payment");
    }
    if flow.can_proceed_to_payment() {
        ctx.output.success(&format!(
            "Ready for payment: {}",
            format_price(&summary.total)
        ));
    }

    Ok(())
}
