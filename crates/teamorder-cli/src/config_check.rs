//! `config check`: load the pricing file and print what it resolved to.

use std::path::Path;

use teamorder_core::{load_pricing, PricingConfig};

use crate::report::fmt_money;

/// # Errors
///
/// Returns the [`teamorder_core::ConfigError`] if the file is missing,
/// malformed, or fails validation.
pub(crate) fn run_config_check(path: &Path) -> anyhow::Result<()> {
    let pricing = load_pricing(path)?;
    tracing::info!(path = %path.display(), "pricing file is valid");
    println!("{}: OK", path.display());
    println!("{}", render_summary(&pricing));
    Ok(())
}

fn render_summary(pricing: &PricingConfig) -> String {
    let fee = |f: Option<rust_decimal::Decimal>| f.map_or_else(|| "none".to_string(), fmt_money);

    let mut out = vec![
        format!("currency: {}", pricing.currency),
        format!("tax rate: {}", pricing.tax_rate),
        format!(
            "tax handling: {}",
            pricing
                .tax_rate_id
                .as_deref()
                .map_or_else(|| "sales tax line".to_string(), |id| format!("tax rate {id}"))
        ),
        format!("minimum quantity: {}", pricing.minimum_quantity),
        format!(
            "fees: embroidery {}, logo {}, folding {}",
            fee(pricing.embroidery_fee),
            fee(pricing.logo_fee),
            fee(pricing.folding_fee)
        ),
        format!(
            "processing fee: {} + {}",
            pricing.processing_fee.percent,
            fmt_money(pricing.processing_fee.flat)
        ),
        "tiers:".to_string(),
    ];
    for tier in pricing.tiers.iter() {
        out.push(format!("  {:>5}  {}", tier.min_qty, tier.label));
    }
    out.push("color groups:".to_string());
    for (label, synonyms) in pricing.color_groups.groups() {
        out.push(format!("  {label}: {}", synonyms.join(", ")));
    }
    out.push("products:".to_string());
    for (name, table) in &pricing.products {
        let prices: Vec<String> = table
            .iter()
            .map(|(tier, price)| format!("{tier}: {}", fmt_money(*price)))
            .collect();
        out.push(format!("  {name}  {}", prices.join(", ")));
    }
    out.join("\n")
}
