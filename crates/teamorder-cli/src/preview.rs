use std::path::Path;

use chrono::{SecondsFormat, Utc};
use teamorder_core::{load_pricing, AppConfig};
use teamorder_pricing::{plan_invoices, MinimumPolicy};

use crate::report::render_plan;
use crate::source::load_rows;

/// Prices the batch and prints the report. Never calls the invoicing API.
///
/// # Errors
///
/// Returns an error if the pricing file is invalid or the rows cannot be
/// loaded.
pub(crate) async fn run_preview(
    config: &AppConfig,
    input: Option<&Path>,
    ignore_minimum: bool,
    customer: Option<&str>,
) -> anyhow::Result<()> {
    let pricing = load_pricing(&config.pricing_path)?;
    let rows = load_rows(config, input).await?;

    let policy = if ignore_minimum {
        tracing::warn!("minimum quantity bypassed; preview only");
        MinimumPolicy::Bypass
    } else {
        MinimumPolicy::Enforce
    };
    let plan = plan_invoices(&rows, &pricing, policy);

    let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    println!("{}", render_plan(&plan, customer, &generated_at));
    Ok(())
}
