//! Whole-batch run planning: rows in, invoice requests out.
//!
//! The plan is a pure value; submitting it to the invoicing API is the
//! caller's job.

use rust_decimal::Decimal;
use serde::Serialize;
use teamorder_core::{OrderRow, PricingConfig, ProductColorKey, TierId};

use crate::aggregate::{count_by_product_color, group_by_email};
use crate::compose::{build_tier_map, price_item, to_minor_units, PricedItem, TierMap};
use crate::describe::format_item_description;
use crate::eligibility::{filter_by_minimum, MinimumPolicy};
use crate::error::PricingError;
use crate::normalize::combination_key;
use crate::tiers::tier_label;
use crate::totals::OrderTotals;

pub const SALES_TAX_DESCRIPTION: &str = "Sales tax";
pub const PROCESSING_FEE_DESCRIPTION: &str = "Payment processing fee";

/// One line ready for submission, amount in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemRequest {
    pub description: String,
    pub amount_cents: i64,
    pub currency: String,
    pub taxable: bool,
}

/// Everything needed to invoice one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceRequest {
    pub email: String,
    pub name: String,
    pub phone: String,
    pub currency: String,
    pub items: Vec<PricedItem>,
    pub totals: OrderTotals,
    /// Item lines in order, then the sales-tax line (when tax is billed as a
    /// line), then the processing-fee line.
    pub lines: Vec<LineItemRequest>,
}

/// Batch-level view of one combination for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinationSummary {
    pub key: ProductColorKey,
    pub count: u32,
    pub eligible: bool,
    /// `None` for excluded combinations, which are never priced.
    pub tier: Option<TierId>,
    pub tier_label: Option<String>,
}

/// A unit left off an invoice because its combination missed the minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedItem {
    pub email: String,
    pub key: ProductColorKey,
    pub batch_count: u32,
}

/// A unit left off an invoice because it could not be priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub email: String,
    pub product: String,
    pub error: PricingError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePlan {
    pub policy: MinimumPolicy,
    pub minimum_quantity: u32,
    pub combinations: Vec<CombinationSummary>,
    pub tier_map: TierMap,
    pub requests: Vec<InvoiceRequest>,
    pub excluded_items: Vec<ExcludedItem>,
    pub skipped_items: Vec<SkippedItem>,
    /// Customers with no priceable items; no invoice is attempted for them.
    pub skipped_customers: Vec<String>,
}

impl InvoicePlan {
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        self.requests.iter().map(|r| r.totals.total).sum()
    }

    #[must_use]
    pub fn request_for(&self, email: &str) -> Option<&InvoiceRequest> {
        let email = email.trim().to_lowercase();
        self.requests.iter().find(|r| r.email == email)
    }
}

/// Builds invoice requests for every customer in `rows`.
///
/// Counts, eligibility and tiers are computed over the complete batch
/// before any customer is priced.
#[must_use]
pub fn plan_invoices(
    rows: &[OrderRow],
    config: &PricingConfig,
    policy: MinimumPolicy,
) -> InvoicePlan {
    let counts = count_by_product_color(rows, &config.color_groups);
    let partition = filter_by_minimum(&counts, config.minimum_quantity, policy);
    let tier_map = build_tier_map(&partition.eligible, &config.tiers);

    for (key, count) in &partition.excluded {
        tracing::info!(
            combination = %key,
            count,
            minimum = config.minimum_quantity,
            "combination below minimum, excluded from invoicing"
        );
    }

    let combinations = counts
        .iter()
        .map(|(key, &count)| {
            let tier = tier_map.get(key).copied();
            CombinationSummary {
                key: key.clone(),
                count,
                eligible: !partition.excluded.contains_key(key),
                tier,
                tier_label: tier.map(|id| tier_label(id, &config.tiers)),
            }
        })
        .collect();

    let mut requests = Vec::new();
    let mut excluded_items = Vec::new();
    let mut skipped_items = Vec::new();
    let mut skipped_customers = Vec::new();

    for customer in group_by_email(rows) {
        let mut priced = Vec::new();
        for item in &customer.items {
            let key = combination_key(&item.product, &item.color, &config.color_groups);
            if let Some(&batch_count) = partition.excluded.get(&key) {
                excluded_items.push(ExcludedItem {
                    email: customer.email.clone(),
                    key,
                    batch_count,
                });
                continue;
            }
            match price_item(item, &tier_map, config) {
                Ok(p) => priced.push(p),
                Err(e) => {
                    tracing::warn!(
                        email = %customer.email,
                        error = %e,
                        "skipping item that cannot be priced"
                    );
                    skipped_items.push(SkippedItem {
                        email: customer.email.clone(),
                        product: item.product.clone(),
                        error: e,
                    });
                }
            }
        }

        if priced.is_empty() {
            tracing::info!(email = %customer.email, "no eligible items, no invoice");
            skipped_customers.push(customer.email);
            continue;
        }

        let totals = OrderTotals::from_unit_prices(priced.iter().map(|p| p.unit_price), config);
        let lines = emit_lines(&priced, &totals, config);
        requests.push(InvoiceRequest {
            email: customer.email,
            name: customer.name,
            phone: customer.phone,
            currency: config.currency.clone(),
            items: priced,
            totals,
            lines,
        });
    }

    InvoicePlan {
        policy,
        minimum_quantity: config.minimum_quantity,
        combinations,
        tier_map,
        requests,
        excluded_items,
        skipped_items,
        skipped_customers,
    }
}

fn emit_lines(
    priced: &[PricedItem],
    totals: &OrderTotals,
    config: &PricingConfig,
) -> Vec<LineItemRequest> {
    let line = |description: String, amount: Decimal, taxable: bool| LineItemRequest {
        description,
        amount_cents: to_minor_units(amount),
        currency: config.currency.clone(),
        taxable,
    };

    let mut lines: Vec<LineItemRequest> = priced
        .iter()
        .map(|p| line(format_item_description(&p.item), p.unit_price, true))
        .collect();

    // With an invoicing-side tax rate the API computes tax on taxable lines.
    if config.tax_rate_id.is_none() && to_minor_units(totals.tax) > 0 {
        lines.push(line(SALES_TAX_DESCRIPTION.to_string(), totals.tax, false));
    }

    lines.push(line(
        PROCESSING_FEE_DESCRIPTION.to_string(),
        totals.processing_fee,
        false,
    ));

    lines
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
