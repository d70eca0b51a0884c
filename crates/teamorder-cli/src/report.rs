//! Plain-text rendering of an [`InvoicePlan`] for the terminal.

use rust_decimal::Decimal;
use teamorder_pricing::{to_minor_units, InvoicePlan, InvoiceRequest, MinimumPolicy};

/// Renders `value` the way it will be billed: rounded to cents.
pub(crate) fn fmt_money(value: Decimal) -> String {
    Decimal::new(to_minor_units(value), 2).to_string()
}

/// Full preview report. With `customer`, only that customer's section and
/// the batch-wide combination table are shown.
pub(crate) fn render_plan(plan: &InvoicePlan, customer: Option<&str>, generated_at: &str) -> String {
    let mut out = Vec::new();

    let policy = match plan.policy {
        MinimumPolicy::Enforce => "enforced",
        MinimumPolicy::Bypass => "bypassed",
    };
    out.push(format!("Order preview ({generated_at})"));
    out.push(format!(
        "Minimum quantity: {} ({policy})",
        plan.minimum_quantity
    ));
    out.push(String::new());

    out.push(format!(
        "{:<32}{:>7}  {:<16}ELIGIBLE",
        "COMBINATION", "COUNT", "TIER"
    ));
    for combo in &plan.combinations {
        out.push(format!(
            "{:<32}{:>7}  {:<16}{}",
            combo.key.to_string(),
            combo.count,
            combo.tier_label.as_deref().unwrap_or("-"),
            if combo.eligible { "yes" } else { "no" }
        ));
    }

    let wanted = customer.map(|c| c.trim().to_lowercase());
    let selected = |email: &str| wanted.as_deref().is_none_or(|w| w == email);

    let excluded: Vec<_> = plan
        .excluded_items
        .iter()
        .filter(|e| selected(&e.email))
        .collect();
    if !excluded.is_empty() {
        out.push(String::new());
        out.push("Excluded (below minimum):".to_string());
        for item in excluded {
            out.push(format!(
                "  {}  {} (batch count {})",
                item.email, item.key, item.batch_count
            ));
        }
    }

    let skipped: Vec<_> = plan
        .skipped_items
        .iter()
        .filter(|s| selected(&s.email))
        .collect();
    if !skipped.is_empty() {
        out.push(String::new());
        out.push("Skipped (cannot be priced):".to_string());
        for item in skipped {
            out.push(format!("  {}  {}", item.email, item.error));
        }
    }

    out.push(String::new());
    let requests: Vec<&InvoiceRequest> = plan
        .requests
        .iter()
        .filter(|r| selected(&r.email))
        .collect();
    if requests.is_empty() {
        out.push("No invoices to create.".to_string());
    } else {
        out.push(format!(
            "{:<36}{:>6}{:>12}{:>10}{:>10}{:>12}",
            "CUSTOMER", "ITEMS", "SUBTOTAL", "TAX", "FEE", "TOTAL"
        ));
        for request in &requests {
            out.push(format!(
                "{:<36}{:>6}{:>12}{:>10}{:>10}{:>12}",
                request.email,
                request.items.len(),
                fmt_money(request.totals.subtotal),
                fmt_money(request.totals.tax),
                fmt_money(request.totals.processing_fee),
                fmt_money(request.totals.total),
            ));
        }
        let total: Decimal = requests.iter().map(|r| r.totals.total).sum();
        let currency = requests[0].currency.to_uppercase();
        out.push(format!("Grand total: {} {currency}", fmt_money(total)));
    }

    for email in plan.skipped_customers.iter().filter(|e| selected(e)) {
        out.push(format!("No invoice: {email}"));
    }

    out.join("\n")
}
