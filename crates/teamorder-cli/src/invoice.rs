//! `invoice`: submit every invoice request in the plan to Stripe.
//!
//! The plan is always built with the minimum enforced. Customers are
//! processed one at a time; a failure is logged and the run moves on to the
//! next customer. Nothing already created for a failed customer is rolled
//! back, so the log carries the invoice id for manual cleanup.

use std::path::PathBuf;

use teamorder_core::{load_pricing, AppConfig};
use teamorder_orders::OrderStoreClient;
use teamorder_pricing::{plan_invoices, InvoiceRequest, MinimumPolicy};
use teamorder_stripe::{NewCustomer, NewInvoiceItem, StripeClient, StripeError};

use crate::report::fmt_money;
use crate::source::load_rows;

#[derive(Debug, Clone, Default)]
pub(crate) struct InvoiceOptions {
    pub input: Option<PathBuf>,
    pub customer: Option<String>,
    pub send: bool,
    pub dry_run: bool,
}

/// What the invoicing API returned for one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubmittedInvoice {
    pub invoice_id: String,
    pub number: Option<String>,
    pub hosted_invoice_url: Option<String>,
    pub sent: bool,
}

/// A submission that stopped part-way. `invoice_id` is set when the draft
/// invoice already exists.
#[derive(Debug)]
pub(crate) struct SubmitFailure {
    pub invoice_id: Option<String>,
    pub source: StripeError,
}

/// # Errors
///
/// Returns an error before any submission if the pricing file, rows or
/// credentials are unusable, and after the run if any customer failed.
pub(crate) async fn run_invoice(config: &AppConfig, options: &InvoiceOptions) -> anyhow::Result<()> {
    if !options.dry_run && config.stripe_secret_key.is_none() {
        anyhow::bail!("STRIPE_SECRET_KEY must be set to create invoices");
    }

    let pricing = load_pricing(&config.pricing_path)?;
    let rows = load_rows(config, options.input.as_deref()).await?;
    let plan = plan_invoices(&rows, &pricing, MinimumPolicy::Enforce);

    let requests: Vec<&InvoiceRequest> = match options.customer.as_deref() {
        Some(email) => {
            let request = plan
                .request_for(email)
                .ok_or_else(|| anyhow::anyhow!("no invoice to create for customer '{email}'"))?;
            vec![request]
        }
        None => plan.requests.iter().collect(),
    };

    if options.dry_run {
        println!("{}", serde_json::to_string_pretty(&requests)?);
        return Ok(());
    }
    if requests.is_empty() {
        println!("no invoices to create");
        return Ok(());
    }

    let stripe = StripeClient::with_base_url(
        config.stripe_secret_key.as_deref().unwrap_or_default(),
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_ms,
        &config.stripe_base_url,
    )?;
    let order_store = match config.orders_writeback_url.as_deref() {
        Some(url) => Some((
            OrderStoreClient::new(
                config.request_timeout_secs,
                &config.user_agent,
                config.max_retries,
                config.retry_backoff_base_ms,
            )?,
            url,
        )),
        None => None,
    };
    let tax_rates: Vec<String> = pricing.tax_rate_id.iter().cloned().collect();

    let mut failed = 0usize;
    for request in &requests {
        match submit_invoice(
            &stripe,
            request,
            &tax_rates,
            config.days_until_due,
            options.send,
        )
        .await
        {
            Ok(submitted) => {
                tracing::info!(
                    email = %request.email,
                    invoice_id = %submitted.invoice_id,
                    number = submitted.number.as_deref().unwrap_or("draft"),
                    total = %fmt_money(request.totals.total),
                    sent = submitted.sent,
                    "invoice created"
                );
                println!(
                    "{:<36}{:<32}{:>12}  {}",
                    request.email,
                    submitted.invoice_id,
                    fmt_money(request.totals.total),
                    submitted.hosted_invoice_url.as_deref().unwrap_or("")
                );
                if let Some((client, url)) = &order_store {
                    if let Err(e) = client
                        .record_invoice(url, &request.email, &submitted.invoice_id)
                        .await
                    {
                        tracing::warn!(
                            email = %request.email,
                            invoice_id = %submitted.invoice_id,
                            error = %e,
                            "failed to record invoice id in order store"
                        );
                    }
                }
            }
            Err(failure) => {
                failed += 1;
                tracing::error!(
                    email = %request.email,
                    invoice_id = failure.invoice_id.as_deref().unwrap_or("none"),
                    error = %failure.source,
                    "invoice submission failed"
                );
            }
        }
    }

    println!(
        "{} of {} invoices created",
        requests.len() - failed,
        requests.len()
    );
    if failed > 0 {
        anyhow::bail!("{failed} invoice(s) failed; see log for details");
    }
    Ok(())
}

/// Creates (or reuses) the customer, builds a draft invoice from the
/// request's lines, finalizes it, and optionally sends it.
///
/// # Errors
///
/// Returns a [`SubmitFailure`] carrying the first API error and, once the
/// draft exists, its invoice id.
pub(crate) async fn submit_invoice(
    stripe: &StripeClient,
    request: &InvoiceRequest,
    tax_rates: &[String],
    days_until_due: u32,
    send: bool,
) -> Result<SubmittedInvoice, SubmitFailure> {
    let before_invoice = |source| SubmitFailure {
        invoice_id: None,
        source,
    };

    let customer = stripe
        .find_or_create_customer(&NewCustomer {
            name: &request.name,
            email: &request.email,
            phone: Some(request.phone.as_str()),
        })
        .await
        .map_err(before_invoice)?;

    let draft = stripe
        .create_invoice(&customer.id, days_until_due)
        .await
        .map_err(before_invoice)?;
    let after_invoice = |source| SubmitFailure {
        invoice_id: Some(draft.id.clone()),
        source,
    };

    for line in &request.lines {
        let rates: &[String] = if line.taxable { tax_rates } else { &[] };
        stripe
            .add_invoice_item(&NewInvoiceItem {
                customer_id: &customer.id,
                invoice_id: &draft.id,
                amount: line.amount_cents,
                currency: &line.currency,
                description: &line.description,
                tax_rates: rates,
            })
            .await
            .map_err(after_invoice)?;
    }

    let finalized = stripe
        .finalize_invoice(&draft.id)
        .await
        .map_err(after_invoice)?;
    if send {
        stripe
            .send_invoice(&finalized.id)
            .await
            .map_err(after_invoice)?;
    }

    Ok(SubmittedInvoice {
        invoice_id: finalized.id,
        number: finalized.number,
        hosted_invoice_url: finalized.hosted_invoice_url,
        sent: send,
    })
}

#[cfg(test)]
#[path = "invoice_test.rs"]
mod tests;
