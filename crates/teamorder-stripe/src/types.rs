//! Request inputs and response shapes for the subset of the Stripe API used
//! for invoicing. Only the fields we read are modeled; Stripe objects carry
//! many more.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StripeCustomer {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CustomerList {
    pub data: Vec<StripeCustomer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StripeInvoice {
    pub id: String,
    /// `draft`, `open`, `paid`, `uncollectible` or `void`.
    pub status: Option<String>,
    pub number: Option<String>,
    pub hosted_invoice_url: Option<String>,
    /// Smallest currency unit.
    pub amount_due: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StripeInvoiceItem {
    pub id: String,
    pub amount: i64,
    pub invoice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub code: Option<String>,
}

/// Customer fields sent on creation.
#[derive(Debug, Clone, Copy)]
pub struct NewCustomer<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
}

/// One invoice item attached to a draft invoice.
#[derive(Debug, Clone, Copy)]
pub struct NewInvoiceItem<'a> {
    pub customer_id: &'a str,
    pub invoice_id: &'a str,
    /// Smallest currency unit.
    pub amount: i64,
    pub currency: &'a str,
    pub description: &'a str,
    /// Tax rate ids to apply; empty for non-taxable lines.
    pub tax_rates: &'a [String],
}
