//! HTTP client for the Stripe REST API (customers, invoices, invoice items).
//!
//! Requests are form-encoded with bearer auth. Non-2xx responses are decoded
//! from Stripe's `{"error": {...}}` envelope into [`StripeError::Api`].

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::StripeError;
use crate::retry::retry_with_backoff;
use crate::types::{
    CustomerList, ErrorEnvelope, NewCustomer, NewInvoiceItem, StripeCustomer, StripeInvoice,
    StripeInvoiceItem,
};

const DEFAULT_BASE_URL: &str = "https://api.stripe.com/";

type Form = Vec<(&'static str, String)>;

/// Client for the Stripe invoicing endpoints.
///
/// Use [`StripeClient::new`] for production or [`StripeClient::with_base_url`]
/// to point at a mock server in tests.
pub struct StripeClient {
    client: Client,
    secret_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl StripeClient {
    /// Creates a client pointed at the production Stripe API.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        secret_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, StripeError> {
        Self::with_base_url(
            secret_key,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StripeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        secret_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, StripeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| StripeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            secret_key: secret_key.to_owned(),
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Looks up the first customer with exactly this email.
    ///
    /// # Errors
    ///
    /// - [`StripeError::Api`] if Stripe rejects the request.
    /// - [`StripeError::Http`] on network failure.
    /// - [`StripeError::Deserialize`] if the response shape is unexpected.
    pub async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StripeCustomer>, StripeError> {
        let mut url = self.endpoint("v1/customers")?;
        url.query_pairs_mut()
            .append_pair("email", email)
            .append_pair("limit", "1");
        let list: CustomerList = self.get(url, "customers.list").await?;
        Ok(list.data.into_iter().next())
    }

    /// # Errors
    ///
    /// Same as [`StripeClient::find_customer_by_email`].
    pub async fn create_customer(
        &self,
        customer: &NewCustomer<'_>,
    ) -> Result<StripeCustomer, StripeError> {
        let mut form: Form = vec![
            ("name", customer.name.to_owned()),
            ("email", customer.email.to_owned()),
        ];
        if let Some(phone) = customer.phone.filter(|p| !p.trim().is_empty()) {
            form.push(("phone", phone.to_owned()));
        }
        let url = self.endpoint("v1/customers")?;
        self.post(url, &form, "customers.create").await
    }

    /// Returns the existing customer for `customer.email`, creating one when
    /// none exists.
    ///
    /// # Errors
    ///
    /// Same as [`StripeClient::find_customer_by_email`].
    pub async fn find_or_create_customer(
        &self,
        customer: &NewCustomer<'_>,
    ) -> Result<StripeCustomer, StripeError> {
        if let Some(existing) = self.find_customer_by_email(customer.email).await? {
            tracing::debug!(customer_id = %existing.id, "reusing existing Stripe customer");
            return Ok(existing);
        }
        let created = self.create_customer(customer).await?;
        tracing::info!(customer_id = %created.id, "created Stripe customer");
        Ok(created)
    }

    /// Creates a draft invoice that will be emailed to the customer with
    /// `days_until_due` to pay. Pending items from other runs are excluded.
    ///
    /// # Errors
    ///
    /// Same as [`StripeClient::find_customer_by_email`].
    pub async fn create_invoice(
        &self,
        customer_id: &str,
        days_until_due: u32,
    ) -> Result<StripeInvoice, StripeError> {
        let form: Form = vec![
            ("customer", customer_id.to_owned()),
            ("collection_method", "send_invoice".to_owned()),
            ("days_until_due", days_until_due.to_string()),
            ("auto_advance", "false".to_owned()),
            ("pending_invoice_items_behavior", "exclude".to_owned()),
        ];
        let url = self.endpoint("v1/invoices")?;
        self.post(url, &form, "invoices.create").await
    }

    /// # Errors
    ///
    /// Same as [`StripeClient::find_customer_by_email`].
    pub async fn add_invoice_item(
        &self,
        item: &NewInvoiceItem<'_>,
    ) -> Result<StripeInvoiceItem, StripeError> {
        let mut form: Form = vec![
            ("customer", item.customer_id.to_owned()),
            ("invoice", item.invoice_id.to_owned()),
            ("amount", item.amount.to_string()),
            ("currency", item.currency.to_owned()),
            ("description", item.description.to_owned()),
        ];
        for rate in item.tax_rates {
            form.push(("tax_rates[]", rate.clone()));
        }
        let url = self.endpoint("v1/invoiceitems")?;
        self.post(url, &form, "invoiceitems.create").await
    }

    /// # Errors
    ///
    /// Same as [`StripeClient::find_customer_by_email`].
    pub async fn finalize_invoice(&self, invoice_id: &str) -> Result<StripeInvoice, StripeError> {
        let url = self.endpoint(&format!("v1/invoices/{invoice_id}/finalize"))?;
        self.post(url, &Form::new(), "invoices.finalize").await
    }

    /// # Errors
    ///
    /// Same as [`StripeClient::find_customer_by_email`].
    pub async fn send_invoice(&self, invoice_id: &str) -> Result<StripeInvoice, StripeError> {
        let url = self.endpoint(&format!("v1/invoices/{invoice_id}/send"))?;
        self.post(url, &Form::new(), "invoices.send").await
    }

    fn endpoint(&self, path: &str) -> Result<Url, StripeError> {
        self.base_url
            .join(path)
            .map_err(|e| StripeError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T, StripeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url)
                    .bearer_auth(&self.secret_key)
                    .send()
                    .await?;
                decode(response, context).await
            }
        })
        .await
    }

    /// Sends a form POST. One idempotency key covers every retry of this
    /// call.
    async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        form: &Form,
        context: &str,
    ) -> Result<T, StripeError> {
        let idempotency_key = uuid::Uuid::new_v4().to_string();
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let idempotency_key = idempotency_key.clone();
            async move {
                let response = self
                    .client
                    .post(url)
                    .bearer_auth(&self.secret_key)
                    .header("Idempotency-Key", idempotency_key)
                    .form(form)
                    .send()
                    .await?;
                decode(response, context).await
            }
        })
        .await
    }
}

/// Parses a 2xx body as `T`, or turns an error response into
/// [`StripeError::Api`].
async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, StripeError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body));
    }
    serde_json::from_str(&body).map_err(|e| StripeError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

fn api_error(status: u16, body: &str) -> StripeError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => StripeError::Api {
            status,
            message: envelope
                .error
                .message
                .unwrap_or_else(|| "unknown error".to_string()),
            kind: envelope.error.kind,
            code: envelope.error.code,
        },
        Err(_) => StripeError::Api {
            status,
            message: body.chars().take(200).collect(),
            kind: None,
            code: None,
        },
    }
}
