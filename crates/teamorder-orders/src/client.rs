//! HTTP client for the order store's CSV export and invoice write-back.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;
use teamorder_core::OrderRow;

use crate::error::OrderStoreError;
use crate::parse::parse_orders_csv;
use crate::retry::retry_with_backoff;

/// Client for the order store.
///
/// Transient failures (network errors, 429, 5xx) are retried with
/// exponential backoff up to `max_retries` additional attempts.
pub struct OrderStoreClient {
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

#[derive(Debug, Serialize)]
struct InvoiceRecord<'a> {
    email: &'a str,
    invoice_id: &'a str,
}

impl OrderStoreClient {
    /// # Errors
    ///
    /// Returns [`OrderStoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, OrderStoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Downloads the CSV export at `url` and decodes it into order rows.
    ///
    /// # Errors
    ///
    /// - [`OrderStoreError::InvalidUrl`] if `url` does not parse.
    /// - [`OrderStoreError::UnexpectedStatus`] on a non-2xx response after retries.
    /// - [`OrderStoreError::Http`] on network failure after retries.
    /// - [`OrderStoreError::Csv`] if the body is not valid CSV (not retried).
    pub async fn fetch_rows(&self, url: &str) -> Result<Vec<OrderRow>, OrderStoreError> {
        let url = parse_url(url)?;
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .header(reqwest::header::ACCEPT, "text/csv")
                    .send()
                    .await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(OrderStoreError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Ok(response.text().await?)
            }
        })
        .await?;

        let rows = parse_orders_csv(body.as_bytes())?;
        tracing::info!(rows = rows.len(), "fetched order rows");
        Ok(rows)
    }

    /// Records `invoice_id` against `email` in the order store.
    ///
    /// # Errors
    ///
    /// - [`OrderStoreError::InvalidUrl`] if `writeback_url` does not parse.
    /// - [`OrderStoreError::UnexpectedStatus`] on a non-2xx response after retries.
    /// - [`OrderStoreError::Http`] on network failure after retries.
    pub async fn record_invoice(
        &self,
        writeback_url: &str,
        email: &str,
        invoice_id: &str,
    ) -> Result<(), OrderStoreError> {
        let url = parse_url(writeback_url)?;
        let record = InvoiceRecord { email, invoice_id };
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let record = &record;
            async move {
                let response = self.client.post(url.clone()).json(record).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(OrderStoreError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Ok(())
            }
        })
        .await?;

        tracing::debug!(email, invoice_id, "recorded invoice id in order store");
        Ok(())
    }
}

fn parse_url(raw: &str) -> Result<Url, OrderStoreError> {
    Url::parse(raw.trim()).map_err(|e| OrderStoreError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
