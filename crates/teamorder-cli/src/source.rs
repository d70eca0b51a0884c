//! Where order rows come from: a local CSV file or the order store export.

use std::path::Path;

use teamorder_core::{AppConfig, OrderRow};
use teamorder_orders::{load_orders_file, OrderStoreClient};

/// Loads the batch from `input` when given, otherwise from the order store.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, if no input was
/// given and `TEAMORDER_ORDERS_URL` is unset, or if the export fetch fails.
pub(crate) async fn load_rows(
    config: &AppConfig,
    input: Option<&Path>,
) -> anyhow::Result<Vec<OrderRow>> {
    if let Some(path) = input {
        let rows = load_orders_file(path)?;
        tracing::info!(path = %path.display(), rows = rows.len(), "loaded order rows from file");
        return Ok(rows);
    }

    let url = config.orders_url.as_deref().ok_or_else(|| {
        anyhow::anyhow!("no --input file given and TEAMORDER_ORDERS_URL is not set")
    })?;
    let client = OrderStoreClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_ms,
    )?;
    Ok(client.fetch_rows(url).await?)
}
