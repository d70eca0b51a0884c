use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub pricing_path: PathBuf,
    /// CSV export endpoint of the order store. `None` means rows must come
    /// from a local file.
    pub orders_url: Option<String>,
    /// Endpoint that records generated invoice ids back into the order store.
    pub orders_writeback_url: Option<String>,
    pub stripe_secret_key: Option<String>,
    pub stripe_base_url: String,
    pub days_until_due: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("pricing_path", &self.pricing_path)
            .field("orders_url", &self.orders_url)
            .field(
                "orders_writeback_url",
                &self.orders_writeback_url.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "stripe_secret_key",
                &self.stripe_secret_key.as_ref().map(|_| "[redacted]"),
            )
            .field("stripe_base_url", &self.stripe_base_url)
            .field("days_until_due", &self.days_until_due)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
