use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty values count as unset so `.env` templates can leave slots blank.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("TEAMORDER_LOG_LEVEL", "info");
    let pricing_path = PathBuf::from(or_default(
        "TEAMORDER_PRICING_PATH",
        "./config/pricing.yaml",
    ));

    let orders_url = optional("TEAMORDER_ORDERS_URL");
    let orders_writeback_url = optional("TEAMORDER_ORDERS_WRITEBACK_URL");
    let stripe_secret_key = optional("STRIPE_SECRET_KEY");
    let stripe_base_url = or_default("TEAMORDER_STRIPE_BASE_URL", "https://api.stripe.com/");

    let days_until_due = parse_u32("TEAMORDER_DAYS_UNTIL_DUE", "14")?;
    let request_timeout_secs = parse_u64("TEAMORDER_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TEAMORDER_USER_AGENT", "teamorder/0.1 (invoicing)");
    let max_retries = parse_u32("TEAMORDER_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("TEAMORDER_RETRY_BACKOFF_BASE_MS", "500")?;

    Ok(AppConfig {
        log_level,
        pricing_path,
        orders_url,
        orders_writeback_url,
        stripe_secret_key,
        stripe_base_url,
        days_until_due,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
