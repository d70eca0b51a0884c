//! Shared domain types and configuration for the teamorder workspace.
//!
//! Order rows, customers and line items live in [`orders`]; the pricing
//! file (tiers, price tables, fees, color groups) lives in [`pricing`];
//! process-level settings read from the environment live in [`config`].

pub mod app_config;
pub mod config;
pub mod orders;
pub mod pricing;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use orders::{Customer, LineItem, OrderRow, ProductColorKey};
pub use pricing::{
    load_pricing, parse_pricing, ColorGroups, PriceTable, PricingConfig, ProcessingFee, Tier,
    TierId, TierList,
};

/// Errors raised while loading environment settings or the pricing file.
///
/// Every variant is fatal: the CLI aborts before reading any order rows.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read pricing file {path}: {source}")]
    PricingFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pricing file: {0}")]
    PricingFileParse(#[from] serde_yaml::Error),

    #[error("invalid pricing config: {0}")]
    Validation(String),
}
