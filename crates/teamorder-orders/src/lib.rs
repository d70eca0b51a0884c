//! Order-store adapter: reads order rows from a CSV export (local file or
//! HTTP) and records generated invoice ids back into the store.

pub mod client;
pub mod error;
pub mod parse;
mod retry;

pub use client::OrderStoreClient;
pub use error::OrderStoreError;
pub use parse::{load_orders_file, parse_orders_csv};
