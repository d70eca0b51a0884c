pub mod client;
pub mod error;
mod retry;
pub mod types;

pub use client::StripeClient;
pub use error::StripeError;
pub use types::{NewCustomer, NewInvoiceItem, StripeCustomer, StripeInvoice, StripeInvoiceItem};
