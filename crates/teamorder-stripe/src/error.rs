use thiserror::Error;

/// Errors returned by the Stripe API client.
#[derive(Debug, Error)]
pub enum StripeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe answered with a non-2xx status and an error envelope.
    #[error("Stripe API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Stripe's `error.type`, e.g. `"invalid_request_error"`.
        kind: Option<String>,
        code: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
