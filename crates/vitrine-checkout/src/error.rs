//! Error types for payment processor operations.

use thiserror::Error;

/// Result type alias using `CheckoutError`.
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Errors raised while talking to the payment processor.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Client could not be constructed from the given configuration.
    #[error("checkout configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure reaching the processor API.
    #[error("processor transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Processor rejected the session request.
    #[error("processor rejected request with status {status}: {message}")]
    Api {
        /// HTTP status returned by the processor.
        status: u16,
        /// Error body from the processor, truncated.
        message: String,
    },

    /// Amount cannot be expressed in whole minor units.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Webhook payload was authenticated but could not be parsed.
    #[error("malformed event payload: {0}")]
    MalformedEvent(#[from] serde_json::Error),
}
