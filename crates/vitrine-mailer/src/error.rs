//! Error types for email dispatch.

use thiserror::Error;

/// Result type alias using `MailerError`.
pub type Result<T> = std::result::Result<T, MailerError>;

/// Errors raised while sending a transactional email.
#[derive(Debug, Error)]
pub enum MailerError {
    /// Client could not be constructed from the given configuration.
    #[error("mailer configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure reaching the relay.
    #[error("mail transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Relay accepted the connection but rejected the message.
    #[error("mail relay rejected message with status {status}")]
    Rejected {
        /// HTTP status returned by the relay.
        status: u16,
    },

    /// Failure injected by a test double.
    #[error("mail send failed: {0}")]
    SendFailed(String),
}
