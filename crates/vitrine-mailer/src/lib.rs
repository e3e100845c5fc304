//! Transactional email for the Vitrine portfolio backend.
//!
//! One concern: send a templated confirmation message after a contact-form
//! submission. No queuing, no retry, no delivery tracking.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod template;

pub use client::{HttpMailer, Mailer, MailerConfig, OutgoingEmail};
pub use error::{MailerError, Result};
