//! HTTP request handlers for the Vitrine API.
//!
//! Handlers are grouped by functionality:
//! - `submit` - contact-form intake
//! - `checkout` - hosted checkout session creation
//! - `webhook` - payment processor callbacks
//! - `health` - liveness probes
//!
//! Upstream-service failures (store, mailer, processor) surface as generic
//! 500-class responses with a free-text error message; webhook
//! authentication failures are 400-class and mutate nothing.

pub mod checkout;
pub mod health;
pub mod submit;
pub mod webhook;

pub use checkout::create_checkout_session;
pub use health::{health_check, root};
pub use submit::submit_form;
pub use webhook::receive_webhook;
