//! Payment processor integration for the Vitrine portfolio backend.
//!
//! Covers both directions of the payment flow: creating hosted checkout
//! sessions, and reconciling payment status from the processor's signed
//! webhook event stream.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod event;
pub mod reconcile;
pub mod signature;

pub use client::{
    minor_units, CheckoutConfig, CheckoutProvider, CheckoutSession, NewCheckoutSession,
    StripeCheckoutClient,
};
pub use error::{CheckoutError, Result};
pub use event::{ProcessorEvent, CHECKOUT_SESSION_COMPLETED};
pub use reconcile::{ReconcileOutcome, Reconciler};
pub use signature::{verify_signature, ValidationResult};
