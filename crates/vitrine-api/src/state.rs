//! Shared application state injected into handlers.
//!
//! All external-service handles (store, mailer, checkout provider) are
//! initialized once at startup and injected here behind trait objects, so
//! tests can substitute in-memory fakes without touching the handlers.

use std::sync::Arc;

use vitrine_checkout::{client::CheckoutProvider, Reconciler};
use vitrine_core::store::{PaymentStore, SubmissionStore};
use vitrine_mailer::Mailer;

/// Handles and secrets shared by every request handler.
///
/// Cheap to clone; everything inside is behind an `Arc`. Read-only after
/// initialization.
#[derive(Clone)]
pub struct AppState {
    /// Submission persistence.
    pub submissions: Arc<dyn SubmissionStore>,

    /// Payment persistence.
    pub payments: Arc<dyn PaymentStore>,

    /// Confirmation email dispatch.
    pub mailer: Arc<dyn Mailer>,

    /// Hosted checkout session creation.
    pub checkout: Arc<dyn CheckoutProvider>,

    /// Webhook reconciliation over the payment store.
    pub reconciler: Arc<Reconciler>,

    /// Shared secret for webhook signature verification.
    pub webhook_secret: String,
}

impl AppState {
    /// Assembles application state from its service handles.
    pub fn new(
        submissions: Arc<dyn SubmissionStore>,
        payments: Arc<dyn PaymentStore>,
        mailer: Arc<dyn Mailer>,
        checkout: Arc<dyn CheckoutProvider>,
        webhook_secret: String,
    ) -> Self {
        let reconciler = Arc::new(Reconciler::new(payments.clone()));

        Self { submissions, payments, mailer, checkout, reconciler, webhook_secret }
    }
}
