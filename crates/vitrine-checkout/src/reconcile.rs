//! Payment status reconciliation from processor webhook events.
//!
//! This is the one piece of real state-machine logic in the system. The
//! processor delivers events at least once and in no particular order, so
//! the reconciler must hold one invariant: a payment's status converges to
//! `paid` despite retries, duplicates, and out-of-order delivery.
//!
//! The reconciler runs strictly after signature verification. It filters to
//! completion events, correlates by customer email (the documented weak
//! link), and issues exactly one store write per qualifying event. Events
//! with no matching payment are a silent no-op: the processor only cares
//! about delivery acknowledgment, not business outcome.

use std::sync::Arc;

use tracing::{debug, info, warn};
use vitrine_core::{store::PaymentStore, PaymentId, Result};

use crate::event::ProcessorEvent;

/// What reconciliation did with an event.
///
/// Every variant is acknowledged to the processor with a 2xx; distinguishing
/// them exists for logging and tests, not for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Event kind does not settle payments; acknowledged and dropped.
    Ignored {
        /// The unhandled event kind.
        kind: String,
    },

    /// No payment matched the event's customer email (or the event carried
    /// no email). Acknowledged without any state change.
    NoMatch,

    /// A payment was marked paid. Replays land here too, rewriting the same
    /// row without effect.
    Updated(PaymentId),
}

/// Applies verified processor events to stored payments.
pub struct Reconciler {
    payments: Arc<dyn PaymentStore>,
}

impl Reconciler {
    /// Creates a reconciler over the given payment store.
    pub fn new(payments: Arc<dyn PaymentStore>) -> Self {
        Self { payments }
    }

    /// Applies one authenticated event.
    ///
    /// Idempotent: replaying a completion event against an already-paid
    /// payment is a no-op because the update targets the newest matching
    /// row regardless of its current status.
    ///
    /// # Errors
    ///
    /// Returns an error only when the store write fails. The caller should
    /// respond non-2xx in that case so the processor redelivers; the
    /// redelivery is safe for the same idempotence reason.
    pub async fn apply(&self, event: &ProcessorEvent) -> Result<ReconcileOutcome> {
        if !event.is_checkout_completed() {
            debug!(kind = %event.kind, "ignoring unhandled event kind");
            return Ok(ReconcileOutcome::Ignored { kind: event.kind.clone() });
        }

        let Some(email) = event.customer_email() else {
            warn!("completed session event without customer email");
            return Ok(ReconcileOutcome::NoMatch);
        };

        match self.payments.mark_paid_by_email(email.to_string()).await? {
            Some(payment_id) => {
                info!(%payment_id, "payment marked paid");
                Ok(ReconcileOutcome::Updated(payment_id))
            },
            None => {
                debug!("no payment matched customer email");
                Ok(ReconcileOutcome::NoMatch)
            },
        }
    }
}
