//! Webhook event payload parsing.
//!
//! The processor wraps every notification in an event envelope. Only the
//! fields reconciliation needs are deserialized; everything else in the
//! payload is ignored. Parsing happens strictly after signature
//! verification, which runs on the raw bytes.

use serde::Deserialize;

use crate::error::Result;

/// Event kind that settles a payment.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// A processor webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessorEvent {
    /// Event kind, e.g. `checkout.session.completed`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Event payload.
    #[serde(default)]
    pub data: EventData,
}

/// Payload wrapper inside the event envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventData {
    /// The object the event describes; a checkout session for the kinds
    /// this system handles.
    #[serde(default)]
    pub object: EventObject,
}

/// The session object carried by checkout events.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventObject {
    /// Processor-side session identifier.
    ///
    /// Present in the payload but deliberately unused for correlation; see
    /// the correlation notes on `Payment`.
    #[serde(default)]
    pub id: Option<String>,

    /// Customer email the session was created with.
    #[serde(default)]
    pub customer_email: Option<String>,
}

impl ProcessorEvent {
    /// Parses an event from a raw, already-authenticated payload.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MalformedEvent` if the payload is not a valid
    /// event envelope.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Whether this event settles a checkout session.
    pub fn is_checkout_completed(&self) -> bool {
        self.kind == CHECKOUT_SESSION_COMPLETED
    }

    /// Customer email carried by the event, if any.
    pub fn customer_email(&self) -> Option<&str> {
        self.data.object.customer_email.as_deref()
    }
}
