//! Payment processor webhook handler.
//!
//! The body is taken as raw `Bytes` and never re-serialized before
//! verification: the signature covers the exact bytes on the wire. Order of
//! operations is fixed — verify, parse, reconcile, acknowledge — and
//! verification failure takes no state action.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, instrument, warn};
use vitrine_checkout::{verify_signature, ProcessorEvent};

use crate::state::AppState;

/// Header the processor sends its signature in.
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Acknowledgment body returned for every accepted delivery.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Delivery acknowledgment flag; the processor only checks the status.
    pub received: bool,
}

/// Failure response with a free-text error.
#[derive(Debug, Serialize)]
pub struct WebhookErrorResponse {
    /// Human-readable error description.
    pub error: String,
}

/// Handles `POST /webhook`.
///
/// Responds 2xx for every authenticated delivery whether or not a payment
/// matched, so the processor stops redelivering. A store failure responds
/// 500 on purpose: redelivery is safe because reconciliation is idempotent.
#[instrument(name = "receive_webhook", skip_all, fields(payload_size = body.len()))]
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let verification =
        verify_signature(&body, signature, &state.webhook_secret, Utc::now().timestamp());
    if !verification.is_valid {
        let reason = verification.error_message.unwrap_or_else(|| "invalid signature".to_string());
        warn!(%reason, "webhook signature verification failed");
        return error_response(StatusCode::BAD_REQUEST, &format!("Webhook Error: {reason}"));
    }

    let event = match ProcessorEvent::parse(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "authenticated webhook payload failed to parse");
            return error_response(StatusCode::BAD_REQUEST, &format!("Webhook Error: {e}"));
        },
    };

    match state.reconciler.apply(&event).await {
        Ok(outcome) => {
            debug!(?outcome, kind = %event.kind, "webhook processed");
            (StatusCode::OK, Json(WebhookResponse { received: true })).into_response()
        },
        Err(e) => {
            error!(error = %e, "reconciliation store write failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        },
    }
}

fn error_response(status: StatusCode, error: &str) -> Response {
    (status, Json(WebhookErrorResponse { error: error.to_string() })).into_response()
}
