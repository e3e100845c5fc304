//! Checkout session creation handler.
//!
//! Creates a hosted checkout session with the processor, then records a
//! pending payment. If the second write fails the session still exists on
//! the processor side; no compensating transaction is attempted.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use vitrine_checkout::{minor_units, NewCheckoutSession};

use crate::state::AppState;

/// Request body for initiating a checkout.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Buyer email; also the webhook correlation key later on.
    pub email: String,
    /// Amount in major currency units.
    pub amount: Decimal,
}

/// Success response carrying the hosted checkout redirect.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// URL the buyer is redirected to.
    pub url: String,
}

/// Failure response with a free-text error.
#[derive(Debug, Serialize)]
pub struct CheckoutErrorResponse {
    /// Human-readable error description.
    pub error: String,
}

/// Handles `POST /create-checkout-session`.
#[instrument(
    name = "create_checkout_session",
    skip(state, request),
    fields(email = %request.email, amount = %request.amount)
)]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Response {
    if request.email.trim().is_empty() {
        warn!("checkout rejected: empty email");
        return error_response(StatusCode::BAD_REQUEST, "email is required");
    }

    let unit_amount = match minor_units(request.amount) {
        Ok(unit_amount) => unit_amount,
        Err(e) => {
            warn!(error = %e, "checkout rejected: bad amount");
            return error_response(StatusCode::BAD_REQUEST, &e.to_string());
        },
    };

    let session = match state
        .checkout
        .create_session(NewCheckoutSession {
            customer_email: request.email.clone(),
            unit_amount,
        })
        .await
    {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "processor rejected checkout session");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        },
    };

    // Session creation and the payment write are not atomic; a failure here
    // leaves an orphaned session at the processor.
    match state.payments.create_payment(request.email, request.amount).await {
        Ok(payment) => {
            info!(payment_id = %payment.id, session_id = %session.id, "pending payment recorded");
            (StatusCode::OK, Json(CheckoutResponse { url: session.url })).into_response()
        },
        Err(e) => {
            error!(error = %e, session_id = %session.id, "failed to record pending payment");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        },
    }
}

fn error_response(status: StatusCode, error: &str) -> Response {
    (status, Json(CheckoutErrorResponse { error: error.to_string() })).into_response()
}
