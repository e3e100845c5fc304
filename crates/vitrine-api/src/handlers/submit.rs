//! Contact-form submission handler.
//!
//! Persists the submission, then sends one confirmation email. The two
//! steps are not transactional: a mailer failure leaves the stored
//! submission in place and reports a generic failure to the caller.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use vitrine_core::NewSubmission;
use vitrine_mailer::template;

use crate::state::AppState;

/// Request body for a contact-form submission.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Visitor name.
    pub name: String,
    /// Visitor email the confirmation is sent to.
    pub email: String,
    /// Message body.
    pub message: String,
}

/// Success response for a stored submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

/// Failure response with a free-text error.
#[derive(Debug, Serialize)]
pub struct SubmitErrorResponse {
    /// Always `false` on the failure path.
    pub success: bool,
    /// Human-readable error description.
    pub error: String,
}

/// Handles `POST /submit` (and its `/api/form` alias).
///
/// Persists exactly one submission and triggers exactly one email send
/// attempt addressed to the submitter.
#[instrument(name = "submit_form", skip(state, request), fields(email = %request.email))]
pub async fn submit_form(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Response {
    if request.email.trim().is_empty() {
        warn!("submission rejected: empty email");
        return error_response(StatusCode::BAD_REQUEST, "email is required");
    }

    let new = NewSubmission {
        name: request.name.clone(),
        email: request.email.clone(),
        message: request.message.clone(),
    };

    let submission = match state.submissions.create_submission(new).await {
        Ok(submission) => submission,
        Err(e) => {
            error!(error = %e, "failed to store submission");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        },
    };

    info!(submission_id = %submission.id, "submission stored");

    let email = template::confirmation(&request.email, &request.name, &request.message);
    if let Err(e) = state.mailer.send(email).await {
        // The submission stays stored; partial success is accepted here.
        error!(error = %e, submission_id = %submission.id, "confirmation email failed");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
    }

    (
        StatusCode::OK,
        Json(SubmitResponse { success: true, message: "Form saved & email sent".to_string() }),
    )
        .into_response()
}

fn error_response(status: StatusCode, error: &str) -> Response {
    (status, Json(SubmitErrorResponse { success: false, error: error.to_string() }))
        .into_response()
}
