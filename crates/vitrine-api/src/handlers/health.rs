//! Liveness handlers.
//!
//! The hosting platform probes `GET /`; without a root route it reports the
//! deployment as broken, so the banner stays even though `/health` is the
//! real probe target.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Timestamp when the check was performed.
    pub timestamp: DateTime<Utc>,
}

/// Root banner route.
pub async fn root() -> &'static str {
    "Portfolio backend is running"
}

/// JSON health probe.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy", timestamp: Utc::now() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_healthy() {
        let response = health_check().await;
        assert_eq!(response.0.status, "healthy");
    }
}
