//! Shared test fixtures: the router wired to in-memory fakes.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use vitrine_api::{create_router, AppState};
use vitrine_checkout::client::mock::RecordingProvider;
use vitrine_core::store::memory::MemoryStore;
use vitrine_mailer::client::mock::RecordingMailer;

/// Signing secret shared between test deliveries and the router under test.
pub const WEBHOOK_SECRET: &str = "whsec_test123secret456";

/// Router under test plus handles to its fakes for verification.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub provider: Arc<RecordingProvider>,
}

/// Builds the full router over in-memory fakes.
pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let provider = Arc::new(RecordingProvider::default());

    let state = AppState::new(
        store.clone(),
        store.clone(),
        mailer.clone(),
        provider.clone(),
        WEBHOOK_SECRET.to_string(),
    );

    TestApp { router: create_router(state), store, mailer, provider }
}

/// Posts a JSON body and returns status plus parsed response body.
pub async fn post_json(
    router: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");

    let response = router.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body reads");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

/// Posts a raw webhook body with an optional signature header.
pub async fn post_webhook(
    router: &Router,
    payload: &[u8],
    signature: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json");

    if let Some(signature) = signature {
        builder = builder.header("Stripe-Signature", signature);
    }

    let request = builder.body(Body::from(payload.to_vec())).expect("request builds");

    let response = router.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body reads");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}
