//! Integration tests for webhook reconciliation over the full HTTP stack.
//!
//! Every delivery is signed with the same HMAC scheme the handler
//! verifies, over the exact bytes the request carries.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use rust_decimal_macros::dec;
use serde_json::json;
use vitrine_checkout::signature::signature_header;
use vitrine_core::PaymentStatus;

use common::{post_webhook, test_app, TestApp, WEBHOOK_SECRET};

fn completed_event(email: &str) -> Vec<u8> {
    json!({
        "id": "evt_1",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_1",
                "customer_email": email
            }
        }
    })
    .to_string()
    .into_bytes()
}

fn sign(payload: &[u8]) -> String {
    signature_header(payload, WEBHOOK_SECRET, Utc::now().timestamp()).expect("valid secret")
}

async fn seed_pending(app: &TestApp, email: &str) {
    use vitrine_core::PaymentStore;

    app.store
        .create_payment(email.to_string(), dec!(25))
        .await
        .expect("seed payment");
}

#[tokio::test]
async fn signed_completed_event_marks_payment_paid() {
    let app = test_app();
    seed_pending(&app, "bo@example.com").await;

    let payload = completed_event("bo@example.com");
    let (status, body) = post_webhook(&app.router, &payload, Some(&sign(&payload))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], json!(true));

    let payments = app.store.payments().await;
    assert_eq!(payments[0].status, PaymentStatus::Paid);
}

#[tokio::test]
async fn redelivery_of_the_same_event_is_idempotent() {
    let app = test_app();
    seed_pending(&app, "bo@example.com").await;

    let payload = completed_event("bo@example.com");

    for _ in 0..3 {
        let (status, body) = post_webhook(&app.router, &payload, Some(&sign(&payload))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["received"], json!(true));
    }

    let payments = app.store.payments().await;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, PaymentStatus::Paid);
}

#[tokio::test]
async fn invalid_signature_is_rejected_without_state_change() {
    let app = test_app();
    seed_pending(&app, "bo@example.com").await;

    let payload = completed_event("bo@example.com");
    let forged =
        signature_header(&payload, "whsec_wrong", Utc::now().timestamp()).expect("valid secret");

    let (status, body) = post_webhook(&app.router, &payload, Some(&forged)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Webhook Error:"));
    assert_eq!(app.store.payments().await[0].status, PaymentStatus::Pending);
}

#[tokio::test]
async fn missing_signature_header_is_rejected() {
    let app = test_app();
    seed_pending(&app, "bo@example.com").await;

    let payload = completed_event("bo@example.com");
    let (status, _) = post_webhook(&app.router, &payload, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.payments().await[0].status, PaymentStatus::Pending);
}

#[tokio::test]
async fn stale_timestamp_is_rejected() {
    let app = test_app();
    seed_pending(&app, "bo@example.com").await;

    let payload = completed_event("bo@example.com");
    let stale = signature_header(&payload, WEBHOOK_SECRET, Utc::now().timestamp() - 3600)
        .expect("valid secret");

    let (status, _) = post_webhook(&app.router, &payload, Some(&stale)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.payments().await[0].status, PaymentStatus::Pending);
}

#[tokio::test]
async fn tampered_body_fails_verification() {
    let app = test_app();
    seed_pending(&app, "bo@example.com").await;

    let payload = completed_event("bo@example.com");
    let header = sign(&payload);
    let tampered = completed_event("mallory@example.com");

    let (status, _) = post_webhook(&app.router, &tampered, Some(&header)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.payments().await[0].status, PaymentStatus::Pending);
}

#[tokio::test]
async fn unhandled_event_kind_is_acknowledged_without_changes() {
    let app = test_app();
    seed_pending(&app, "bo@example.com").await;

    let payload = json!({
        "id": "evt_2",
        "type": "payment_intent.created",
        "data": { "object": { "id": "pi_1" } }
    })
    .to_string()
    .into_bytes();

    let (status, body) = post_webhook(&app.router, &payload, Some(&sign(&payload))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], json!(true));
    assert_eq!(app.store.payments().await[0].status, PaymentStatus::Pending);
}

#[tokio::test]
async fn unmatched_email_is_still_acknowledged() {
    let app = test_app();

    let payload = completed_event("stranger@example.com");
    let (status, body) = post_webhook(&app.router, &payload, Some(&sign(&payload))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], json!(true));
}

#[tokio::test]
async fn authenticated_garbage_payload_is_rejected() {
    let app = test_app();

    let payload = b"not json at all".to_vec();
    let (status, body) = post_webhook(&app.router, &payload, Some(&sign(&payload))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Webhook Error:"));
}

#[tokio::test]
async fn store_failure_returns_500_and_redelivery_succeeds() {
    let app = test_app();
    seed_pending(&app, "bo@example.com").await;
    app.store.inject_failure("connection reset").await;

    let payload = completed_event("bo@example.com");

    let (status, _) = post_webhook(&app.router, &payload, Some(&sign(&payload))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.store.payments().await[0].status, PaymentStatus::Pending);

    // The processor redelivers on 5xx; the retry lands cleanly.
    let (status, body) = post_webhook(&app.router, &payload, Some(&sign(&payload))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], json!(true));
    assert_eq!(app.store.payments().await[0].status, PaymentStatus::Paid);
}

#[tokio::test]
async fn only_newest_payment_for_the_email_is_updated() {
    let app = test_app();
    seed_pending(&app, "bo@example.com").await;
    seed_pending(&app, "bo@example.com").await;

    let payload = completed_event("bo@example.com");
    let (status, _) = post_webhook(&app.router, &payload, Some(&sign(&payload))).await;
    assert_eq!(status, StatusCode::OK);

    let payments = app.store.payments().await;
    assert_eq!(payments[0].status, PaymentStatus::Pending);
    assert_eq!(payments[1].status, PaymentStatus::Paid);
}
