//! Integration tests for checkout session creation.
//!
//! Verifies the provider request, the pending payment row, and the error
//! paths where either the provider or the store fails.

mod common;

use axum::http::StatusCode;
use rust_decimal_macros::dec;
use serde_json::json;
use vitrine_core::PaymentStatus;

use common::{post_json, test_app};

#[tokio::test]
async fn checkout_returns_redirect_and_records_pending_payment() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/create-checkout-session",
        json!({ "email": "bo@example.com", "amount": 25 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], json!("https://checkout.test/session"));

    let payments = app.store.payments().await;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].email, "bo@example.com");
    assert_eq!(payments[0].amount, dec!(25));
    assert_eq!(payments[0].status, PaymentStatus::Pending);
}

#[tokio::test]
async fn amount_is_converted_to_minor_units_for_the_provider() {
    let app = test_app();

    let (status, _) = post_json(
        &app.router,
        "/create-checkout-session",
        json!({ "email": "bo@example.com", "amount": 25 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let requests = app.provider.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].customer_email, "bo@example.com");
    assert_eq!(requests[0].unit_amount, 2500);
}

#[tokio::test]
async fn empty_email_is_rejected_before_the_provider_is_called() {
    let app = test_app();

    let (status, _) = post_json(
        &app.router,
        "/create-checkout-session",
        json!({ "email": "", "amount": 25 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.provider.requests().await.is_empty());
    assert!(app.store.payments().await.is_empty());
}

#[tokio::test]
async fn non_positive_amount_is_rejected() {
    let app = test_app();

    for amount in [0, -5] {
        let (status, _) = post_json(
            &app.router,
            "/create-checkout-session",
            json!({ "email": "bo@example.com", "amount": amount }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    assert!(app.provider.requests().await.is_empty());
    assert!(app.store.payments().await.is_empty());
}

#[tokio::test]
async fn provider_failure_records_no_payment() {
    let app = test_app();
    app.provider.inject_failure("provider down").await;

    let (status, body) = post_json(
        &app.router,
        "/create-checkout-session",
        json!({ "email": "bo@example.com", "amount": 25 }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().is_some());
    assert!(app.store.payments().await.is_empty());
}

#[tokio::test]
async fn store_failure_after_session_creation_reports_error() {
    let app = test_app();
    app.store.inject_failure("connection reset").await;

    let (status, _) = post_json(
        &app.router,
        "/create-checkout-session",
        json!({ "email": "bo@example.com", "amount": 25 }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // The session was created at the provider before the write failed.
    assert_eq!(app.provider.requests().await.len(), 1);
    assert!(app.store.payments().await.is_empty());
}
