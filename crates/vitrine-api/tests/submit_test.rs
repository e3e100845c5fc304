//! Integration tests for the contact-form submission endpoint.
//!
//! Drives the full router against in-memory fakes and verifies both the
//! HTTP contract and the resulting store/mailer state.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{post_json, test_app};

fn submission_body() -> serde_json::Value {
    json!({
        "name": "Ana Silva",
        "email": "ana@example.com",
        "message": "I'd like a quote for a small site."
    })
}

#[tokio::test]
async fn valid_submission_is_stored_and_confirmed() {
    let app = test_app();

    let (status, body) = post_json(&app.router, "/submit", submission_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Form saved & email sent"));

    let stored = app.store.submissions().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Ana Silva");
    assert_eq!(stored[0].email, "ana@example.com");
    assert_eq!(stored[0].message, "I'd like a quote for a small site.");
}

#[tokio::test]
async fn confirmation_email_goes_to_the_submitter() {
    let app = test_app();

    let (status, _) = post_json(&app.router, "/submit", submission_body()).await;
    assert_eq!(status, StatusCode::OK);

    let sent = app.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ana@example.com");
    assert_eq!(sent[0].subject, "Form Submission Received");
    assert!(sent[0].body.contains("Ana Silva"));
    assert!(sent[0].body.contains("I'd like a quote for a small site."));
}

#[tokio::test]
async fn form_alias_route_accepts_submissions() {
    let app = test_app();

    let (status, body) = post_json(&app.router, "/api/form", submission_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(app.store.submissions().await.len(), 1);
}

#[tokio::test]
async fn empty_email_is_rejected_without_side_effects() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/submit",
        json!({ "name": "Ana", "email": "  ", "message": "hi" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(app.store.submissions().await.is_empty());
    assert!(app.mailer.sent().await.is_empty());
}

#[tokio::test]
async fn store_failure_reports_error_and_sends_nothing() {
    let app = test_app();
    app.store.inject_failure("connection reset").await;

    let (status, body) = post_json(&app.router, "/submit", submission_body()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert!(app.store.submissions().await.is_empty());
    assert!(app.mailer.sent().await.is_empty());
}

#[tokio::test]
async fn mailer_failure_keeps_the_stored_submission() {
    let app = test_app();
    app.mailer.inject_failure("relay unreachable").await;

    let (status, body) = post_json(&app.router, "/submit", submission_body()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    // The write is not rolled back when only the email fails.
    assert_eq!(app.store.submissions().await.len(), 1);
    assert!(app.mailer.sent().await.is_empty());
}

#[tokio::test]
async fn repeated_submissions_each_get_a_row_and_an_email() {
    let app = test_app();

    for _ in 0..2 {
        let (status, _) = post_json(&app.router, "/submit", submission_body()).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(app.store.submissions().await.len(), 2);
    assert_eq!(app.mailer.sent().await.len(), 2);
}
