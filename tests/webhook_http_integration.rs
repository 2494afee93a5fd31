//! Integration tests for the webhook HTTP endpoint.
//!
//! Drives the Axum router with raw requests and verifies status codes and
//! response bodies for accepted, rejected and unsupported notifications.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use payment_mentom::adapters::http::payment::{payment_router, PaymentAppState};
use payment_mentom::adapters::mentom::MockPaymentProvider;
use payment_mentom::ports::{CommerceCore, CoreError};

const TEST_SECRET: &str = "whk_http_test";

// =============================================================================
// Test Infrastructure
// =============================================================================

#[derive(Default)]
struct RecordingCommerceCore {
    updates: Mutex<Vec<(String, Value)>>,
}

#[async_trait]
impl CommerceCore for RecordingCommerceCore {
    async fn update_record(&self, id: &str, fields: Value) -> Result<(), CoreError> {
        self.updates.lock().unwrap().push((id.to_string(), fields));
        Ok(())
    }
}

fn test_app(
    provider: MockPaymentProvider,
) -> (axum::Router, Arc<RecordingCommerceCore>) {
    let core = Arc::new(RecordingCommerceCore::default());
    let state = PaymentAppState {
        payment_provider: Arc::new(provider),
        commerce_core: core.clone(),
    };
    (payment_router().with_state(state), core)
}

fn webhook_request(body: Vec<u8>, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhooks/payment")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("Webhook-Signature", signature);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Accepted Notifications
// =============================================================================

#[tokio::test]
async fn valid_signed_webhook_returns_ok_with_action() {
    let provider = MockPaymentProvider::with_webhook_secret(TEST_SECRET);
    let (body, signature) = provider.update_status_event("tx_1", "approved", true);
    let (app, core) = test_app(provider);

    let response = app
        .oneshot(webhook_request(body, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["action"], "successful");
    assert_eq!(json["transaction_id"], "tx_1");
    assert_eq!(core.updates.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn foreign_module_webhook_is_acknowledged_as_not_supported() {
    let provider = MockPaymentProvider::with_webhook_secret(TEST_SECRET);

    let event = json!({
        "id": "evt_1",
        "module": "identity",
        "action": "updateStatus",
        "date": "2024-03-01T12:00:00Z",
        "data": {"id": "tx_1"}
    });
    let parsed: payment_mentom::domain::payment::MentomEvent =
        serde_json::from_value(event.clone()).unwrap();
    let signature = payment_mentom::domain::payment::sign_event(TEST_SECRET, &parsed);
    let (app, core) = test_app(provider);

    let response = app
        .oneshot(webhook_request(
            serde_json::to_vec(&event).unwrap(),
            Some(&signature),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["action"], "not_supported");
    assert!(json.get("transaction_id").is_none());
    assert!(core.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn permissive_provider_accepts_unsigned_webhook() {
    // No webhook secret configured: development permissive mode.
    let provider = MockPaymentProvider::new();
    let (body, _) = provider.update_status_event("tx_1", "approved", true);
    let (app, _core) = test_app(provider);

    let response = app.oneshot(webhook_request(body, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Rejected Notifications
// =============================================================================

#[tokio::test]
async fn missing_signature_header_is_unauthorized() {
    let provider = MockPaymentProvider::with_webhook_secret(TEST_SECRET);
    let (body, _) = provider.update_status_event("tx_1", "approved", true);
    let (app, core) = test_app(provider);

    let response = app.oneshot(webhook_request(body, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = response_json(response).await;
    assert_eq!(json["error"], "WEBHOOK_SIGNATURE_REJECTED");
    assert!(core.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn tampered_signature_is_unauthorized() {
    let provider = MockPaymentProvider::with_webhook_secret(TEST_SECRET);
    let (body, signature) = provider.update_status_event("tx_1", "approved", true);
    let (app, core) = test_app(provider);

    let mut tampered = signature.into_bytes();
    tampered[0] = if tampered[0] == b'0' { b'1' } else { b'0' };
    let tampered = String::from_utf8(tampered).unwrap();

    let response = app
        .oneshot(webhook_request(body, Some(&tampered)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(core.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unparseable_body_is_bad_request() {
    let provider = MockPaymentProvider::with_webhook_secret(TEST_SECRET);
    let (app, core) = test_app(provider);

    let response = app
        .oneshot(webhook_request(b"not json at all".to_vec(), Some("deadbeef")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"], "WEBHOOK_MALFORMED");
    assert!(core.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn envelope_missing_required_field_is_bad_request() {
    let provider = MockPaymentProvider::with_webhook_secret(TEST_SECRET);
    let (app, _core) = test_app(provider);

    // No "date" field: verification must fail closed.
    let body = serde_json::to_vec(&json!({
        "id": "evt_1",
        "module": "payment",
        "action": "capture"
    }))
    .unwrap();

    let response = app
        .oneshot(webhook_request(body, Some("deadbeef")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
