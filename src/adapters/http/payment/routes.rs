//! Axum router configuration for payment endpoints.

use axum::{routing::post, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{handle_payment_webhook, PaymentAppState};

/// Create the gateway webhook router.
///
/// Webhooks carry no user authentication; requests are verified via the
/// `Webhook-Signature` header instead.
///
/// # Routes
/// - `POST /payment` - Handle gateway payment notifications
pub fn webhook_routes() -> Router<PaymentAppState> {
    Router::new().route("/payment", post(handle_payment_webhook))
}

/// Create the complete payment module router.
///
/// # Example
///
/// ```ignore
/// let state = PaymentAppState { payment_provider, commerce_core };
/// let app = payment_router().with_state(state);
/// ```
pub fn payment_router() -> Router<PaymentAppState> {
    Router::new()
        .nest("/webhooks", webhook_routes())
        .layer(TraceLayer::new_for_http())
}
