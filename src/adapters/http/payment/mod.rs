//! Payment HTTP adapter - inbound webhook endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, WebhookResponse};
pub use handlers::{handle_payment_webhook, PaymentApiError, PaymentAppState};
pub use routes::{payment_router, webhook_routes};
