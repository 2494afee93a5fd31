//! Payment domain module.
//!
//! Pure payment logic with no I/O: session state derivation, idempotency
//! tokens, webhook event parsing, signature verification and event routing.
//!
//! # Module Structure
//!
//! - `session` - PaymentSession and capture mode
//! - `status` - SessionStatus derivation from raw charge bodies
//! - `idempotency` - caller-supplied idempotency tokens
//! - `webhook_event` - notification envelope types
//! - `webhook_verifier` - keyed SHA-512 signature verification
//! - `webhook_router` - verified event → normalized action mapping
//! - `webhook_errors` - webhook rejection taxonomy

mod idempotency;
mod session;
mod status;
mod webhook_errors;
mod webhook_event;
mod webhook_router;
mod webhook_verifier;

pub use idempotency::{IdempotencyKey, InvalidIdempotencyKey, IDEMPOTENCY_KEY_HEADER};
pub use session::{CaptureMode, PaymentSession, TerminalSessionError};
pub use status::SessionStatus;
pub use webhook_errors::WebhookError;
pub use webhook_event::{MentomEvent, MentomEventAction};
pub use webhook_router::{route_event, WebhookAction, WebhookOutcome};
pub use webhook_verifier::{sign_event, WebhookVerifier, WEBHOOK_SIGNATURE_HEADER};
