//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Payment Ports
//!
//! - `PaymentProvider` - lifecycle contract against a card payment gateway
//! - `CommerceCore` - collaborator port for persisting mapped outcomes

mod commerce_core;
mod payment_provider;

pub use commerce_core::{CommerceCore, CoreError};
pub use payment_provider::{
    CardDetails, InitiatePaymentRequest, PaymentDetails, PaymentError, PaymentProvider,
    StatusOutcome,
};
