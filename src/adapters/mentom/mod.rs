//! Mentom gateway adapter.
//!
//! Implements the `PaymentProvider` port against the Mentom REST API:
//! transport client, wire types, the adapter itself, and a configurable
//! mock for tests.

mod adapter;
mod client;
mod mock;
mod wire;

pub use adapter::{MentomConfig, MentomPaymentAdapter};
pub use client::GatewayClient;
pub use mock::{MethodCall, MockPaymentProvider};
pub use wire::{CaptureRequest, ChargeRequest, RefundRequest, Terminal};
