//! Payment provider adapter for the Mentom card gateway.
//!
//! This crate translates a small, fixed payment lifecycle contract
//! (initiate → authorize → capture/refund/cancel → status query) into the
//! Mentom REST dialect, verifies asynchronous webhook notifications
//! cryptographically, and reconciles state arriving out of order from two
//! channels (synchronous API responses and asynchronous webhooks).

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
