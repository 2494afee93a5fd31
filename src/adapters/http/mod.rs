//! HTTP adapters - Axum routes and handlers.

pub mod payment;
