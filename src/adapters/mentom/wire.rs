//! Mentom wire types.
//!
//! Request bodies as the gateway expects them. Responses are kept as raw
//! `serde_json::Value` throughout the adapter (the session invariant derives
//! status from the verbatim body), so only outbound shapes live here.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::ports::{CardDetails, PaymentDetails};

/// Default transaction source channel.
const DEFAULT_SOURCE: &str = "Internet";

/// Default processing level.
const DEFAULT_LEVEL: u32 = 1;

/// Terminal reference present in every mutating request.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Terminal {
    /// Gateway / dashboard terminal id.
    pub id: u64,
}

/// Body for `POST /payment/sale` and `POST /payment/auth`.
#[derive(Serialize)]
pub struct ChargeRequest<'a> {
    pub terminal: Terminal,
    pub amount: i64,
    pub source: &'a str,
    pub level: u32,
    pub card: &'a CardDetails,
    pub ip: &'a str,
    #[serde(flatten)]
    pub extra: &'a Map<String, Value>,
}

impl<'a> ChargeRequest<'a> {
    /// Assemble a charge body from validated payment details.
    pub fn new(terminal_id: u64, amount: i64, details: &'a PaymentDetails) -> Self {
        Self {
            terminal: Terminal { id: terminal_id },
            amount,
            source: details.source.as_deref().unwrap_or(DEFAULT_SOURCE),
            level: details.level.unwrap_or(DEFAULT_LEVEL),
            card: &details.card,
            ip: &details.ip,
            extra: &details.extra,
        }
    }
}

/// Body for `POST /payment/{id}/capture`.
///
/// An omitted amount captures the full authorized amount.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureRequest {
    pub terminal: Terminal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

/// Body for `POST /payment/{id}/refund`.
///
/// An omitted amount is how the gateway spells "void": there is no distinct
/// cancel endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RefundRequest {
    pub terminal: Terminal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}
