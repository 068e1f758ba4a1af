//! StageEvent — A stage occurrence with metadata
//!
//! Wraps a Stage with its timestamp and payload.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// A stage event with full metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The stage
    pub stage: Stage,

    /// Timestamp in milliseconds (machine clock)
    pub timestamp_ms: f64,

    /// Additional payload data
    #[serde(default)]
    pub payload: StagePayload,
}

impl StageEvent {
    pub fn new(stage: Stage, timestamp_ms: f64) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload: StagePayload::default(),
        }
    }

    /// Create with payload
    pub fn with_payload(stage: Stage, timestamp_ms: f64, payload: StagePayload) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload,
        }
    }

    /// Get stage type name
    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}

/// Additional payload data for a stage event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagePayload {
    /// Balance at the time of the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<u64>,

    /// Current bet denomination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bet_amount: Option<u64>,

    /// Spin session ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_id: Option<String>,
}

impl StagePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set balance
    pub fn balance(mut self, balance: u64) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Builder: set bet amount
    pub fn bet_amount(mut self, amount: u64) -> Self {
        self.bet_amount = Some(amount);
        self
    }

    /// Builder: set spin ID
    pub fn spin_id(mut self, id: impl Into<String>) -> Self {
        self.spin_id = Some(id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
