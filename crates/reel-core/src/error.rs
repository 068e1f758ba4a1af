//! Error types for ReelSpin

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which grid dimension a geometry request targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Columns,
    Rows,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Columns => write!(f, "columns"),
            Axis::Rows => write!(f, "rows"),
        }
    }
}

/// Core error type
#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Insufficient funds: requested {requested}, balance {balance}")]
    InsufficientFunds { requested: u64, balance: u64 },

    #[error("Invalid denomination: {0}")]
    InvalidDenomination(u64),

    #[error("Invalid geometry: {value} {axis} is not an allowed option")]
    InvalidGeometry { axis: Axis, value: usize },

    #[error("A spin session is in progress")]
    SessionBusy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ReelError {
    /// Short machine-readable name, used in stage payloads and logs
    pub fn kind(&self) -> &'static str {
        match self {
            ReelError::InsufficientFunds { .. } => "insufficient_funds",
            ReelError::InvalidDenomination(_) => "invalid_denomination",
            ReelError::InvalidGeometry { .. } => "invalid_geometry",
            ReelError::SessionBusy => "session_busy",
            ReelError::Io(_) => "io",
            ReelError::Serialization(_) => "serialization",
            ReelError::Config(_) => "config",
        }
    }

    /// Domain rejections leave all state untouched and are safe to show to a player
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ReelError::InsufficientFunds { .. }
                | ReelError::InvalidDenomination(_)
                | ReelError::InvalidGeometry { .. }
                | ReelError::SessionBusy
        )
    }
}

/// Result type alias
pub type ReelResult<T> = Result<T, ReelError>;
