//! Error types for dispatch decisions.

use thiserror::Error;

use crate::Quantity;
use crate::model::OrderId;

/// Why an order cannot be put on a rider's box.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    #[error("invalid quantity {0} liters")]
    InvalidQuantity(i64),

    #[error("insufficient capacity: requested {requested}, remaining {remaining}")]
    InsufficientCapacity {
        requested: Quantity,
        remaining: Quantity,
    },

    #[error("insufficient kegs: requested {requested}, remaining {remaining}")]
    InsufficientKegs { requested: u32, remaining: u32 },
}

/// Why a new order submission is refused at intake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("invalid quantity {0}")]
    InvalidQuantity(Quantity),

    #[error("duplicate of order {existing}")]
    Duplicate { existing: OrderId },
}

/// Error while loading or validating a [`DispatchConfig`](crate::DispatchConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
