//! Core domain types for the dispatch engine.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Quantity;

/// Order identifier.
pub type OrderId = u64;

/// Fuel products a rider can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Petrol,
    Diesel,
    Kerosene,
}

/// Lifecycle of an order.
///
/// `Pending -> Assigned -> Accepted -> InProgress -> {Delivered | Cancelled}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Assigned,
    Accepted,
    InProgress,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether an order in this status occupies rider capacity.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            OrderStatus::Assigned | OrderStatus::Accepted | OrderStatus::InProgress
        )
    }
}

/// A delivery request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Used for duplicate detection.
    pub customer_phone: String,
    /// Free-text address as typed by the customer.
    pub delivery_address: String,
    /// Coarse locality tag, distinct from the street in `delivery_address`.
    pub neighborhood: String,
    pub fuel_type: FuelType,
    pub quantity: Quantity,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: OrderStatus,
}

/// Urgency derived from how long an order has been waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Normal,
    High,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        };
        f.write_str(s)
    }
}
