//! Order model
//!
//! An order aggregates line items referencing (event, ticket type,
//! quantity). `total_amount` is always server-computed; an order's sales
//! contribute to aggregates only once `payment_status` is COMPLETED.

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Payment status of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

/// Attendee contact details attached to a line item and its tickets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendeeInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// One line of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub event: RecordId,
    pub event_id: i64,
    /// Denormalized for display and reporting
    pub event_title: String,
    pub ticket_type_id: i64,
    pub ticket_type_name: String,
    pub category_name: String,
    pub quantity: i64,
    /// Price per unit at order time
    pub unit_price: Decimal,
    /// unit_price * quantity, server-computed
    pub line_total: Decimal,
    pub attendee: AttendeeInfo,
}

/// Order record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub order_id: i64,
    /// Purchasing master account
    #[serde(with = "serde_helpers::record_id")]
    pub account: RecordId,
    pub account_id: i64,
    pub items: Vec<OrderItem>,
    /// Sum of line totals at payment time, server-computed
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
    pub completed_at: Option<i64>,
}

// ========== Create payloads ==========

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    pub event_id: i64,
    pub ticket_type_id: i64,
    pub quantity: i64,
    pub attendee: AttendeeInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItemInput>,
}
