//! The module contains the `Order` record, its line items and write payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Collection, Record, decode};

/// Fulfilment status of an order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
    Unknown,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }
}

/// One line of an order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderItem {
    #[serde(deserialize_with = "decode::text")]
    pub product_id: String,
    #[serde(deserialize_with = "decode::text")]
    pub product_name: String,
    #[serde(deserialize_with = "decode::number")]
    pub quantity: f64,
    #[serde(deserialize_with = "decode::number")]
    pub unit_price: f64,
}

impl OrderItem {
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// A customer order.
///
/// `total_amount` is trusted as stored; it is never recomputed from the items
/// after creation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    #[serde(skip)]
    pub id: String,
    #[serde(deserialize_with = "decode::text")]
    pub order_id: String,
    #[serde(deserialize_with = "decode::text")]
    pub customer_id: String,
    #[serde(deserialize_with = "decode::text")]
    pub customer_name: String,
    #[serde(deserialize_with = "decode::text")]
    pub agent_id: String,
    #[serde(deserialize_with = "decode::text")]
    pub order_date: String,
    #[serde(deserialize_with = "decode::list")]
    pub items: Vec<OrderItem>,
    #[serde(deserialize_with = "decode::number")]
    pub total_amount: f64,
    #[serde(deserialize_with = "decode::status")]
    pub status: OrderStatus,
    #[serde(deserialize_with = "decode::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Calendar date of the order, `None` when `order_date` is unparseable.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        decode::parse_date(&self.order_date)
    }

    /// Sum of quantities over every line item.
    #[must_use]
    pub fn quantity(&self) -> f64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

impl Record for Order {
    const COLLECTION: Collection = Collection::Orders;

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload for a new order. Totals, code and agent are filled in by the
/// engine.
#[derive(Clone, Debug, Default)]
pub struct NewOrder {
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub order_date: String,
    pub status: Option<OrderStatus>,
    pub items: Vec<OrderItem>,
}

/// Partial update of an order. `None` fields are left untouched.
#[derive(Clone, Debug, Default, Serialize)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
}
