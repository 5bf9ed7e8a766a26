//! The module contains the `Customer` record and its write payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Collection, Record, decode};

/// Account status of a customer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    #[default]
    Active,
    Inactive,
    Blocked,
    Unknown,
}

impl CustomerStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Blocked => "blocked",
            Self::Unknown => "unknown",
        }
    }
}

impl From<&str> for CustomerStatus {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            "blocked" => Self::Blocked,
            _ => Self::Unknown,
        }
    }
}

/// A customer account.
///
/// `agent_id` is the store key of the assigned agent. It is a soft
/// reference: it may be empty (unassigned) or point at a deleted agent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    #[serde(skip)]
    pub id: String,
    #[serde(deserialize_with = "decode::text")]
    pub customer_id: String,
    #[serde(deserialize_with = "decode::text")]
    pub name: String,
    #[serde(deserialize_with = "decode::text")]
    pub email: String,
    #[serde(deserialize_with = "decode::text")]
    pub contact: String,
    #[serde(deserialize_with = "decode::text")]
    pub location: String,
    #[serde(deserialize_with = "decode::text")]
    pub agent_id: String,
    #[serde(deserialize_with = "decode::status")]
    pub status: CustomerStatus,
    #[serde(deserialize_with = "decode::number")]
    pub total_spent: f64,
    #[serde(deserialize_with = "decode::count")]
    pub total_orders: u64,
    #[serde(deserialize_with = "decode::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        deserialize_with = "decode::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<f64>,
    #[serde(
        deserialize_with = "decode::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<f64>,
}

impl Customer {
    /// Whether the customer has an assigned agent at all.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        !self.agent_id.trim().is_empty()
    }
}

impl Record for Customer {
    const COLLECTION: Collection = Collection::Customers;

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload for a new customer. The `CUST` code is allocated by the engine.
#[derive(Clone, Debug, Default)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub location: String,
    pub agent_id: Option<String>,
    pub status: Option<CustomerStatus>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Partial update of a customer. `None` fields are left untouched.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CustomerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}
