//! The module contains the `Agent` record and its write payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Collection, Record, decode};

/// Sales target assumed when an agent has none (or `0`).
pub const DEFAULT_SALES_TARGET: f64 = 50_000.0;

/// Employment status of a sales agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
    /// A status string the back office does not know about.
    Unknown,
}

impl AgentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
            Self::Unknown => "unknown",
        }
    }
}

impl From<&str> for AgentStatus {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            "suspended" => Self::Suspended,
            _ => Self::Unknown,
        }
    }
}

/// A latitude/longitude pair as stored by the location tracker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default, deserialize_with = "decode::number")]
    pub lat: f64,
    #[serde(default, deserialize_with = "decode::number")]
    pub lng: f64,
}

/// A sales agent.
///
/// `id` is the opaque store key (orders and customers reference agents by
/// it); `agent_id` is the human-readable `BIGD-NNNN` code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Agent {
    #[serde(skip)]
    pub id: String,
    #[serde(deserialize_with = "decode::text")]
    pub agent_id: String,
    #[serde(deserialize_with = "decode::text")]
    pub name: String,
    #[serde(deserialize_with = "decode::text")]
    pub email: String,
    #[serde(deserialize_with = "decode::text")]
    pub contact: String,
    #[serde(deserialize_with = "decode::text")]
    pub area_covered: String,
    #[serde(deserialize_with = "decode::status")]
    pub status: AgentStatus,
    #[serde(deserialize_with = "sales_target")]
    pub sales_target: f64,
    #[serde(deserialize_with = "decode::count")]
    pub customers_count: u64,
    #[serde(deserialize_with = "decode::number")]
    pub total_sales: f64,
    #[serde(deserialize_with = "decode::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "decode::timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
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
    /// Position pushed by the mobile tracker, when the agent has one.
    #[serde(
        deserialize_with = "decode::optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<GeoPoint>,
    /// Link to the authentication provider's user.
    #[serde(deserialize_with = "decode::text", skip_serializing_if = "String::is_empty")]
    pub user_id: String,
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            id: String::new(),
            agent_id: String::new(),
            name: String::new(),
            email: String::new(),
            contact: String::new(),
            area_covered: String::new(),
            status: AgentStatus::default(),
            sales_target: DEFAULT_SALES_TARGET,
            customers_count: 0,
            total_sales: 0.0,
            created_at: None,
            last_updated: None,
            latitude: None,
            longitude: None,
            location: None,
            user_id: String::new(),
        }
    }
}

impl Agent {
    /// Coordinates of the agent, preferring the explicit latitude/longitude
    /// fields over the tracker position.
    #[must_use]
    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => self.location,
        }
    }
}

impl Record for Agent {
    const COLLECTION: Collection = Collection::Agents;

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn id(&self) -> &str {
        &self.id
    }
}

fn sales_target<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let target = decode::number(deserializer)?;
    if target == 0.0 {
        return Ok(DEFAULT_SALES_TARGET);
    }
    Ok(target)
}

/// Payload for a new agent. The `BIGD` code is allocated by the engine.
#[derive(Clone, Debug, Default)]
pub struct NewAgent {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub area_covered: String,
    pub status: Option<AgentStatus>,
    pub sales_target: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub user_id: Option<String>,
}

/// Partial update of an agent. `None` fields are left untouched.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AgentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_covered: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AgentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}
