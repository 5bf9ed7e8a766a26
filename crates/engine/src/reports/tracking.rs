//! Field-agent tracking: who reported a position recently.

use chrono::{DateTime, Duration, Utc};

use crate::{Agent, GeoPoint};

/// Agents that reported within this window count as active.
pub const ACTIVE_WINDOW: Duration = Duration::hours(24);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activity {
    Active,
    Inactive,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackedAgent {
    pub agent_key: String,
    pub code: String,
    pub name: String,
    pub contact: String,
    pub area_covered: String,
    pub position: Option<GeoPoint>,
    pub last_updated: Option<DateTime<Utc>>,
    pub activity: Activity,
    pub last_seen: String,
}

/// Activity of an agent last heard from at `last_updated`.
pub fn activity(last_updated: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Activity {
    match last_updated {
        Some(at) if now - at < ACTIVE_WINDOW => Activity::Active,
        _ => Activity::Inactive,
    }
}

/// Coarse "time ago" label for `at`.
pub fn time_ago(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = at else {
        return "Never".to_string();
    };
    let minutes = (now - at).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} mins ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours} hours ago");
    }
    format!("{} days ago", hours / 24)
}

/// Tracking rows for every agent, in store order.
pub fn agent_tracking(agents: &[Agent], now: DateTime<Utc>) -> Vec<TrackedAgent> {
    agents
        .iter()
        .map(|agent| TrackedAgent {
            agent_key: agent.id.clone(),
            code: agent.agent_id.clone(),
            name: or_placeholder(&agent.name, "Unknown"),
            contact: or_placeholder(&agent.contact, "N/A"),
            area_covered: or_placeholder(&agent.area_covered, "N/A"),
            position: agent.coordinates(),
            last_updated: agent.last_updated,
            activity: activity(agent.last_updated, now),
            last_seen: time_ago(agent.last_updated, now),
        })
        .collect()
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}
