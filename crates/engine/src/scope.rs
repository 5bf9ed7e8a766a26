//! Who is looking at the data.
//!
//! Every aggregation takes a `Scope` explicitly: admins see everything, an
//! agent only sees the orders and customers attached to their own store key.

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Unrestricted admin view.
    #[default]
    All,
    /// Restricted to the agent with this store key.
    Agent(String),
}

impl Scope {
    /// Build a scope from an optional agent key. Blank keys mean admin.
    pub fn from_agent(agent_id: Option<&str>) -> Self {
        match agent_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Self::Agent(id.to_string()),
            None => Self::All,
        }
    }

    #[must_use]
    pub fn agent_id(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Agent(id) => Some(id),
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether a record owned by `agent_id` is visible in this scope.
    #[must_use]
    pub fn includes(&self, agent_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Agent(id) => id == agent_id,
        }
    }

    /// Fail unless records of `agent_id` are visible in this scope.
    pub fn ensure_includes(&self, agent_id: &str) -> ResultEngine<()> {
        if self.includes(agent_id) {
            return Ok(());
        }
        Err(EngineError::Forbidden(format!(
            "agent {} cannot access records of another agent",
            self.agent_id().unwrap_or_default()
        )))
    }

    /// Fail unless this is the admin view.
    pub fn ensure_admin(&self) -> ResultEngine<()> {
        match self {
            Self::All => Ok(()),
            Self::Agent(id) => Err(EngineError::Forbidden(format!(
                "agent {id} cannot manage the sales force"
            ))),
        }
    }
}
