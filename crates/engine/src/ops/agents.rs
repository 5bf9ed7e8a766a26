use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    Agent, AgentPatch, CodeSequence, Collection, DEFAULT_SALES_TARGET, EngineError, NewAgent,
    ResultEngine, Scope,
};

use super::{Engine, normalize_optional_text, normalize_required_text};

impl Engine {
    /// Every agent, in store order.
    pub async fn agents(&self) -> ResultEngine<Vec<Agent>> {
        self.records().await
    }

    /// One agent. A scoped caller can only read itself.
    pub async fn agent(&self, id: &str, scope: &Scope) -> ResultEngine<Agent> {
        scope.ensure_includes(id)?;
        self.record(id).await
    }

    /// The code the next created agent would receive.
    pub async fn next_agent_code(&self) -> ResultEngine<String> {
        let agents = self.store.get_all(Collection::Agents).await?;
        Ok(CodeSequence::AGENTS.next_for_documents(&agents))
    }

    /// Create an agent with the next free `BIGD` code.
    ///
    /// Allocation and insert run under the engine lock, so concurrent creates
    /// through one `Engine` never share a code.
    pub async fn create_agent(&self, new: NewAgent) -> ResultEngine<Agent> {
        let name = normalize_required_text(&new.name, "agent name")?;
        let now = Utc::now();

        let _guard = self.allocation.lock().await;
        let existing = self.store.get_all(Collection::Agents).await?;
        let agent = Agent {
            id: Uuid::now_v7().to_string(),
            agent_id: CodeSequence::AGENTS.next_for_documents(&existing),
            name,
            email: new.email.trim().to_string(),
            contact: new.contact.trim().to_string(),
            area_covered: new.area_covered.trim().to_string(),
            status: new.status.unwrap_or_default(),
            sales_target: new
                .sales_target
                .filter(|target| *target > 0.0)
                .unwrap_or(DEFAULT_SALES_TARGET),
            customers_count: 0,
            total_sales: 0.0,
            created_at: Some(now),
            last_updated: Some(now),
            latitude: new.latitude,
            longitude: new.longitude,
            location: None,
            user_id: normalize_optional_text(new.user_id.as_deref()).unwrap_or_default(),
        };
        self.store
            .create(Collection::Agents, &agent.id, serde_json::to_value(&agent)?)
            .await?;
        tracing::info!("created agent {} ({})", agent.agent_id, agent.id);
        Ok(agent)
    }

    /// Apply `patch` to an agent and stamp `last_updated`.
    ///
    /// An agent may only patch itself, and never its target or status.
    pub async fn update_agent(
        &self,
        id: &str,
        patch: AgentPatch,
        scope: &Scope,
    ) -> ResultEngine<Agent> {
        scope.ensure_includes(id)?;
        if !scope.is_admin() && (patch.sales_target.is_some() || patch.status.is_some()) {
            return Err(EngineError::Forbidden(format!(
                "agent {id} cannot change its own sales target or status"
            )));
        }
        if let Some(name) = &patch.name {
            normalize_required_text(name, "agent name")?;
        }
        if patch.sales_target.is_some_and(|target| target <= 0.0) {
            return Err(EngineError::InvalidRecord(
                "sales target must be positive".to_string(),
            ));
        }

        let mut partial = serde_json::to_value(&patch)?;
        partial["last_updated"] = json!(Utc::now());
        self.store.update(Collection::Agents, id, partial).await?;
        self.record(id).await
    }

    /// Hard delete. Customers and orders keep pointing at the removed key.
    pub async fn delete_agent(&self, id: &str) -> ResultEngine<()> {
        self.store.delete(Collection::Agents, id).await?;
        tracing::info!("deleted agent {id}");
        Ok(())
    }
}
