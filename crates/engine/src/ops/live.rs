use crate::{Agent, Collection, ResultEngine, snapshot::decode_records, store::Subscription};

use super::Engine;

/// Live feed of the agents collection, decoded on every emission.
#[derive(Debug)]
pub struct AgentWatch {
    subscription: Subscription,
}

impl AgentWatch {
    /// Agents as of the latest write, without waiting.
    pub fn current(&mut self) -> Vec<Agent> {
        decode_records(&self.subscription.current())
    }

    /// Wait for the next write to the agents collection.
    ///
    /// `None` once the underlying store is gone.
    pub async fn next(&mut self) -> Option<Vec<Agent>> {
        let documents = self.subscription.changed().await?;
        Some(decode_records(&documents))
    }
}

impl Engine {
    /// Subscribe to the agents collection. Drop the watch to stop it.
    pub async fn watch_agents(&self) -> ResultEngine<AgentWatch> {
        let subscription = self.store.subscribe(Collection::Agents).await?;
        Ok(AgentWatch { subscription })
    }
}
