use std::{collections::BTreeMap, fmt, sync::Arc};

use sea_orm::DatabaseConnection;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    Collection, EngineError, Record, ResultEngine, Snapshot,
    snapshot::decode_records,
    store::{DocumentStore, MemoryStore, SqlStore},
};

mod agents;
mod customers;
mod live;
mod orders;
mod reports;

pub use live::AgentWatch;

/// Entry point of the back office: reads snapshots from a [`DocumentStore`],
/// hands them to the aggregation functions and performs every write.
pub struct Engine {
    store: Arc<dyn DocumentStore>,
    // Serializes code allocation with the write that consumes the code, and
    // read-modify-write updates of customer totals.
    allocation: Mutex<()>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Fresh snapshot of every collection.
    pub async fn snapshot(&self) -> ResultEngine<Snapshot> {
        let mut collections = BTreeMap::new();
        for collection in Collection::ALL {
            collections.insert(collection, self.store.get_all(collection).await?);
        }
        Ok(Snapshot::from_documents(collections))
    }

    /// Every record of one collection, decoded.
    pub async fn records<R: Record>(&self) -> ResultEngine<Vec<R>> {
        let documents = self.store.get_all(R::COLLECTION).await?;
        Ok(decode_records(&documents))
    }

    /// One record by store key.
    pub async fn record<R: Record>(&self, id: &str) -> ResultEngine<R> {
        let value = self
            .store
            .get(R::COLLECTION, id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        decode_value(id, value)
    }
}

fn decode_value<R: Record>(id: &str, value: Value) -> ResultEngine<R> {
    if !value.is_object() {
        return Err(EngineError::InvalidRecord(format!(
            "{}/{id} is not an object",
            R::COLLECTION
        )));
    }
    let mut record: R = serde_json::from_value(value)?;
    record.set_id(id.to_string());
    Ok(record)
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidRecord(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn DocumentStore>>,
}

impl EngineBuilder {
    /// Use `store` for every read and write.
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Use a [`SqlStore`] over `db`. The `documents` table must exist.
    pub fn database(self, db: DatabaseConnection) -> EngineBuilder {
        self.store(Arc::new(SqlStore::new(db)))
    }

    /// Construct `Engine`. Without a store, an empty [`MemoryStore`] is used.
    pub async fn build(self) -> ResultEngine<Engine> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        Ok(Engine {
            store,
            allocation: Mutex::new(()),
        })
    }
}
