use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{Collection, Documents, EngineError, ResultEngine};

use super::{ChangeFeed, DocumentStore, Subscription, merge};

/// In-process store, lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<BTreeMap<Collection, Documents>>,
    feed: ChangeFeed,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `collections`.
    pub fn with_documents(collections: BTreeMap<Collection, Documents>) -> Self {
        Self {
            collections: RwLock::new(collections),
            feed: ChangeFeed::default(),
        }
    }

    fn publish(&self, collections: &BTreeMap<Collection, Documents>, collection: Collection) {
        if self.feed.is_watched(collection) {
            let documents = collections.get(&collection).cloned().unwrap_or_default();
            self.feed.publish(collection, documents);
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_all(&self, collection: Collection) -> ResultEngine<Documents> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn get(&self, collection: Collection, id: &str) -> ResultEngine<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    async fn create(&self, collection: Collection, id: &str, document: Value) -> ResultEngine<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .insert(id.to_string(), document);
        self.publish(&collections, collection);
        Ok(())
    }

    async fn update(&self, collection: Collection, id: &str, partial: Value) -> ResultEngine<()> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(&collection)
            .and_then(|documents| documents.get_mut(id))
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        merge(document, partial)?;
        self.publish(&collections, collection);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> ResultEngine<()> {
        let mut collections = self.collections.write().await;
        collections
            .get_mut(&collection)
            .and_then(|documents| documents.remove(id))
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        self.publish(&collections, collection);
        Ok(())
    }

    async fn subscribe(&self, collection: Collection) -> ResultEngine<Subscription> {
        // Held across subscribe so no write can slip in between.
        let collections = self.collections.read().await;
        let current = collections.get(&collection).cloned().unwrap_or_default();
        Ok(self.feed.subscribe(collection, current))
    }
}
