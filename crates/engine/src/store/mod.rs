//! Document store the engine reads from and writes to.
//!
//! A store is a set of named collections, each mapping an opaque key to a
//! JSON document. Reads come in two flavours: [`DocumentStore::get_all`]
//! returns one snapshot, [`DocumentStore::subscribe`] returns a
//! [`Subscription`] that yields a fresh full snapshot after every write.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;

use crate::{Collection, Documents, EngineError, ResultEngine};

mod documents;
mod memory;
mod sql;

pub use memory::MemoryStore;
pub use sql::SqlStore;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of `collection`, empty when the collection does not exist.
    async fn get_all(&self, collection: Collection) -> ResultEngine<Documents>;

    async fn get(&self, collection: Collection, id: &str) -> ResultEngine<Option<Value>>;

    /// Store `document` under `id`, replacing any document already there.
    async fn create(&self, collection: Collection, id: &str, document: Value) -> ResultEngine<()>;

    /// Merge the top-level fields of `partial` into the document `id`.
    async fn update(&self, collection: Collection, id: &str, partial: Value) -> ResultEngine<()>;

    async fn delete(&self, collection: Collection, id: &str) -> ResultEngine<()>;

    async fn subscribe(&self, collection: Collection) -> ResultEngine<Subscription>;
}

/// Live view over one collection.
///
/// Dropping the subscription cancels it.
#[derive(Debug)]
pub struct Subscription {
    receiver: watch::Receiver<Arc<Documents>>,
}

impl Subscription {
    /// The latest snapshot, without waiting.
    pub fn current(&mut self) -> Arc<Documents> {
        self.receiver.borrow_and_update().clone()
    }

    /// Wait for the next write and return the snapshot after it.
    ///
    /// `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Arc<Documents>> {
        self.receiver.changed().await.ok()?;
        Some(self.current())
    }
}

/// Per-collection fan-out of snapshots to subscribers.
///
/// A channel only exists while somebody listens; once the last subscription
/// is dropped the next publish removes it, so a later subscriber never starts
/// from a stale snapshot.
#[derive(Debug, Default)]
pub(crate) struct ChangeFeed {
    senders: Mutex<HashMap<Collection, watch::Sender<Arc<Documents>>>>,
}

impl ChangeFeed {
    pub(crate) fn subscribe(&self, collection: Collection, current: Documents) -> Subscription {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        let receiver = match senders.get(&collection) {
            Some(sender) if !sender.is_closed() => sender.subscribe(),
            _ => {
                let (sender, receiver) = watch::channel(Arc::new(current));
                senders.insert(collection, sender);
                receiver
            }
        };
        Subscription { receiver }
    }

    /// Whether a write to `collection` has to be published.
    pub(crate) fn is_watched(&self, collection: Collection) -> bool {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        match senders.get(&collection) {
            Some(sender) if !sender.is_closed() => true,
            Some(_) => {
                senders.remove(&collection);
                false
            }
            None => false,
        }
    }

    pub(crate) fn publish(&self, collection: Collection, documents: Documents) {
        let senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = senders.get(&collection) {
            sender.send_replace(Arc::new(documents));
            tracing::debug!(
                "published {collection} to {} subscriber(s)",
                sender.receiver_count()
            );
        }
    }
}

/// Top-level merge of `partial` into `document`, as done by [`DocumentStore::update`].
pub(crate) fn merge(document: &mut Value, partial: Value) -> ResultEngine<()> {
    let Value::Object(fields) = partial else {
        return Err(EngineError::InvalidRecord(
            "update must be a JSON object".to_string(),
        ));
    };
    match document {
        Value::Object(target) => {
            target.extend(fields);
        }
        other => *other = Value::Object(fields),
    }
    Ok(())
}
