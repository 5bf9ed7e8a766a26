//! Typed, point-in-time view of the store.
//!
//! This is the normalization boundary: raw documents are decoded into typed
//! records exactly once, here, and every aggregation works on the result.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Agent, Collection, Customer, Order, Product, Territory};

/// A raw collection as returned by the store: store key to document.
///
/// Keys are kept sorted, which is also the iteration order the store
/// guarantees; ties in rankings are broken by this order.
pub type Documents = BTreeMap<String, Value>;

/// A record type living in one store collection.
pub trait Record: DeserializeOwned {
    const COLLECTION: Collection;

    fn set_id(&mut self, id: String);

    fn id(&self) -> &str;
}

/// Decode every document of a collection, in key order.
///
/// Documents that are not JSON objects are skipped; missing fields are
/// defaulted by the record's own decoders.
pub fn decode_records<R: Record>(documents: &Documents) -> Vec<R> {
    documents
        .iter()
        .filter_map(|(key, value)| decode_record(key, value))
        .collect()
}

/// Decode a single document, `None` when it is not a JSON object.
pub fn decode_record<R: Record>(key: &str, value: &Value) -> Option<R> {
    if !value.is_object() {
        tracing::warn!(
            "skipping {}/{key}: document is not an object",
            R::COLLECTION
        );
        return None;
    }
    match serde_json::from_value::<R>(value.clone()) {
        Ok(mut record) => {
            record.set_id(key.to_string());
            Some(record)
        }
        Err(err) => {
            tracing::warn!("skipping {}/{key}: {err}", R::COLLECTION);
            None
        }
    }
}

/// Every collection the dashboards need, decoded.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub agents: Vec<Agent>,
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub products: Vec<Product>,
    pub territories: Vec<Territory>,
}

impl Snapshot {
    /// Build a snapshot from raw collections. Missing collections are empty.
    pub fn from_documents(mut collections: BTreeMap<Collection, Documents>) -> Self {
        let mut take = |collection: Collection| collections.remove(&collection).unwrap_or_default();
        Self {
            agents: decode_records(&take(Collection::Agents)),
            customers: decode_records(&take(Collection::Customers)),
            orders: decode_records(&take(Collection::Orders)),
            products: decode_records(&take(Collection::Products)),
            territories: decode_records(&take(Collection::Territories)),
        }
    }

    pub fn agent(&self, key: &str) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == key)
    }
}
