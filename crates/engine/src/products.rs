//! Products and territories. Both are reference data: the back office only
//! reads and counts them.

use serde::{Deserialize, Serialize};

use crate::{Collection, Record, decode};

/// A sellable product.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(skip)]
    pub id: String,
    #[serde(deserialize_with = "decode::text")]
    pub name: String,
    #[serde(deserialize_with = "decode::number")]
    pub price: f64,
    #[serde(deserialize_with = "decode::text")]
    pub sku: String,
}

impl Record for Product {
    const COLLECTION: Collection = Collection::Products;

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// A sales territory drawn on the territory map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Territory {
    #[serde(skip)]
    pub id: String,
    #[serde(deserialize_with = "decode::text")]
    pub name: String,
    #[serde(deserialize_with = "decode::text")]
    pub agent_id: String,
    #[serde(deserialize_with = "decode::text")]
    pub description: String,
}

impl Record for Territory {
    const COLLECTION: Collection = Collection::Territories;

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn id(&self) -> &str {
        &self.id
    }
}
