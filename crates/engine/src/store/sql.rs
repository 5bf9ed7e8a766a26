use async_trait::async_trait;
use sea_orm::{
    ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::OnConflict,
};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{Collection, Documents, EngineError, ResultEngine};

use super::{ChangeFeed, DocumentStore, Subscription, documents, merge};

/// Store backed by the `documents` table.
///
/// Subscriptions only see writes made through this instance.
#[derive(Debug)]
pub struct SqlStore {
    database: DatabaseConnection,
    feed: ChangeFeed,
    // Keeps write + publish atomic so subscribers never see snapshots out of order.
    writes: Mutex<()>,
}

impl SqlStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            database,
            feed: ChangeFeed::default(),
            writes: Mutex::new(()),
        }
    }

    async fn load<C: ConnectionTrait>(
        connection: &C,
        collection: Collection,
    ) -> ResultEngine<Documents> {
        let rows = documents::Entity::find()
            .filter(documents::Column::Collection.eq(collection.as_str()))
            .order_by_asc(documents::Column::Id)
            .all(connection)
            .await?;

        let mut loaded = Documents::new();
        for row in rows {
            match serde_json::from_str::<Value>(&row.body) {
                Ok(body) => {
                    loaded.insert(row.id, body);
                }
                Err(err) => {
                    tracing::warn!("skipping {collection}/{}: unreadable body: {err}", row.id);
                }
            }
        }
        Ok(loaded)
    }

    /// Push the collection to its subscribers. Runs after the write has
    /// committed, so a failed reload is logged and never reported as a failed
    /// write.
    async fn publish(&self, collection: Collection) {
        if !self.feed.is_watched(collection) {
            return;
        }
        match Self::load(&self.database, collection).await {
            Ok(documents) => self.feed.publish(collection, documents),
            Err(err) => {
                tracing::warn!("failed to reload {collection} for subscribers: {err}");
            }
        }
    }
}

#[async_trait]
impl DocumentStore for SqlStore {
    async fn get_all(&self, collection: Collection) -> ResultEngine<Documents> {
        Self::load(&self.database, collection).await
    }

    async fn get(&self, collection: Collection, id: &str) -> ResultEngine<Option<Value>> {
        let Some(row) = documents::Entity::find_by_id((collection.to_string(), id.to_string()))
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&row.body)?))
    }

    async fn create(&self, collection: Collection, id: &str, document: Value) -> ResultEngine<()> {
        let _guard = self.writes.lock().await;
        let row = documents::ActiveModel {
            collection: ActiveValue::Set(collection.to_string()),
            id: ActiveValue::Set(id.to_string()),
            body: ActiveValue::Set(serde_json::to_string(&document)?),
        };
        documents::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([documents::Column::Collection, documents::Column::Id])
                    .update_column(documents::Column::Body)
                    .to_owned(),
            )
            .exec_without_returning(&self.database)
            .await?;
        self.publish(collection).await;
        Ok(())
    }

    async fn update(&self, collection: Collection, id: &str, partial: Value) -> ResultEngine<()> {
        let _guard = self.writes.lock().await;
        let db_tx = self.database.begin().await?;
        let row = documents::Entity::find_by_id((collection.to_string(), id.to_string()))
            .one(&db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;

        let mut document: Value = serde_json::from_str(&row.body)?;
        merge(&mut document, partial)?;

        let mut row: documents::ActiveModel = row.into();
        row.body = ActiveValue::Set(serde_json::to_string(&document)?);
        row.update(&db_tx).await?;
        db_tx.commit().await?;

        self.publish(collection).await;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> ResultEngine<()> {
        let _guard = self.writes.lock().await;
        let result = documents::Entity::delete_by_id((collection.to_string(), id.to_string()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(id.to_string()));
        }
        self.publish(collection).await;
        Ok(())
    }

    async fn subscribe(&self, collection: Collection) -> ResultEngine<Subscription> {
        let _guard = self.writes.lock().await;
        let current = Self::load(&self.database, collection).await?;
        Ok(self.feed.subscribe(collection, current))
    }
}
