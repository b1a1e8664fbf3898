use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde_json::Value;

use super::{MovieStore, StoreError, StoreResult, merge_into};
use crate::{
    entities::document,
    models::{Document, MovieId},
};

#[derive(Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
    collection: String,
}

impl SqliteStore {
    pub fn new(db: DatabaseConnection, collection: impl Into<String>) -> Self {
        Self { db, collection: collection.into() }
    }

    async fn find(
        &self,
        conn: &impl sea_orm::ConnectionTrait,
        id: &MovieId,
    ) -> StoreResult<Option<document::Model>> {
        let row = document::Entity::find_by_id(id.as_str().to_string())
            .filter(document::Column::Collection.eq(self.collection.as_str()))
            .one(conn)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl MovieStore for SqliteStore {
    async fn create(&self, fields: Document) -> StoreResult<MovieId> {
        let id = MovieId::generate();
        let now = now_sec();
        let model = document::ActiveModel {
            id: Set(id.as_str().to_string()),
            collection: Set(self.collection.clone()),
            data: Set(serde_json::to_string(&fields)?),
            created_at: Set(now),
            updated_at: Set(now),
        };

        document::Entity::insert(model).exec_without_returning(&self.db).await?;
        tracing::debug!(collection = %self.collection, id = %id, "document created");

        Ok(id)
    }

    async fn get(&self, id: &MovieId) -> StoreResult<Option<Document>> {
        let Some(row) = self.find(&self.db, id).await? else {
            return Ok(None);
        };
        decode(&row).map(Some)
    }

    async fn update(&self, id: &MovieId, partial: Document) -> StoreResult<()> {
        let txn = self.db.begin().await?;

        let Some(row) = self.find(&txn, id).await? else {
            return Err(StoreError::NotFound {
                collection: self.collection.clone(),
                id: id.clone(),
            });
        };

        let mut data = decode(&row)?;
        merge_into(&mut data, partial);

        let mut active: document::ActiveModel = row.into();
        active.data = Set(serde_json::to_string(&data)?);
        active.updated_at = Set(now_sec());
        active.update(&txn).await?;

        txn.commit().await?;
        tracing::debug!(collection = %self.collection, id = %id, "document updated");

        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<(MovieId, Document)>> {
        let rows = document::Entity::find()
            .filter(document::Column::Collection.eq(self.collection.as_str()))
            .order_by_asc(document::Column::CreatedAt)
            .order_by_asc(document::Column::Id)
            .all(&self.db)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            match decode(&row) {
                Ok(doc) => out.push((MovieId::new(row.id), doc)),
                Err(err) => tracing::warn!(id = %row.id, error = %err, "skipping malformed document"),
            }
        }
        Ok(out)
    }
}

fn decode(row: &document::Model) -> StoreResult<Document> {
    let malformed = |source| StoreError::Malformed { id: MovieId::new(row.id.clone()), source };
    match serde_json::from_str::<Value>(&row.data).map_err(malformed)? {
        Value::Object(map) => Ok(map),
        other => Err(malformed(serde::de::Error::custom(format!(
            "expected an object, found {other}"
        )))),
    }
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}
