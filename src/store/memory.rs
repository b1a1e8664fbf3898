use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MovieStore, StoreError, StoreResult, merge_into};
use crate::models::{Document, MovieId};

/// In-process store. Documents are kept in insertion order.
pub struct MemoryStore {
    collection: String,
    docs: RwLock<Vec<(MovieId, Document)>>,
}

impl MemoryStore {
    pub fn new(collection: impl Into<String>) -> Self {
        Self { collection: collection.into(), docs: RwLock::new(Vec::new()) }
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn create(&self, fields: Document) -> StoreResult<MovieId> {
        let id = MovieId::generate();
        self.docs.write().await.push((id.clone(), fields));
        tracing::debug!(collection = %self.collection, id = %id, "document created");
        Ok(id)
    }

    async fn get(&self, id: &MovieId) -> StoreResult<Option<Document>> {
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|(doc_id, _)| doc_id == id).map(|(_, doc)| doc.clone()))
    }

    async fn update(&self, id: &MovieId, partial: Document) -> StoreResult<()> {
        let mut docs = self.docs.write().await;
        let Some((_, doc)) = docs.iter_mut().find(|(doc_id, _)| doc_id == id) else {
            return Err(StoreError::NotFound {
                collection: self.collection.clone(),
                id: id.clone(),
            });
        };
        merge_into(doc, partial);
        tracing::debug!(collection = %self.collection, id = %id, "document updated");
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<(MovieId, Document)>> {
        Ok(self.docs.read().await.clone())
    }
}
