//! Document-store collaborator behind the forms.
//!
//! Documents live in named collections and are addressed by opaque ids. The
//! store only knows JSON objects; field names are the forms' business.

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::models::{Document, MovieId};

pub use self::{memory::MemoryStore, sqlite::SqliteStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no document to update: {collection}/{id}")]
    NotFound { collection: String, id: MovieId },

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("stored document {id} is not a JSON object: {source}")]
    Malformed {
        id: MovieId,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Stores a new document and returns the id the store assigned.
    async fn create(&self, fields: Document) -> StoreResult<MovieId>;

    /// Returns `None` when no document with this id exists.
    async fn get(&self, id: &MovieId) -> StoreResult<Option<Document>>;

    /// Shallow-merges `partial` into an existing document. Never inserts.
    async fn update(&self, id: &MovieId, partial: Document) -> StoreResult<()>;

    /// All documents of the collection, oldest first.
    async fn list(&self) -> StoreResult<Vec<(MovieId, Document)>>;
}

/// Top-level merge: keys in `partial` replace those in `target`.
pub(crate) fn merge_into(target: &mut Document, partial: Document) {
    for (key, value) in partial {
        target.insert(key, value);
    }
}
