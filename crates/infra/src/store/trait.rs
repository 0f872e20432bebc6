use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use adminhub_core::{Record, RecordId};
use std::sync::Arc;

/// A record as the store sees it: storage id, unique key, opaque JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: RecordId,
    pub business_key: Option<String>,
    pub body: JsonValue,
}

impl StoredDocument {
    pub fn from_record<R: Record>(record: &R) -> Result<Self, StoreError> {
        let body = serde_json::to_value(record)
            .map_err(|e| StoreError::Serialization(format!("{}: {e}", R::COLLECTION)))?;
        Ok(Self {
            id: *record.id(),
            business_key: record.business_key(),
            body,
        })
    }

    pub fn into_record<R: Record>(self) -> Result<R, StoreError> {
        serde_json::from_value(self.body)
            .map_err(|e| StoreError::Serialization(format!("{} {}: {e}", R::COLLECTION, self.id)))
    }
}

/// Document store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors
/// (validation, invariants).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Uniqueness violation on the collection's business key.
    #[error("unique constraint violated in '{collection}' for key '{key}'")]
    Conflict { collection: String, key: String },

    #[error("document not found")]
    NotFound,

    /// The backing store could not be reached or the statement failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("document serialization failed: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Collection-scoped document storage.
///
/// ## Implementation Requirements
///
/// - `insert` fails with [`StoreError::Conflict`] when another document in the
///   same collection already holds the business key. This is the sole
///   correctness backstop for concurrent identifier allocation and must be
///   enforced atomically by the backend.
/// - `replace` enforces the same constraint and fails with
///   [`StoreError::NotFound`] for unknown ids.
/// - `list` returns documents in creation order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, doc: StoredDocument) -> Result<(), StoreError>;

    async fn replace(&self, collection: &str, doc: StoredDocument) -> Result<(), StoreError>;

    async fn get(&self, collection: &str, id: RecordId) -> Result<Option<StoredDocument>, StoreError>;

    async fn find_by_key(&self, collection: &str, key: &str)
    -> Result<Option<StoredDocument>, StoreError>;

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;

    /// Returns whether a document was removed.
    async fn delete(&self, collection: &str, id: RecordId) -> Result<bool, StoreError>;

    /// Every non-null business key in the collection (projection only).
    async fn business_keys(&self, collection: &str) -> Result<Vec<String>, StoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn insert(&self, collection: &str, doc: StoredDocument) -> Result<(), StoreError> {
        (**self).insert(collection, doc).await
    }

    async fn replace(&self, collection: &str, doc: StoredDocument) -> Result<(), StoreError> {
        (**self).replace(collection, doc).await
    }

    async fn get(&self, collection: &str, id: RecordId) -> Result<Option<StoredDocument>, StoreError> {
        (**self).get(collection, id).await
    }

    async fn find_by_key(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        (**self).find_by_key(collection, key).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        (**self).list(collection).await
    }

    async fn delete(&self, collection: &str, id: RecordId) -> Result<bool, StoreError> {
        (**self).delete(collection, id).await
    }

    async fn business_keys(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        (**self).business_keys(collection).await
    }
}
