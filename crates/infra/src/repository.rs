//! Typed access to a [`DocumentStore`].
//!
//! `Records` is the only place records are converted to and from stored JSON;
//! services above it deal in domain types only.

use adminhub_core::{Record, RecordId};

use crate::store::{DocumentStore, StoreError, StoredDocument};

#[derive(Debug, Clone)]
pub struct Records<S> {
    store: S,
}

impl<S> Records<S>
where
    S: DocumentStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn insert<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        let doc = StoredDocument::from_record(record)?;
        self.store.insert(R::COLLECTION, doc).await
    }

    pub async fn replace<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        let doc = StoredDocument::from_record(record)?;
        self.store.replace(R::COLLECTION, doc).await
    }

    pub async fn get<R: Record>(&self, id: RecordId) -> Result<Option<R>, StoreError> {
        self.store
            .get(R::COLLECTION, id)
            .await?
            .map(StoredDocument::into_record)
            .transpose()
    }

    /// Like [`Records::get`] but a missing record is [`StoreError::NotFound`].
    pub async fn require<R: Record>(&self, id: RecordId) -> Result<R, StoreError> {
        self.get(id).await?.ok_or(StoreError::NotFound)
    }

    pub async fn find_by_key<R: Record>(&self, key: &str) -> Result<Option<R>, StoreError> {
        self.store
            .find_by_key(R::COLLECTION, key)
            .await?
            .map(StoredDocument::into_record)
            .transpose()
    }

    pub async fn list<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        self.store
            .list(R::COLLECTION)
            .await?
            .into_iter()
            .map(StoredDocument::into_record)
            .collect()
    }

    pub async fn delete<R: Record>(&self, id: RecordId) -> Result<bool, StoreError> {
        self.store.delete(R::COLLECTION, id).await
    }

    pub async fn business_keys(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        self.store.business_keys(collection).await
    }
}
