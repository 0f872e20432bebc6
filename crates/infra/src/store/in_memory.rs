use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use adminhub_core::RecordId;

use super::r#trait::{DocumentStore, StoreError, StoredDocument};

#[derive(Debug, Default)]
struct Collection {
    /// UUIDv7 keys keep creation order.
    docs: BTreeMap<Uuid, StoredDocument>,
    /// Unique business-key index.
    keys: HashMap<String, Uuid>,
}

/// In-memory document store.
///
/// Intended for tests/dev. The unique index is checked and updated under the
/// same write lock as the document map, so concurrent inserts of one key
/// resolve to exactly one winner.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

fn conflict(collection: &str, key: &str) -> StoreError {
    StoreError::Conflict {
        collection: collection.to_string(),
        key: key.to_string(),
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, collection: &str, doc: StoredDocument) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        let col = collections.entry(collection.to_string()).or_default();

        let id = *doc.id.as_uuid();
        if col.docs.contains_key(&id) {
            return Err(conflict(collection, &id.to_string()));
        }
        if let Some(key) = &doc.business_key {
            if col.keys.contains_key(key) {
                return Err(conflict(collection, key));
            }
            col.keys.insert(key.clone(), id);
        }
        col.docs.insert(id, doc);
        Ok(())
    }

    async fn replace(&self, collection: &str, doc: StoredDocument) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        let col = collections.get_mut(collection).ok_or(StoreError::NotFound)?;

        let id = *doc.id.as_uuid();
        let previous_key = match col.docs.get(&id) {
            Some(existing) => existing.business_key.clone(),
            None => return Err(StoreError::NotFound),
        };

        if let Some(key) = &doc.business_key {
            if col.keys.get(key).is_some_and(|owner| *owner != id) {
                return Err(conflict(collection, key));
            }
        }
        if let Some(old) = previous_key {
            col.keys.remove(&old);
        }
        if let Some(key) = &doc.business_key {
            col.keys.insert(key.clone(), id);
        }
        col.docs.insert(id, doc);
        Ok(())
    }

    async fn get(&self, collection: &str, id: RecordId) -> Result<Option<StoredDocument>, StoreError> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        Ok(collections
            .get(collection)
            .and_then(|col| col.docs.get(id.as_uuid()))
            .cloned())
    }

    async fn find_by_key(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        Ok(collections.get(collection).and_then(|col| {
            col.keys
                .get(key)
                .and_then(|id| col.docs.get(id))
                .cloned()
        }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        Ok(collections
            .get(collection)
            .map(|col| col.docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, collection: &str, id: RecordId) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        let Some(col) = collections.get_mut(collection) else {
            return Ok(false);
        };

        match col.docs.remove(id.as_uuid()) {
            Some(doc) => {
                if let Some(key) = doc.business_key {
                    col.keys.remove(&key);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn business_keys(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        Ok(collections
            .get(collection)
            .map(|col| col.keys.keys().cloned().collect())
            .unwrap_or_default())
    }
}
