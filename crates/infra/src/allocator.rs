//! Prefixed sequential identifier allocation with a collision guard.
//!
//! Allocation is a pure function of what is stored right now: scan every
//! business key of the kind's collection, take the largest numeric suffix that
//! matches `^PREFIX-\d+$`, add one. Nothing is cached between calls.
//!
//! Two concurrent creations can compute the same candidate. The store's unique
//! constraint on the business key lets exactly one of them commit; the loser
//! sees [`StoreError::Conflict`] and goes back to scanning, up to
//! `max_attempts` times:
//!
//! ```text
//! Computing -> Inserting -> Committed
//!                       \-> Conflict -> Computing (attempt + 1) ... -> Exhausted
//! ```
//!
//! Deleting an identified record through [`IdentifierAllocator::delete`] keeps
//! its identifier in a `<collection>.retired` collection, which the scan also
//! reads, so a deleted sequence number is never handed out again.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use adminhub_core::{DomainError, EntityKind, IdentifiedRecord, Identifier, RecordId};

use crate::repository::Records;
use crate::store::{DocumentStore, StoreError, StoredDocument};

/// Attempts per creation before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Error)]
pub enum AllocationError {
    /// Reading identifiers or inserting the record failed for a reason other
    /// than a uniqueness conflict. Never replaced with a default identifier.
    #[error("identifier storage unavailable: {0}")]
    StorageUnavailable(#[source] StoreError),

    #[error("could not allocate a unique {kind} identifier after {attempts} attempts")]
    Exhausted { kind: EntityKind, attempts: u32 },

    #[error("{kind} identifier sequence is exhausted")]
    SequenceOverflow { kind: EntityKind },

    #[error("identifier format: {0}")]
    Format(#[from] DomainError),
}

/// Result of scanning one kind's stored identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierScan {
    pub kind: EntityKind,
    /// Largest well-formed sequence, live or retired.
    pub max_sequence: Option<u64>,
    /// Live values that do not match `^PREFIX-\d+$`.
    pub malformed: Vec<String>,
}

impl IdentifierScan {
    pub fn next_sequence(&self) -> Result<u64, AllocationError> {
        match self.max_sequence {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or(AllocationError::SequenceOverflow { kind: self.kind }),
        }
    }
}

/// Stored identifiers that are not in the kind's canonical format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierAudit {
    pub kind: EntityKind,
    pub prefix: &'static str,
    pub width: usize,
    pub total: usize,
    pub non_canonical: Vec<String>,
}

fn retired_collection(kind: EntityKind) -> String {
    format!("{}.retired", kind.collection())
}

#[derive(Debug, Clone)]
pub struct IdentifierAllocator<S> {
    records: Records<S>,
    max_attempts: u32,
}

impl<S> IdentifierAllocator<S>
where
    S: DocumentStore,
{
    pub fn new(records: Records<S>) -> Self {
        Self {
            records,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override the attempt bound. Values below 1 are raised to 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Scan live and retired identifiers of `kind`.
    #[instrument(skip_all, fields(kind = %kind), err)]
    pub async fn scan(&self, kind: EntityKind) -> Result<IdentifierScan, AllocationError> {
        let scanner = kind.format().scanner()?;

        let live = self
            .records
            .business_keys(kind.collection())
            .await
            .map_err(AllocationError::StorageUnavailable)?;
        let retired = self
            .records
            .business_keys(&retired_collection(kind))
            .await
            .map_err(AllocationError::StorageUnavailable)?;

        let mut max_sequence = None;
        let mut malformed = Vec::new();
        for raw in live {
            match scanner.sequence_of(&raw) {
                Some(seq) => max_sequence = max_sequence.max(Some(seq)),
                None => {
                    warn!(kind = %kind, value = %raw, "malformed identifier excluded from allocation");
                    malformed.push(raw);
                }
            }
        }
        for raw in retired {
            if let Some(seq) = scanner.sequence_of(&raw) {
                max_sequence = max_sequence.max(Some(seq));
            }
        }

        Ok(IdentifierScan {
            kind,
            max_sequence,
            malformed,
        })
    }

    /// Next identifier for `kind` given current contents. Reserves nothing;
    /// also used as the preview shown before a create.
    pub async fn allocate_next(&self, kind: EntityKind) -> Result<Identifier, AllocationError> {
        let scan = self.scan(kind).await?;
        Ok(kind.format().render(scan.next_sequence()?))
    }

    /// Allocate an identifier and insert the record built from it, retrying
    /// on uniqueness conflicts.
    ///
    /// `build` may run more than once, once per attempt.
    #[instrument(skip_all, fields(kind = %R::KIND), err)]
    pub async fn create<R, F>(&self, mut build: F) -> Result<R, AllocationError>
    where
        R: IdentifiedRecord,
        F: FnMut(Identifier) -> R,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = self.allocate_next(R::KIND).await?;
            let record = build(candidate);

            match self.records.insert(&record).await {
                Ok(()) => {
                    debug!(identifier = %record.identifier(), attempt, "identifier committed");
                    return Ok(record);
                }
                Err(StoreError::Conflict { key, .. }) => {
                    warn!(identifier = %key, attempt, "identifier collision, retrying");
                }
                Err(other) => return Err(AllocationError::StorageUnavailable(other)),
            }
        }

        Err(AllocationError::Exhausted {
            kind: R::KIND,
            attempts: self.max_attempts,
        })
    }

    /// Delete an identified record and retire its identifier.
    ///
    /// Returns the deleted record, or `None` if it did not exist.
    #[instrument(skip_all, fields(kind = %R::KIND, id = %id), err)]
    pub async fn delete<R>(&self, id: RecordId) -> Result<Option<R>, StoreError>
    where
        R: IdentifiedRecord,
    {
        let Some(record) = self.records.get::<R>(id).await? else {
            return Ok(None);
        };

        let tombstone = StoredDocument {
            id: RecordId::new(),
            business_key: Some(record.identifier().to_string()),
            body: serde_json::json!({
                "identifier": record.identifier(),
                "recordId": id,
            }),
        };
        match self
            .records
            .store()
            .insert(&retired_collection(R::KIND), tombstone)
            .await
        {
            Ok(()) | Err(StoreError::Conflict { .. }) => {}
            Err(other) => return Err(other),
        }

        if self.records.delete::<R>(id).await? {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    /// Report live identifiers that fail strict parsing against the kind's
    /// canonical format (legacy `H003`, short `TMS-42`, ...).
    #[instrument(skip_all, fields(kind = %kind), err)]
    pub async fn audit(&self, kind: EntityKind) -> Result<IdentifierAudit, AllocationError> {
        let format = kind.format();
        let live = self
            .records
            .business_keys(kind.collection())
            .await
            .map_err(AllocationError::StorageUnavailable)?;

        let total = live.len();
        let mut non_canonical: Vec<String> = live
            .into_iter()
            .filter(|raw| format.parse(raw).is_err())
            .collect();
        non_canonical.sort();

        Ok(IdentifierAudit {
            kind,
            prefix: format.prefix(),
            width: format.width(),
            total,
            non_canonical,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;
    use adminhub_isp::{Customer, NewCustomer};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use tokio::sync::Barrier;

    fn new_customer(name: &str) -> NewCustomer {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "phone": "+8801700000000",
            "package": "Home 10 Mbps",
            "monthlyFee": 50000
        }))
        .unwrap()
    }

    async fn create<S: DocumentStore>(alloc: &IdentifierAllocator<S>, name: &str) -> Customer {
        alloc
            .create(|customer_id| {
                Customer::new(RecordId::new(), customer_id, new_customer(name), Utc::now())
            })
            .await
            .unwrap()
    }

    fn allocator() -> IdentifierAllocator<Arc<InMemoryDocumentStore>> {
        IdentifierAllocator::new(Records::new(Arc::new(InMemoryDocumentStore::new())))
    }

    async fn seed(store: &impl DocumentStore, collection: &str, key: &str) {
        store
            .insert(
                collection,
                StoredDocument {
                    id: RecordId::new(),
                    business_key: Some(key.to_string()),
                    body: serde_json::json!({}),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_collection_starts_at_one() {
        let alloc = allocator();
        assert_eq!(alloc.allocate_next(EntityKind::Customer).await.unwrap().as_str(), "LC-001");
        assert_eq!(alloc.allocate_next(EntityKind::Tourist).await.unwrap().as_str(), "TMS-0001");
        assert_eq!(alloc.allocate_next(EntityKind::Hotel).await.unwrap().as_str(), "H-001");
    }

    #[tokio::test]
    async fn sequences_are_monotonic() {
        let alloc = allocator();
        for n in 1..=4u64 {
            let c = create(&alloc, "Rahim").await;
            assert_eq!(c.customer_id, EntityKind::Customer.format().render(n));
        }
        assert_eq!(alloc.allocate_next(EntityKind::Customer).await.unwrap().as_str(), "LC-005");
    }

    #[tokio::test]
    async fn kinds_have_independent_sequences() {
        let alloc = allocator();
        create(&alloc, "Rahim").await;
        create(&alloc, "Karim").await;
        assert_eq!(alloc.allocate_next(EntityKind::Guide).await.unwrap().as_str(), "GD-001");
    }

    #[tokio::test]
    async fn deleted_numbers_are_not_reused() {
        let alloc = allocator();
        let mut created = Vec::new();
        for _ in 0..5 {
            created.push(create(&alloc, "Rahim").await);
        }

        let third = alloc.delete::<Customer>(created[2].id).await.unwrap();
        assert_eq!(third.map(|c| c.customer_id.into_string()).as_deref(), Some("LC-003"));
        assert_eq!(alloc.allocate_next(EntityKind::Customer).await.unwrap().as_str(), "LC-006");

        // Deleting the current maximum does not roll the sequence back either.
        alloc.delete::<Customer>(created[4].id).await.unwrap();
        assert_eq!(alloc.allocate_next(EntityKind::Customer).await.unwrap().as_str(), "LC-006");

        assert!(alloc.delete::<Customer>(created[4].id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_identifiers_are_skipped() {
        let store = Arc::new(InMemoryDocumentStore::new());
        for key in ["LC-001", "LC-002", "LC-003", "LC-abc", "H003"] {
            seed(&store, "customers", key).await;
        }
        let alloc = IdentifierAllocator::new(Records::new(store));

        let scan = alloc.scan(EntityKind::Customer).await.unwrap();
        assert_eq!(scan.max_sequence, Some(3));
        let malformed: HashSet<_> = scan.malformed.iter().map(String::as_str).collect();
        assert_eq!(malformed, HashSet::from(["LC-abc", "H003"]));

        assert_eq!(alloc.allocate_next(EntityKind::Customer).await.unwrap().as_str(), "LC-004");
    }

    #[tokio::test]
    async fn rendering_widens_past_the_pad_width() {
        let store = Arc::new(InMemoryDocumentStore::new());
        seed(&store, "customers", "LC-006").await;
        let alloc = IdentifierAllocator::new(Records::new(store.clone()));
        assert_eq!(alloc.allocate_next(EntityKind::Customer).await.unwrap().as_str(), "LC-007");

        seed(&store, "customers", "LC-999").await;
        assert_eq!(alloc.allocate_next(EntityKind::Customer).await.unwrap().as_str(), "LC-1000");
    }

    #[tokio::test]
    async fn maximal_sequence_overflows_cleanly() {
        let store = Arc::new(InMemoryDocumentStore::new());
        seed(&store, "guides", &format!("GD-{}", u64::MAX)).await;
        let alloc = IdentifierAllocator::new(Records::new(store));
        assert!(matches!(
            alloc.allocate_next(EntityKind::Guide).await,
            Err(AllocationError::SequenceOverflow { kind: EntityKind::Guide })
        ));
    }

    #[tokio::test]
    async fn audit_lists_non_canonical_values() {
        let store = Arc::new(InMemoryDocumentStore::new());
        for key in ["H-001", "H003", "H-0004", "H-7"] {
            seed(&store, "hotels", key).await;
        }
        let alloc = IdentifierAllocator::new(Records::new(store));

        let audit = alloc.audit(EntityKind::Hotel).await.unwrap();
        assert_eq!(audit.total, 4);
        assert_eq!(audit.non_canonical, vec!["H-7".to_string(), "H003".to_string()]);
        assert_eq!(audit.prefix, "H");
    }

    /// Holds the first two customer scans at a barrier so both see the same
    /// (empty) collection and compute the same candidate.
    struct RacingStore {
        inner: InMemoryDocumentStore,
        barrier: Barrier,
        scans: AtomicUsize,
        conflicts: AtomicUsize,
    }

    /// Reports every insert as a uniqueness conflict.
    struct AlwaysConflicting {
        inserts: AtomicU32,
    }

    /// Fails every read.
    struct Unreachable;

    #[async_trait]
    impl DocumentStore for RacingStore {
        async fn insert(&self, collection: &str, doc: StoredDocument) -> Result<(), StoreError> {
            let result = self.inner.insert(collection, doc).await;
            if matches!(result, Err(StoreError::Conflict { .. })) {
                self.conflicts.fetch_add(1, Ordering::SeqCst);
            }
            result
        }
        async fn replace(&self, collection: &str, doc: StoredDocument) -> Result<(), StoreError> {
            self.inner.replace(collection, doc).await
        }
        async fn get(&self, collection: &str, id: RecordId) -> Result<Option<StoredDocument>, StoreError> {
            self.inner.get(collection, id).await
        }
        async fn find_by_key(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError> {
            self.inner.find_by_key(collection, key).await
        }
        async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
            self.inner.list(collection).await
        }
        async fn delete(&self, collection: &str, id: RecordId) -> Result<bool, StoreError> {
            self.inner.delete(collection, id).await
        }
        async fn business_keys(&self, collection: &str) -> Result<Vec<String>, StoreError> {
            let keys = self.inner.business_keys(collection).await?;
            if collection == "customers" && self.scans.fetch_add(1, Ordering::SeqCst) < 2 {
                self.barrier.wait().await;
            }
            Ok(keys)
        }
    }

    #[async_trait]
    impl DocumentStore for AlwaysConflicting {
        async fn insert(&self, collection: &str, _doc: StoredDocument) -> Result<(), StoreError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Conflict {
                collection: collection.to_string(),
                key: "LC-001".to_string(),
            })
        }
        async fn replace(&self, _: &str, _: StoredDocument) -> Result<(), StoreError> {
            Err(StoreError::NotFound)
        }
        async fn get(&self, _: &str, _: RecordId) -> Result<Option<StoredDocument>, StoreError> {
            Ok(None)
        }
        async fn find_by_key(&self, _: &str, _: &str) -> Result<Option<StoredDocument>, StoreError> {
            Ok(None)
        }
        async fn list(&self, _: &str) -> Result<Vec<StoredDocument>, StoreError> {
            Ok(Vec::new())
        }
        async fn delete(&self, _: &str, _: RecordId) -> Result<bool, StoreError> {
            Ok(false)
        }
        async fn business_keys(&self, _: &str) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl DocumentStore for Unreachable {
        async fn insert(&self, _: &str, _: StoredDocument) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn replace(&self, _: &str, _: StoredDocument) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn get(&self, _: &str, _: RecordId) -> Result<Option<StoredDocument>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn find_by_key(&self, _: &str, _: &str) -> Result<Option<StoredDocument>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn list(&self, _: &str) -> Result<Vec<StoredDocument>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn delete(&self, _: &str, _: RecordId) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn business_keys(&self, _: &str) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn concurrent_creations_both_succeed_with_distinct_identifiers() {
        let store = Arc::new(RacingStore {
            inner: InMemoryDocumentStore::new(),
            barrier: Barrier::new(2),
            scans: AtomicUsize::new(0),
            conflicts: AtomicUsize::new(0),
        });
        let alloc = IdentifierAllocator::new(Records::new(store.clone()));

        let (a, b) = tokio::join!(create(&alloc, "Rahim"), create(&alloc, "Karim"));

        let ids: HashSet<_> = [a.customer_id.as_str(), b.customer_id.as_str()].into();
        assert_eq!(ids, HashSet::from(["LC-001", "LC-002"]));
        // The loser went through the retry path.
        assert_eq!(store.conflicts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn persistent_conflicts_exhaust_the_bound() {
        let store = Arc::new(AlwaysConflicting {
            inserts: AtomicU32::new(0),
        });
        let alloc = IdentifierAllocator::new(Records::new(store.clone()));

        let err = alloc
            .create(|customer_id| {
                Customer::new(RecordId::new(), customer_id, new_customer("Rahim"), Utc::now())
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AllocationError::Exhausted { kind: EntityKind::Customer, attempts: 5 }
        ));
        assert_eq!(store.inserts.load(Ordering::SeqCst), DEFAULT_MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn attempt_bound_is_configurable() {
        let store = Arc::new(AlwaysConflicting {
            inserts: AtomicU32::new(0),
        });
        let alloc = IdentifierAllocator::new(Records::new(store.clone())).with_max_attempts(2);

        let err = alloc
            .create(|customer_id| {
                Customer::new(RecordId::new(), customer_id, new_customer("Rahim"), Utc::now())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AllocationError::Exhausted { attempts: 2, .. }));
        assert_eq!(store.inserts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn storage_failure_is_propagated_not_defaulted() {
        let alloc = IdentifierAllocator::new(Records::new(Arc::new(Unreachable)));

        assert!(matches!(
            alloc.allocate_next(EntityKind::Guide).await,
            Err(AllocationError::StorageUnavailable(StoreError::Unavailable(_)))
        ));

        let mut built = 0;
        let err = alloc
            .create(|customer_id| {
                built += 1;
                Customer::new(RecordId::new(), customer_id, new_customer("Rahim"), Utc::now())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AllocationError::StorageUnavailable(_)));
        assert_eq!(built, 0);
    }
}
