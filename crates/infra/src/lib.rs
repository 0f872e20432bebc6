//! Infrastructure layer: document storage, identifier allocation, zone
//! maintenance.

pub mod allocator;
pub mod error;
pub mod repository;
pub mod store;
pub mod zones;

pub use allocator::{
    AllocationError, DEFAULT_MAX_ATTEMPTS, IdentifierAllocator, IdentifierAudit, IdentifierScan,
};
pub use error::ServiceError;
pub use repository::Records;
pub use store::{DocumentStore, InMemoryDocumentStore, PostgresDocumentStore, StoreError, StoredDocument};
pub use zones::{ZoneChange, ZoneService};
