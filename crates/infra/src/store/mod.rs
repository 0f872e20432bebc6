//! Document store boundary.
//!
//! Records are stored as JSON bodies in named collections, keyed by their
//! `RecordId`. Each collection enforces uniqueness on an optional business key
//! (identifier, zone name, ...): that constraint is what the identifier
//! allocator's collision guard relies on.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use r#trait::{DocumentStore, StoreError, StoredDocument};
