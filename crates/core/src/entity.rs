//! Entity traits: identity + continuity across state changes.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::id::RecordId;
use crate::identifier::{EntityKind, Identifier};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// A document persisted in a named store collection.
///
/// The serialized form is the stored body. `business_key` is the value the store
/// enforces uniqueness on within the collection (identifier, zone name, ...).
pub trait Record:
    Entity<Id = RecordId> + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    const COLLECTION: &'static str;

    fn business_key(&self) -> Option<String>;
}

/// A record whose business key is an allocated [`Identifier`].
pub trait IdentifiedRecord: Record {
    const KIND: EntityKind;

    fn identifier(&self) -> &Identifier;
}
