//! `adminhub-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! storage ids, human-facing identifiers and the record traits the store layer
//! is generic over.

pub mod entity;
pub mod error;
pub mod id;
pub mod identifier;
pub mod value_object;

pub use entity::{Entity, IdentifiedRecord, Record};
pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use identifier::{EntityKind, IdFormat, Identifier};
pub use value_object::ValueObject;
