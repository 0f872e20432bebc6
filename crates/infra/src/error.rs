//! Service-level error shared by infra services and the HTTP layer.

use thiserror::Error;

use adminhub_core::DomainError;

use crate::allocator::AllocationError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("{0} not found")]
    NotFound(String),

    /// A unique name or key is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Identifier allocation failed (exhausted, overflowed or storage).
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl ServiceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => ServiceError::Validation(msg),
            DomainError::InvalidId(msg) => ServiceError::Validation(msg),
            DomainError::InvariantViolation(msg) => ServiceError::InvariantViolation(msg),
            DomainError::Conflict(msg) => ServiceError::Conflict(msg),
            DomainError::NotFound => ServiceError::NotFound("record".to_string()),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict { collection, key } => {
                ServiceError::Conflict(format!("'{key}' already exists in {collection}"))
            }
            StoreError::NotFound => ServiceError::NotFound("record".to_string()),
            other => ServiceError::Store(other),
        }
    }
}
