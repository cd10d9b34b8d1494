//! Ledger error types.

use thiserror::Error;
use uuid::Uuid;

use super::validation::ValidationError;
use crate::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced record does not exist for this owner.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// Requested ID.
        id: Uuid,
    },

    /// A running total left the representable range.
    #[error("Amount totals exceed the supported range")]
    Overflow,

    /// The store failed.
    #[error("Storage failure: {0}")]
    Store(StoreError),
}

impl LedgerError {
    /// Customer lookup miss.
    #[must_use]
    pub const fn customer_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity: "Customer",
            id,
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownCustomer(id) => Self::customer_not_found(id.into_inner()),
            other => Self::Store(other),
        }
    }
}
