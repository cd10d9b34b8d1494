//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Ledger repositories run every call inside an [`OwnerScope`](crate::rls::OwnerScope).

pub mod customer;
pub mod payment;
pub mod session;
pub mod transaction;
pub mod user;

pub use customer::CustomerRepository;
pub use payment::PaymentRepository;
pub use session::SessionRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;

use sea_orm::{ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter, SqlErr};
use uuid::Uuid;

use crate::entities::customers;

/// Error types for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Referenced customer does not exist for the owner.
    #[error("Customer not found: {0}")]
    UnknownCustomer(Uuid),

    /// Unique constraint violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Conflict(detail),
            _ => Self::Database(err),
        }
    }
}

/// Fails with `UnknownCustomer` unless the owner has this customer.
async fn ensure_customer(
    txn: &DatabaseTransaction,
    owner: Uuid,
    customer_id: Uuid,
) -> Result<(), RepositoryError> {
    let found = customers::Entity::find_by_id(customer_id)
        .filter(customers::Column::AdminId.eq(owner))
        .count(txn)
        .await?;

    if found == 0 {
        return Err(RepositoryError::UnknownCustomer(customer_id));
    }
    Ok(())
}
