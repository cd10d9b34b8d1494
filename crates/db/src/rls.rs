//! Row-Level Security (RLS) context management.
//!
//! Ledger tables only admit rows whose `admin_id` matches the
//! `app.current_owner_id` setting, so every ledger query runs inside an
//! [`OwnerScope`].
//!
//! # Usage
//!
//! ```ignore
//! use bahi_db::rls::OwnerScope;
//!
//! let scope = OwnerScope::begin(&db, owner_id).await?;
//! let rows = customers::Entity::find().all(scope.transaction()).await?;
//! scope.commit().await?;
//! ```

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

use bahi_shared::types::OwnerId;

/// A database transaction with the owner RLS context set.
///
/// Dropping the scope without committing rolls the transaction back.
pub struct OwnerScope {
    txn: DatabaseTransaction,
}

impl OwnerScope {
    /// Begins a transaction and sets `app.current_owner_id` with `SET LOCAL`,
    /// which scopes the setting to this transaction only.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the context
    /// cannot be set.
    pub async fn begin(db: &DatabaseConnection, owner: OwnerId) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        txn.execute_unprepared(&set_owner_sql(owner)).await?;
        Ok(Self { txn })
    }

    /// Returns the underlying transaction for executing queries.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls the transaction back.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

// The owner id is a typed UUID, so interpolation cannot inject SQL.
fn set_owner_sql(owner: OwnerId) -> String {
    format!("SET LOCAL app.current_owner_id = '{owner}'")
}
