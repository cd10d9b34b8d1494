//! Storage interfaces for the ledger and identity records.
//!
//! Every ledger operation takes the owner it acts for and never reads or
//! writes another owner's rows. Implementations:
//! - [`memory::MemoryLedgerStore`] / [`memory::MemoryIdentityStore`]: in-process maps
//! - `bahi_db::SeaOrmLedgerStore` / `bahi_db::SeaOrmIdentityStore`: PostgreSQL

pub mod memory;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use bahi_shared::types::{CustomerId, OwnerId, PaymentId, SessionId, TransactionId};

use crate::auth::{NewSession, NewUser, Session, User};
use crate::ledger::{
    Customer, CustomerPatch, NewCustomer, NewPayment, NewTransaction, Payment, PaymentPatch,
    Transaction, TransactionPatch,
};

pub use memory::{MemoryIdentityStore, MemoryLedgerStore};

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A transaction or payment referenced a customer the owner does not have.
    #[error("Customer not found: {0}")]
    UnknownCustomer(CustomerId),

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend failed (unreachable, schema missing, permission denied).
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Ordering for customer lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerOrder {
    /// Most recently created first.
    #[default]
    Newest,
    /// Alphabetical by name, case-insensitive.
    Name,
}

/// Owner-scoped access to customers, transactions and payments.
///
/// Lists are ordered: customers per [`CustomerOrder`], transactions by
/// `transaction_date` then `created_at` (both descending), payments by
/// `payment_date` then `created_at` (both descending).
#[async_trait]
pub trait LedgerStore: Send + Sync {
    // ========== Customers ==========

    /// Lists the owner's customers.
    async fn list_customers(&self, owner: OwnerId, order: CustomerOrder)
    -> StoreResult<Vec<Customer>>;

    /// Fetches one customer.
    async fn get_customer(&self, owner: OwnerId, id: CustomerId) -> StoreResult<Option<Customer>>;

    /// Inserts a customer.
    async fn create_customer(&self, owner: OwnerId, input: NewCustomer) -> StoreResult<Customer>;

    /// Applies a patch; `None` if the customer does not exist.
    async fn update_customer(
        &self,
        owner: OwnerId,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> StoreResult<Option<Customer>>;

    /// Deletes a customer with all of its transactions and payments, atomically.
    ///
    /// Returns `false` if the customer does not exist.
    async fn delete_customer(&self, owner: OwnerId, id: CustomerId) -> StoreResult<bool>;

    // ========== Transactions ==========

    /// Lists the owner's transactions, optionally for one customer.
    async fn list_transactions(
        &self,
        owner: OwnerId,
        customer: Option<CustomerId>,
    ) -> StoreResult<Vec<Transaction>>;

    /// Fetches one transaction.
    async fn get_transaction(
        &self,
        owner: OwnerId,
        id: TransactionId,
    ) -> StoreResult<Option<Transaction>>;

    /// Inserts a transaction.
    ///
    /// Fails with `StoreError::UnknownCustomer` if the customer does not exist.
    async fn create_transaction(
        &self,
        owner: OwnerId,
        input: NewTransaction,
    ) -> StoreResult<Transaction>;

    /// Applies a patch; `None` if the transaction does not exist.
    async fn update_transaction(
        &self,
        owner: OwnerId,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> StoreResult<Option<Transaction>>;

    /// Deletes a transaction; `false` if it does not exist.
    async fn delete_transaction(&self, owner: OwnerId, id: TransactionId) -> StoreResult<bool>;

    // ========== Payments ==========

    /// Lists the owner's payments, optionally for one customer.
    async fn list_payments(
        &self,
        owner: OwnerId,
        customer: Option<CustomerId>,
    ) -> StoreResult<Vec<Payment>>;

    /// Fetches one payment.
    async fn get_payment(&self, owner: OwnerId, id: PaymentId) -> StoreResult<Option<Payment>>;

    /// Inserts a payment.
    ///
    /// Fails with `StoreError::UnknownCustomer` if the customer does not exist.
    async fn create_payment(&self, owner: OwnerId, input: NewPayment) -> StoreResult<Payment>;

    /// Applies a patch; `None` if the payment does not exist.
    async fn update_payment(
        &self,
        owner: OwnerId,
        id: PaymentId,
        patch: PaymentPatch,
    ) -> StoreResult<Option<Payment>>;

    /// Deletes a payment; `false` if it does not exist.
    async fn delete_payment(&self, owner: OwnerId, id: PaymentId) -> StoreResult<bool>;
}

/// Access to owners and their refresh sessions.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Inserts a user; `StoreError::Conflict` if the email is taken.
    async fn create_user(&self, input: NewUser) -> StoreResult<User>;

    /// Looks a user up by (lowercased) email.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Looks a user up by ID.
    async fn find_user_by_id(&self, id: OwnerId) -> StoreResult<Option<User>>;

    /// Inserts a session.
    async fn create_session(&self, input: NewSession) -> StoreResult<Session>;

    /// Finds an unrevoked, unexpired session by refresh token hash.
    async fn find_active_session(&self, refresh_token_hash: &str) -> StoreResult<Option<Session>>;

    /// Revokes one session; `false` if it was unknown or already revoked.
    async fn revoke_session(&self, id: SessionId) -> StoreResult<bool>;

    /// Revokes every live session of a user, returning how many were revoked.
    async fn revoke_user_sessions(&self, user_id: OwnerId) -> StoreResult<u64>;
}
