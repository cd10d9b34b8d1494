//! PostgreSQL implementations of the core storage traits.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DatabaseConnection;

use bahi_core::auth::{NewSession, NewUser, Session, User};
use bahi_core::ledger::{
    Customer, CustomerPatch, NewCustomer, NewPayment, NewTransaction, Payment, PaymentPatch,
    Transaction, TransactionPatch,
};
use bahi_core::store::{CustomerOrder, IdentityStore, LedgerStore, StoreError, StoreResult};
use bahi_shared::types::{CustomerId, OwnerId, PaymentId, SessionId, TransactionId};

use crate::entities::{customers, payments, sessions, transactions, users};
use crate::repositories::{
    CustomerRepository, PaymentRepository, RepositoryError, SessionRepository,
    TransactionRepository, UserRepository,
};

impl From<RepositoryError> for StoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UnknownCustomer(id) => Self::UnknownCustomer(CustomerId::from_uuid(id)),
            RepositoryError::Conflict(detail) => Self::Conflict(detail),
            RepositoryError::Database(err) => Self::Backend(err.to_string()),
        }
    }
}

fn customer_from_model(m: customers::Model) -> Customer {
    Customer {
        id: CustomerId::from_uuid(m.id),
        admin_id: OwnerId::from_uuid(m.admin_id),
        name: m.name,
        phone: m.phone,
        address: m.address,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

fn transaction_from_model(m: transactions::Model) -> Transaction {
    Transaction {
        id: TransactionId::from_uuid(m.id),
        admin_id: OwnerId::from_uuid(m.admin_id),
        customer_id: CustomerId::from_uuid(m.customer_id),
        transaction_type: m.transaction_type.into(),
        amount: m.amount,
        description: m.description,
        transaction_date: m.transaction_date,
        created_at: m.created_at.with_timezone(&Utc),
    }
}

fn payment_from_model(m: payments::Model) -> Payment {
    Payment {
        id: PaymentId::from_uuid(m.id),
        admin_id: OwnerId::from_uuid(m.admin_id),
        customer_id: CustomerId::from_uuid(m.customer_id),
        amount: m.amount,
        payment_method: m.payment_method.into(),
        notes: m.notes,
        payment_date: m.payment_date,
        created_at: m.created_at.with_timezone(&Utc),
    }
}

fn user_from_model(m: users::Model) -> User {
    User {
        id: OwnerId::from_uuid(m.id),
        email: m.email,
        username: m.username,
        password_hash: m.password_hash,
        is_active: m.is_active,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

fn session_from_model(m: sessions::Model) -> Session {
    Session {
        id: SessionId::from_uuid(m.id),
        user_id: OwnerId::from_uuid(m.user_id),
        refresh_token_hash: m.refresh_token_hash,
        expires_at: m.expires_at.with_timezone(&Utc),
        revoked_at: m.revoked_at.map(|at| at.with_timezone(&Utc)),
        created_at: m.created_at.with_timezone(&Utc),
    }
}

/// Ledger store backed by PostgreSQL with owner row-level security.
#[derive(Debug, Clone)]
pub struct SeaOrmLedgerStore {
    customers: CustomerRepository,
    transactions: TransactionRepository,
    payments: PaymentRepository,
}

impl SeaOrmLedgerStore {
    /// Creates a store over a connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            customers: CustomerRepository::new(db.clone()),
            transactions: TransactionRepository::new(db.clone()),
            payments: PaymentRepository::new(db),
        }
    }
}

#[async_trait]
impl LedgerStore for SeaOrmLedgerStore {
    async fn list_customers(
        &self,
        owner: OwnerId,
        order: CustomerOrder,
    ) -> StoreResult<Vec<Customer>> {
        let rows = self.customers.list(owner, order).await?;
        Ok(rows.into_iter().map(customer_from_model).collect())
    }

    async fn get_customer(&self, owner: OwnerId, id: CustomerId) -> StoreResult<Option<Customer>> {
        Ok(self.customers.find_by_id(owner, id).await?.map(customer_from_model))
    }

    async fn create_customer(&self, owner: OwnerId, input: NewCustomer) -> StoreResult<Customer> {
        Ok(customer_from_model(self.customers.create(owner, input).await?))
    }

    async fn update_customer(
        &self,
        owner: OwnerId,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> StoreResult<Option<Customer>> {
        Ok(self
            .customers
            .update(owner, id, patch)
            .await?
            .map(customer_from_model))
    }

    async fn delete_customer(&self, owner: OwnerId, id: CustomerId) -> StoreResult<bool> {
        Ok(self.customers.delete_cascade(owner, id).await?)
    }

    async fn list_transactions(
        &self,
        owner: OwnerId,
        customer: Option<CustomerId>,
    ) -> StoreResult<Vec<Transaction>> {
        let rows = self.transactions.list(owner, customer).await?;
        Ok(rows.into_iter().map(transaction_from_model).collect())
    }

    async fn get_transaction(
        &self,
        owner: OwnerId,
        id: TransactionId,
    ) -> StoreResult<Option<Transaction>> {
        Ok(self
            .transactions
            .find_by_id(owner, id)
            .await?
            .map(transaction_from_model))
    }

    async fn create_transaction(
        &self,
        owner: OwnerId,
        input: NewTransaction,
    ) -> StoreResult<Transaction> {
        Ok(transaction_from_model(self.transactions.create(owner, input).await?))
    }

    async fn update_transaction(
        &self,
        owner: OwnerId,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> StoreResult<Option<Transaction>> {
        Ok(self
            .transactions
            .update(owner, id, patch)
            .await?
            .map(transaction_from_model))
    }

    async fn delete_transaction(&self, owner: OwnerId, id: TransactionId) -> StoreResult<bool> {
        Ok(self.transactions.delete(owner, id).await?)
    }

    async fn list_payments(
        &self,
        owner: OwnerId,
        customer: Option<CustomerId>,
    ) -> StoreResult<Vec<Payment>> {
        let rows = self.payments.list(owner, customer).await?;
        Ok(rows.into_iter().map(payment_from_model).collect())
    }

    async fn get_payment(&self, owner: OwnerId, id: PaymentId) -> StoreResult<Option<Payment>> {
        Ok(self.payments.find_by_id(owner, id).await?.map(payment_from_model))
    }

    async fn create_payment(&self, owner: OwnerId, input: NewPayment) -> StoreResult<Payment> {
        Ok(payment_from_model(self.payments.create(owner, input).await?))
    }

    async fn update_payment(
        &self,
        owner: OwnerId,
        id: PaymentId,
        patch: PaymentPatch,
    ) -> StoreResult<Option<Payment>> {
        Ok(self
            .payments
            .update(owner, id, patch)
            .await?
            .map(payment_from_model))
    }

    async fn delete_payment(&self, owner: OwnerId, id: PaymentId) -> StoreResult<bool> {
        Ok(self.payments.delete(owner, id).await?)
    }
}

/// Identity store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct SeaOrmIdentityStore {
    users: UserRepository,
    sessions: SessionRepository,
}

impl SeaOrmIdentityStore {
    /// Creates a store over a connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            sessions: SessionRepository::new(db),
        }
    }
}

#[async_trait]
impl IdentityStore for SeaOrmIdentityStore {
    async fn create_user(&self, input: NewUser) -> StoreResult<User> {
        Ok(user_from_model(self.users.create(input).await?))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.find_by_email(email).await?.map(user_from_model))
    }

    async fn find_user_by_id(&self, id: OwnerId) -> StoreResult<Option<User>> {
        Ok(self.users.find_by_id(id).await?.map(user_from_model))
    }

    async fn create_session(&self, input: NewSession) -> StoreResult<Session> {
        Ok(session_from_model(self.sessions.create(input).await?))
    }

    async fn find_active_session(&self, refresh_token_hash: &str) -> StoreResult<Option<Session>> {
        Ok(self
            .sessions
            .find_active_by_hash(refresh_token_hash)
            .await?
            .map(session_from_model))
    }

    async fn revoke_session(&self, id: SessionId) -> StoreResult<bool> {
        Ok(self.sessions.revoke(id).await?)
    }

    async fn revoke_user_sessions(&self, user_id: OwnerId) -> StoreResult<u64> {
        Ok(self.sessions.revoke_all_user_sessions(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::entities::sea_orm_active_enums::{PaymentMethod, TransactionType};
    use bahi_core::ledger;

    #[test]
    fn test_unknown_customer_maps_through() {
        let id = Uuid::now_v7();
        let err: StoreError = RepositoryError::UnknownCustomer(id).into();
        assert!(matches!(err, StoreError::UnknownCustomer(c) if c.into_inner() == id));

        let err: StoreError = RepositoryError::Conflict("users_email_key".into()).into();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn test_payment_model_conversion() {
        let now = Utc::now();
        let model = payments::Model {
            id: Uuid::now_v7(),
            admin_id: Uuid::now_v7(),
            customer_id: Uuid::now_v7(),
            amount: dec!(250.50),
            payment_method: PaymentMethod::BankTransfer,
            notes: None,
            payment_date: now.date_naive(),
            created_at: now.into(),
        };

        let payment = payment_from_model(model.clone());
        assert_eq!(payment.id.into_inner(), model.id);
        assert_eq!(payment.amount, dec!(250.50));
        assert_eq!(payment.payment_method, ledger::PaymentMethod::BankTransfer);
        assert_eq!(payment.created_at, now);
    }

    #[test]
    fn test_transaction_model_conversion() {
        let now = Utc::now();
        let model = transactions::Model {
            id: Uuid::now_v7(),
            admin_id: Uuid::now_v7(),
            customer_id: Uuid::now_v7(),
            transaction_type: TransactionType::Credit,
            amount: dec!(100),
            description: Some("returned goods".into()),
            transaction_date: now.date_naive(),
            created_at: now.into(),
        };

        let tx = transaction_from_model(model);
        assert_eq!(tx.transaction_type, ledger::TransactionType::Credit);
        assert_eq!(tx.description.as_deref(), Some("returned goods"));
    }
}
