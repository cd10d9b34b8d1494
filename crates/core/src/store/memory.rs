//! In-memory store backends.
//!
//! Each store keeps all of its state behind one `RwLock`, so multi-step
//! writes such as the customer cascade happen under a single write guard.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use bahi_shared::types::{CustomerId, OwnerId, PaymentId, SessionId, TransactionId};

use super::{CustomerOrder, IdentityStore, LedgerStore, StoreError, StoreResult};
use crate::auth::{NewSession, NewUser, Session, User};
use crate::ledger::{
    Customer, CustomerPatch, NewCustomer, NewPayment, NewTransaction, Payment, PaymentPatch,
    Transaction, TransactionPatch,
};

#[derive(Default)]
struct LedgerState {
    customers: HashMap<CustomerId, Customer>,
    transactions: HashMap<TransactionId, Transaction>,
    payments: HashMap<PaymentId, Payment>,
}

impl LedgerState {
    fn has_customer(&self, owner: OwnerId, id: CustomerId) -> bool {
        self.customers.get(&id).is_some_and(|c| c.admin_id == owner)
    }

    fn ensure_customer(&self, owner: OwnerId, id: CustomerId) -> StoreResult<()> {
        if self.has_customer(owner, id) {
            Ok(())
        } else {
            Err(StoreError::UnknownCustomer(id))
        }
    }
}

/// Ledger store that keeps everything in process memory.
#[derive(Default)]
pub struct MemoryLedgerStore {
    state: RwLock<LedgerState>,
}

impl MemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_transactions(rows: &mut [Transaction]) {
    rows.sort_by(|a, b| {
        b.transaction_date
            .cmp(&a.transaction_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    });
}

fn sort_payments(rows: &mut [Payment]) {
    rows.sort_by(|a, b| {
        b.payment_date
            .cmp(&a.payment_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn list_customers(
        &self,
        owner: OwnerId,
        order: CustomerOrder,
    ) -> StoreResult<Vec<Customer>> {
        let state = self.state.read().await;
        let mut rows: Vec<Customer> = state
            .customers
            .values()
            .filter(|c| c.admin_id == owner)
            .cloned()
            .collect();

        match order {
            CustomerOrder::Newest => rows.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            }),
            CustomerOrder::Name => rows.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.id.cmp(&b.id))
            }),
        }
        Ok(rows)
    }

    async fn get_customer(&self, owner: OwnerId, id: CustomerId) -> StoreResult<Option<Customer>> {
        let state = self.state.read().await;
        Ok(state
            .customers
            .get(&id)
            .filter(|c| c.admin_id == owner)
            .cloned())
    }

    async fn create_customer(&self, owner: OwnerId, input: NewCustomer) -> StoreResult<Customer> {
        let customer = Customer::new(owner, input, Utc::now());
        self.state
            .write()
            .await
            .customers
            .insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn update_customer(
        &self,
        owner: OwnerId,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> StoreResult<Option<Customer>> {
        let mut state = self.state.write().await;
        let Some(customer) = state
            .customers
            .get_mut(&id)
            .filter(|c| c.admin_id == owner)
        else {
            return Ok(None);
        };
        customer.apply(patch, Utc::now());
        Ok(Some(customer.clone()))
    }

    async fn delete_customer(&self, owner: OwnerId, id: CustomerId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if !state.has_customer(owner, id) {
            return Ok(false);
        }

        state.transactions.retain(|_, t| t.customer_id != id);
        state.payments.retain(|_, p| p.customer_id != id);
        state.customers.remove(&id);
        Ok(true)
    }

    async fn list_transactions(
        &self,
        owner: OwnerId,
        customer: Option<CustomerId>,
    ) -> StoreResult<Vec<Transaction>> {
        let state = self.state.read().await;
        let mut rows: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|t| t.admin_id == owner)
            .filter(|t| customer.is_none_or(|c| t.customer_id == c))
            .cloned()
            .collect();
        sort_transactions(&mut rows);
        Ok(rows)
    }

    async fn get_transaction(
        &self,
        owner: OwnerId,
        id: TransactionId,
    ) -> StoreResult<Option<Transaction>> {
        let state = self.state.read().await;
        Ok(state
            .transactions
            .get(&id)
            .filter(|t| t.admin_id == owner)
            .cloned())
    }

    async fn create_transaction(
        &self,
        owner: OwnerId,
        input: NewTransaction,
    ) -> StoreResult<Transaction> {
        let mut state = self.state.write().await;
        state.ensure_customer(owner, input.customer_id)?;

        let tx = Transaction::new(owner, input, Utc::now());
        state.transactions.insert(tx.id, tx.clone());
        Ok(tx)
    }

    async fn update_transaction(
        &self,
        owner: OwnerId,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> StoreResult<Option<Transaction>> {
        let mut state = self.state.write().await;
        if let Some(customer_id) = patch.customer_id {
            state.ensure_customer(owner, customer_id)?;
        }

        let Some(tx) = state
            .transactions
            .get_mut(&id)
            .filter(|t| t.admin_id == owner)
        else {
            return Ok(None);
        };
        tx.apply(patch);
        Ok(Some(tx.clone()))
    }

    async fn delete_transaction(&self, owner: OwnerId, id: TransactionId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let owned = state
            .transactions
            .get(&id)
            .is_some_and(|t| t.admin_id == owner);
        if owned {
            state.transactions.remove(&id);
        }
        Ok(owned)
    }

    async fn list_payments(
        &self,
        owner: OwnerId,
        customer: Option<CustomerId>,
    ) -> StoreResult<Vec<Payment>> {
        let state = self.state.read().await;
        let mut rows: Vec<Payment> = state
            .payments
            .values()
            .filter(|p| p.admin_id == owner)
            .filter(|p| customer.is_none_or(|c| p.customer_id == c))
            .cloned()
            .collect();
        sort_payments(&mut rows);
        Ok(rows)
    }

    async fn get_payment(&self, owner: OwnerId, id: PaymentId) -> StoreResult<Option<Payment>> {
        let state = self.state.read().await;
        Ok(state
            .payments
            .get(&id)
            .filter(|p| p.admin_id == owner)
            .cloned())
    }

    async fn create_payment(&self, owner: OwnerId, input: NewPayment) -> StoreResult<Payment> {
        let mut state = self.state.write().await;
        state.ensure_customer(owner, input.customer_id)?;

        let payment = Payment::new(owner, input, Utc::now());
        state.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn update_payment(
        &self,
        owner: OwnerId,
        id: PaymentId,
        patch: PaymentPatch,
    ) -> StoreResult<Option<Payment>> {
        let mut state = self.state.write().await;
        if let Some(customer_id) = patch.customer_id {
            state.ensure_customer(owner, customer_id)?;
        }

        let Some(payment) = state
            .payments
            .get_mut(&id)
            .filter(|p| p.admin_id == owner)
        else {
            return Ok(None);
        };
        payment.apply(patch);
        Ok(Some(payment.clone()))
    }

    async fn delete_payment(&self, owner: OwnerId, id: PaymentId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let owned = state
            .payments
            .get(&id)
            .is_some_and(|p| p.admin_id == owner);
        if owned {
            state.payments.remove(&id);
        }
        Ok(owned)
    }
}

#[derive(Default)]
struct IdentityState {
    users: HashMap<OwnerId, User>,
    sessions: HashMap<SessionId, Session>,
}

/// Identity store that keeps users and sessions in process memory.
#[derive(Default)]
pub struct MemoryIdentityStore {
    state: RwLock<IdentityState>,
}

impl MemoryIdentityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn create_user(&self, input: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::Conflict(format!(
                "email {} already registered",
                input.email
            )));
        }

        let user = User::new(input, Utc::now());
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: OwnerId) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn create_session(&self, input: NewSession) -> StoreResult<Session> {
        let session = Session::new(input, Utc::now());
        self.state
            .write()
            .await
            .sessions
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_active_session(&self, refresh_token_hash: &str) -> StoreResult<Option<Session>> {
        let now = Utc::now();
        let state = self.state.read().await;
        Ok(state
            .sessions
            .values()
            .find(|s| s.refresh_token_hash == refresh_token_hash && s.is_active(now))
            .cloned())
    }

    async fn revoke_session(&self, id: SessionId) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.sessions.get_mut(&id) {
            Some(session) if session.revoked_at.is_none() => {
                session.revoked_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_user_sessions(&self, user_id: OwnerId) -> StoreResult<u64> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        let mut revoked = 0;
        for session in state
            .sessions
            .values_mut()
            .filter(|s| s.user_id == user_id && s.revoked_at.is_none())
        {
            session.revoked_at = Some(now);
            revoked += 1;
        }
        Ok(revoked)
    }
}
