//! Ledger service: validation in front of the store, plus the aggregate views.
//!
//! Handlers talk to this service only. Inputs are validated before any store
//! call, and the report views fetch their three row sets concurrently.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use bahi_shared::types::{CustomerId, OwnerId, PaymentId, TransactionId};

use super::error::LedgerError;
use super::types::{
    CreateCustomerInput, CreatePaymentInput, CreateTransactionInput, Customer, Payment,
    Transaction, UpdateCustomerInput, UpdatePaymentInput, UpdateTransactionInput,
};
use super::validation;
use crate::reports::{CustomerReport, CustomerStatement, DashboardMetrics, ReportService};
use crate::store::{CustomerOrder, LedgerStore};

/// Owner-scoped ledger operations.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
}

impl std::fmt::Debug for LedgerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerService").finish_non_exhaustive()
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl LedgerService {
    /// Creates a service over a store backend.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    // ========== Customers ==========

    /// Lists the owner's customers.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the backend fails.
    pub async fn list_customers(
        &self,
        owner: OwnerId,
        order: CustomerOrder,
    ) -> Result<Vec<Customer>, LedgerError> {
        Ok(self.store.list_customers(owner, order).await?)
    }

    /// Fetches one customer.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the customer does not exist.
    pub async fn get_customer(&self, owner: OwnerId, id: CustomerId) -> Result<Customer, LedgerError> {
        self.store
            .get_customer(owner, id)
            .await?
            .ok_or_else(|| LedgerError::customer_not_found(id.into_inner()))
    }

    /// Fetches a customer with its full ledger and balance.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the customer does not exist.
    pub async fn customer_statement(
        &self,
        owner: OwnerId,
        id: CustomerId,
    ) -> Result<CustomerStatement, LedgerError> {
        let (customer, transactions, payments) = tokio::try_join!(
            self.store.get_customer(owner, id),
            self.store.list_transactions(owner, Some(id)),
            self.store.list_payments(owner, Some(id)),
        )?;
        let customer = customer.ok_or_else(|| LedgerError::customer_not_found(id.into_inner()))?;

        ReportService::statement(customer, transactions, payments)
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` if the name is blank.
    pub async fn create_customer(
        &self,
        owner: OwnerId,
        input: CreateCustomerInput,
    ) -> Result<Customer, LedgerError> {
        let input = validation::validate_new_customer(input)?;
        let customer = self.store.create_customer(owner, input).await?;

        info!(owner_id = %owner, customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// Updates a customer.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` for a blank name and
    /// `LedgerError::NotFound` if the customer does not exist.
    pub async fn update_customer(
        &self,
        owner: OwnerId,
        id: CustomerId,
        input: UpdateCustomerInput,
    ) -> Result<Customer, LedgerError> {
        let patch = validation::validate_customer_patch(input)?;
        self.store
            .update_customer(owner, id, patch)
            .await?
            .ok_or_else(|| LedgerError::customer_not_found(id.into_inner()))
    }

    /// Deletes a customer with all of its transactions and payments.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the customer does not exist.
    pub async fn delete_customer(&self, owner: OwnerId, id: CustomerId) -> Result<(), LedgerError> {
        if !self.store.delete_customer(owner, id).await? {
            return Err(LedgerError::customer_not_found(id.into_inner()));
        }

        info!(owner_id = %owner, customer_id = %id, "Customer deleted with its ledger");
        Ok(())
    }

    // ========== Transactions ==========

    /// Lists the owner's transactions, optionally for one customer.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the backend fails.
    pub async fn list_transactions(
        &self,
        owner: OwnerId,
        customer: Option<CustomerId>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.store.list_transactions(owner, customer).await?)
    }

    /// Fetches one transaction.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the transaction does not exist.
    pub async fn get_transaction(
        &self,
        owner: OwnerId,
        id: TransactionId,
    ) -> Result<Transaction, LedgerError> {
        self.store
            .get_transaction(owner, id)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "Transaction",
                id: id.into_inner(),
            })
    }

    /// Records a transaction.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` for a missing customer or a
    /// non-positive amount, and `LedgerError::NotFound` for an unknown customer.
    pub async fn create_transaction(
        &self,
        owner: OwnerId,
        input: CreateTransactionInput,
    ) -> Result<Transaction, LedgerError> {
        let input = validation::validate_new_transaction(input, today())?;
        let tx = self.store.create_transaction(owner, input).await?;

        debug!(
            owner_id = %owner,
            customer_id = %tx.customer_id,
            transaction_id = %tx.id,
            transaction_type = %tx.transaction_type,
            "Transaction recorded"
        );
        Ok(tx)
    }

    /// Edits a transaction in place.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` for a non-positive amount and
    /// `LedgerError::NotFound` if the transaction or new customer does not exist.
    pub async fn update_transaction(
        &self,
        owner: OwnerId,
        id: TransactionId,
        input: UpdateTransactionInput,
    ) -> Result<Transaction, LedgerError> {
        let patch = validation::validate_transaction_patch(input)?;
        self.store
            .update_transaction(owner, id, patch)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "Transaction",
                id: id.into_inner(),
            })
    }

    /// Deletes a transaction.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the transaction does not exist.
    pub async fn delete_transaction(
        &self,
        owner: OwnerId,
        id: TransactionId,
    ) -> Result<(), LedgerError> {
        if self.store.delete_transaction(owner, id).await? {
            Ok(())
        } else {
            Err(LedgerError::NotFound {
                entity: "Transaction",
                id: id.into_inner(),
            })
        }
    }

    // ========== Payments ==========

    /// Lists the owner's payments, optionally for one customer.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the backend fails.
    pub async fn list_payments(
        &self,
        owner: OwnerId,
        customer: Option<CustomerId>,
    ) -> Result<Vec<Payment>, LedgerError> {
        Ok(self.store.list_payments(owner, customer).await?)
    }

    /// Fetches one payment.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the payment does not exist.
    pub async fn get_payment(&self, owner: OwnerId, id: PaymentId) -> Result<Payment, LedgerError> {
        self.store
            .get_payment(owner, id)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "Payment",
                id: id.into_inner(),
            })
    }

    /// Records a payment.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` for a missing customer or a
    /// non-positive amount, and `LedgerError::NotFound` for an unknown customer.
    pub async fn create_payment(
        &self,
        owner: OwnerId,
        input: CreatePaymentInput,
    ) -> Result<Payment, LedgerError> {
        let input = validation::validate_new_payment(input, today())?;
        let payment = self.store.create_payment(owner, input).await?;

        debug!(
            owner_id = %owner,
            customer_id = %payment.customer_id,
            payment_id = %payment.id,
            payment_method = %payment.payment_method,
            "Payment recorded"
        );
        Ok(payment)
    }

    /// Edits a payment in place.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` for a non-positive amount and
    /// `LedgerError::NotFound` if the payment or new customer does not exist.
    pub async fn update_payment(
        &self,
        owner: OwnerId,
        id: PaymentId,
        input: UpdatePaymentInput,
    ) -> Result<Payment, LedgerError> {
        let patch = validation::validate_payment_patch(input)?;
        self.store
            .update_payment(owner, id, patch)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "Payment",
                id: id.into_inner(),
            })
    }

    /// Deletes a payment.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the payment does not exist.
    pub async fn delete_payment(&self, owner: OwnerId, id: PaymentId) -> Result<(), LedgerError> {
        if self.store.delete_payment(owner, id).await? {
            Ok(())
        } else {
            Err(LedgerError::NotFound {
                entity: "Payment",
                id: id.into_inner(),
            })
        }
    }

    // ========== Aggregate views ==========

    /// Per-customer balances ordered by name, with totals.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if any of the three fetches fails and
    /// `LedgerError::Overflow` if a total leaves the `Decimal` range.
    pub async fn customer_report(&self, owner: OwnerId) -> Result<CustomerReport, LedgerError> {
        let (customers, transactions, payments) = tokio::try_join!(
            self.store.list_customers(owner, CustomerOrder::Name),
            self.store.list_transactions(owner, None),
            self.store.list_payments(owner, None),
        )?;

        ReportService::customer_report(customers, &transactions, &payments)
    }

    /// Headline figures over the owner's whole ledger.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if any of the three fetches fails and
    /// `LedgerError::Overflow` if a total leaves the `Decimal` range.
    pub async fn dashboard_metrics(&self, owner: OwnerId) -> Result<DashboardMetrics, LedgerError> {
        let (customers, transactions, payments) = tokio::try_join!(
            self.store.list_customers(owner, CustomerOrder::Newest),
            self.store.list_transactions(owner, None),
            self.store.list_payments(owner, None),
        )?;

        ReportService::dashboard_metrics(&customers, &transactions, &payments)
    }
}
