//! Customer ledgers.
//!
//! This module implements the bookkeeping core:
//! - Customers, transactions and payments
//! - Input validation
//! - Balance calculation
//! - The owner-scoped ledger service

pub mod balance;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_tests;

pub use balance::{BalanceStatus, BalanceSummary, add_amounts, compute_balance};
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{
    CreateCustomerInput, CreatePaymentInput, CreateTransactionInput, Customer, CustomerPatch,
    NewCustomer, NewPayment, NewTransaction, Payment, PaymentMethod, PaymentPatch, Transaction,
    TransactionPatch, TransactionType, UpdateCustomerInput, UpdatePaymentInput,
    UpdateTransactionInput,
};
pub use validation::ValidationError;
