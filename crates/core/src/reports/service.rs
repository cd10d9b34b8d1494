//! Report aggregation over raw ledger rows.

use std::collections::HashMap;

use bahi_shared::types::CustomerId;

use super::types::{
    CustomerReport, CustomerStatement, CustomerWithBalance, DashboardMetrics, ReportTotals,
};
use crate::ledger::{BalanceSummary, Customer, LedgerError, Payment, Transaction, compute_balance};

/// Service for aggregating balances into report views.
pub struct ReportService;

impl ReportService {
    /// Computes one row per customer, preserving the input customer order.
    ///
    /// Transactions and payments are grouped by `customer_id`; rows that
    /// match no customer in `customers` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Overflow` if a customer's totals leave the
    /// `Decimal` range.
    pub fn compute_report(
        customers: Vec<Customer>,
        transactions: &[Transaction],
        payments: &[Payment],
    ) -> Result<Vec<CustomerWithBalance>, LedgerError> {
        let mut summaries: HashMap<CustomerId, BalanceSummary> = customers
            .iter()
            .map(|c| (c.id, BalanceSummary::zero()))
            .collect();

        for tx in transactions {
            if let Some(summary) = summaries.get_mut(&tx.customer_id) {
                summary.add_transaction(tx.transaction_type, tx.amount)?;
            }
        }
        for payment in payments {
            if let Some(summary) = summaries.get_mut(&payment.customer_id) {
                summary.add_payment(payment.amount)?;
            }
        }

        Ok(customers
            .into_iter()
            .map(|customer| {
                let summary = summaries.get(&customer.id).copied().unwrap_or_default();
                CustomerWithBalance {
                    customer,
                    status: summary.status(),
                    summary,
                }
            })
            .collect())
    }

    /// Builds the customer balances report with its totals.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Overflow` if any total leaves the `Decimal` range.
    pub fn customer_report(
        customers: Vec<Customer>,
        transactions: &[Transaction],
        payments: &[Payment],
    ) -> Result<CustomerReport, LedgerError> {
        let rows = Self::compute_report(customers, transactions, payments)?;
        Ok(CustomerReport {
            totals: ReportTotals::from_rows(&rows)?,
            customers: rows,
        })
    }

    /// Computes dashboard figures over the whole ledger.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Overflow` if any total leaves the `Decimal` range.
    pub fn dashboard_metrics(
        customers: &[Customer],
        transactions: &[Transaction],
        payments: &[Payment],
    ) -> Result<DashboardMetrics, LedgerError> {
        let summary = compute_balance(transactions, payments)?;
        Ok(DashboardMetrics {
            total_customers: customers.len(),
            total_transactions: transactions.len(),
            total_payments: payments.len(),
            total_debit: summary.total_debit,
            total_credit: summary.total_credit,
            total_payments_amount: summary.total_payments,
            outstanding_balance: summary.balance,
            status: summary.status(),
        })
    }

    /// Builds a statement from one customer's rows.
    ///
    /// Callers pass rows already filtered to `customer`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Overflow` if a total leaves the `Decimal` range.
    pub fn statement(
        customer: Customer,
        transactions: Vec<Transaction>,
        payments: Vec<Payment>,
    ) -> Result<CustomerStatement, LedgerError> {
        let summary = compute_balance(&transactions, &payments)?;
        Ok(CustomerStatement {
            customer,
            transactions,
            payments,
            status: summary.status(),
            summary,
        })
    }
}
