//! Report types for balance views.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{
    BalanceStatus, BalanceSummary, Customer, LedgerError, Payment, Transaction, add_amounts,
};

/// A customer together with its recomputed balance.
///
/// Derived on every read, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerWithBalance {
    /// The customer.
    #[serde(flatten)]
    pub customer: Customer,
    /// Totals and net balance.
    #[serde(flatten)]
    pub summary: BalanceSummary,
    /// Sign classification of the balance.
    pub status: BalanceStatus,
}

/// System-wide totals over a set of customer rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportTotals {
    /// Number of customers in the report.
    pub customer_count: usize,
    /// Customers whose balance is strictly positive.
    pub customers_with_debt: usize,
    /// Sum of all balances, negatives included.
    pub total_outstanding: Decimal,
    /// Sum of all debits.
    pub total_debit_issued: Decimal,
    /// Sum of all credits.
    pub total_credit: Decimal,
    /// Sum of all payments.
    pub total_payments_received: Decimal,
}

impl ReportTotals {
    /// Rolls up per-customer rows.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Overflow` if a total leaves the `Decimal` range.
    pub fn from_rows(rows: &[CustomerWithBalance]) -> Result<Self, LedgerError> {
        rows.iter().try_fold(Self::default(), |totals, row| {
            let summary = &row.summary;
            Ok(Self {
                customer_count: totals.customer_count + 1,
                customers_with_debt: totals.customers_with_debt
                    + usize::from(summary.balance > Decimal::ZERO),
                total_outstanding: add_amounts(totals.total_outstanding, summary.balance)?,
                total_debit_issued: add_amounts(totals.total_debit_issued, summary.total_debit)?,
                total_credit: add_amounts(totals.total_credit, summary.total_credit)?,
                total_payments_received: add_amounts(
                    totals.total_payments_received,
                    summary.total_payments,
                )?,
            })
        })
    }
}

/// Customer balances report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerReport {
    /// One row per customer, in input order.
    pub customers: Vec<CustomerWithBalance>,
    /// Rollup over `customers`.
    pub totals: ReportTotals,
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    /// Number of customers.
    pub total_customers: usize,
    /// Number of transactions.
    pub total_transactions: usize,
    /// Number of payments.
    pub total_payments: usize,
    /// Sum of all debits.
    pub total_debit: Decimal,
    /// Sum of all credits.
    pub total_credit: Decimal,
    /// Sum of all payments.
    pub total_payments_amount: Decimal,
    /// Net balance across the whole ledger.
    pub outstanding_balance: Decimal,
    /// Sign classification of `outstanding_balance`.
    pub status: BalanceStatus,
}

/// One customer's full ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerStatement {
    /// The customer.
    pub customer: Customer,
    /// Its transactions, newest first.
    pub transactions: Vec<Transaction>,
    /// Its payments, newest first.
    pub payments: Vec<Payment>,
    /// Totals and net balance.
    pub summary: BalanceSummary,
    /// Sign classification of the balance.
    pub status: BalanceStatus,
}
