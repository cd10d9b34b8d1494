//! Scenario and property tests for report aggregation.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use bahi_shared::types::{CustomerId, OwnerId};

use super::service::ReportService;
use super::types::ReportTotals;
use crate::ledger::{
    BalanceStatus, Customer, LedgerError, NewCustomer, NewPayment, NewTransaction, Payment,
    PaymentMethod, Transaction, TransactionType,
};

fn customer(owner: OwnerId, name: &str) -> Customer {
    Customer::new(
        owner,
        NewCustomer {
            name: name.to_string(),
            phone: None,
            address: None,
        },
        Utc::now(),
    )
}

fn tx(c: &Customer, transaction_type: TransactionType, amount: Decimal) -> Transaction {
    Transaction::new(
        c.admin_id,
        NewTransaction {
            customer_id: c.id,
            transaction_type,
            amount,
            description: None,
            transaction_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        },
        Utc::now(),
    )
}

fn pay(c: &Customer, amount: Decimal) -> Payment {
    Payment::new(
        c.admin_id,
        NewPayment {
            customer_id: c.id,
            amount,
            payment_method: PaymentMethod::Cash,
            notes: None,
            payment_date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
        },
        Utc::now(),
    )
}

/// Asha owes 200, Ravi overpaid by 50.
fn asha_and_ravi() -> (Vec<Customer>, Vec<Transaction>, Vec<Payment>) {
    let owner = OwnerId::new();
    let asha = customer(owner, "Asha");
    let ravi = customer(owner, "Ravi");

    let transactions = vec![
        tx(&asha, TransactionType::Debit, dec!(500)),
        tx(&asha, TransactionType::Credit, dec!(100)),
        tx(&ravi, TransactionType::Debit, dec!(300)),
    ];
    let payments = vec![pay(&asha, dec!(200)), pay(&ravi, dec!(300)), pay(&ravi, dec!(50))];

    (vec![asha, ravi], transactions, payments)
}

#[test]
fn test_asha_and_ravi_report() {
    let (customers, transactions, payments) = asha_and_ravi();
    let report = ReportService::customer_report(customers, &transactions, &payments).unwrap();

    let asha = &report.customers[0];
    assert_eq!(asha.customer.name, "Asha");
    assert_eq!(asha.summary.balance, dec!(200));
    assert_eq!(asha.status, BalanceStatus::Receivable);

    let ravi = &report.customers[1];
    assert_eq!(ravi.summary.total_payments, dec!(350));
    assert_eq!(ravi.summary.balance, dec!(-50));
    assert_eq!(ravi.status, BalanceStatus::Payable);

    assert_eq!(report.totals.customer_count, 2);
    assert_eq!(report.totals.customers_with_debt, 1);
    assert_eq!(report.totals.total_outstanding, dec!(150));
    assert_eq!(report.totals.total_debit_issued, dec!(800));
    assert_eq!(report.totals.total_credit, dec!(100));
    assert_eq!(report.totals.total_payments_received, dec!(550));
}

#[test]
fn test_report_without_asha() {
    let (customers, transactions, payments) = asha_and_ravi();
    let asha_id = customers[0].id;
    let remaining: Vec<Customer> = customers.into_iter().filter(|c| c.id != asha_id).collect();
    let transactions: Vec<Transaction> = transactions
        .into_iter()
        .filter(|t| t.customer_id != asha_id)
        .collect();
    let payments: Vec<Payment> = payments
        .into_iter()
        .filter(|p| p.customer_id != asha_id)
        .collect();

    let report = ReportService::customer_report(remaining, &transactions, &payments).unwrap();
    assert_eq!(report.totals.customers_with_debt, 0);
    assert_eq!(report.totals.total_outstanding, dec!(-50));
}

#[test]
fn test_orphan_rows_ignored() {
    let (customers, mut transactions, payments) = asha_and_ravi();
    let stranger = customer(OwnerId::new(), "Stranger");
    transactions.push(tx(&stranger, TransactionType::Debit, dec!(9999)));

    let report = ReportService::customer_report(customers, &transactions, &payments).unwrap();
    assert_eq!(report.customers.len(), 2);
    assert_eq!(report.totals.total_debit_issued, dec!(800));
}

#[test]
fn test_dashboard_metrics() {
    let (customers, transactions, payments) = asha_and_ravi();
    let metrics = ReportService::dashboard_metrics(&customers, &transactions, &payments).unwrap();

    assert_eq!(metrics.total_customers, 2);
    assert_eq!(metrics.total_transactions, 3);
    assert_eq!(metrics.total_payments, 3);
    assert_eq!(metrics.total_debit, dec!(800));
    assert_eq!(metrics.total_payments_amount, dec!(550));
    assert_eq!(metrics.outstanding_balance, dec!(150));
    assert_eq!(metrics.status, BalanceStatus::Receivable);
}

#[test]
fn test_statement() {
    let (customers, transactions, payments) = asha_and_ravi();
    let asha = customers[0].clone();
    let own_tx: Vec<Transaction> = transactions
        .into_iter()
        .filter(|t| t.customer_id == asha.id)
        .collect();
    let own_pay: Vec<Payment> = payments
        .into_iter()
        .filter(|p| p.customer_id == asha.id)
        .collect();

    let statement = ReportService::statement(asha, own_tx, own_pay).unwrap();
    assert_eq!(statement.transactions.len(), 2);
    assert_eq!(statement.payments.len(), 1);
    assert_eq!(statement.summary.balance, dec!(200));
    assert_eq!(statement.status, BalanceStatus::Receivable);
}

#[test]
fn test_empty_report() {
    let report = ReportService::customer_report(Vec::new(), &[], &[]).unwrap();
    assert!(report.customers.is_empty());
    assert_eq!(report.totals, ReportTotals::default());
}

#[test]
fn test_report_row_serializes_flat() {
    let (customers, transactions, payments) = asha_and_ravi();
    let rows = ReportService::compute_report(customers, &transactions, &payments).unwrap();
    let json = serde_json::to_value(&rows[0]).unwrap();

    assert_eq!(json["name"], "Asha");
    assert_eq!(json["balance"], "200");
    assert_eq!(json["status"], "receivable");
}

#[test]
fn test_overflowing_totals_are_an_error() {
    let owner = OwnerId::new();
    let asha = customer(owner, "Asha");
    let ravi = customer(owner, "Ravi");
    let transactions = vec![
        tx(&asha, TransactionType::Debit, Decimal::MAX),
        tx(&ravi, TransactionType::Debit, Decimal::MAX),
    ];

    // Each row fits on its own; only the rollup overflows.
    let rows = ReportService::compute_report(vec![asha.clone(), ravi.clone()], &transactions, &[]);
    assert_eq!(rows.unwrap().len(), 2);

    let customers = vec![asha, ravi];
    assert!(matches!(
        ReportService::customer_report(customers.clone(), &transactions, &[]),
        Err(LedgerError::Overflow)
    ));
    assert!(matches!(
        ReportService::dashboard_metrics(&customers, &transactions, &[]),
        Err(LedgerError::Overflow)
    ));
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    /// Customers with no activity all come out settled at zero.
    #[test]
    fn prop_inactive_customers_are_zero(count in 0usize..30) {
        let owner = OwnerId::new();
        let customers: Vec<Customer> = (0..count).map(|i| customer(owner, &format!("C{i}"))).collect();
        let ids: Vec<CustomerId> = customers.iter().map(|c| c.id).collect();

        let report = ReportService::customer_report(customers, &[], &[]).unwrap();

        prop_assert_eq!(report.customers.len(), count);
        prop_assert_eq!(report.totals.total_outstanding, Decimal::ZERO);
        prop_assert_eq!(report.totals.customers_with_debt, 0);
        for (row, id) in report.customers.iter().zip(ids) {
            prop_assert_eq!(row.customer.id, id);
            prop_assert_eq!(row.status, BalanceStatus::Settled);
        }
    }

    /// Total outstanding equals the ledger-wide balance when every row has a customer.
    #[test]
    fn prop_totals_match_ledger_balance(
        entries in prop::collection::vec((0usize..5, any::<bool>(), amount_strategy()), 0..40),
        paid in prop::collection::vec((0usize..5, amount_strategy()), 0..20),
    ) {
        let owner = OwnerId::new();
        let customers: Vec<Customer> = (0..5).map(|i| customer(owner, &format!("C{i}"))).collect();
        let transactions: Vec<Transaction> = entries
            .iter()
            .map(|(i, is_debit, amount)| {
                let kind = if *is_debit { TransactionType::Debit } else { TransactionType::Credit };
                tx(&customers[*i], kind, *amount)
            })
            .collect();
        let payments: Vec<Payment> = paid.iter().map(|(i, amount)| pay(&customers[*i], *amount)).collect();

        let metrics = ReportService::dashboard_metrics(&customers, &transactions, &payments).unwrap();
        let report = ReportService::customer_report(customers, &transactions, &payments).unwrap();

        prop_assert_eq!(report.totals.total_outstanding, metrics.outstanding_balance);
        prop_assert_eq!(report.totals.total_debit_issued, metrics.total_debit);
        prop_assert_eq!(
            report.totals.customers_with_debt,
            report.customers.iter().filter(|r| r.summary.balance > Decimal::ZERO).count()
        );
    }
}
