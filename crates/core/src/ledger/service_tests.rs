//! Ledger service tests against the in-memory store.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use bahi_shared::types::{CustomerId, OwnerId, PaymentId, TransactionId};

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{
    CreateCustomerInput, CreatePaymentInput, CreateTransactionInput, Customer, PaymentMethod,
    TransactionType, UpdateCustomerInput, UpdateTransactionInput,
};
use super::validation::{MAX_AMOUNT, ValidationError};
use crate::ledger::BalanceStatus;
use crate::store::{CustomerOrder, MemoryLedgerStore};

fn service() -> LedgerService {
    LedgerService::new(Arc::new(MemoryLedgerStore::new()))
}

async fn add_customer(service: &LedgerService, owner: OwnerId, name: &str) -> Customer {
    service
        .create_customer(
            owner,
            CreateCustomerInput {
                name: name.into(),
                ..CreateCustomerInput::default()
            },
        )
        .await
        .unwrap()
}

async fn add_tx(
    service: &LedgerService,
    owner: OwnerId,
    customer: CustomerId,
    transaction_type: TransactionType,
    amount: Decimal,
) -> TransactionId {
    service
        .create_transaction(
            owner,
            CreateTransactionInput {
                customer_id: Some(customer),
                transaction_type,
                amount: Some(amount),
                description: None,
                transaction_date: None,
            },
        )
        .await
        .unwrap()
        .id
}

async fn add_payment(
    service: &LedgerService,
    owner: OwnerId,
    customer: CustomerId,
    amount: Decimal,
) -> PaymentId {
    service
        .create_payment(
            owner,
            CreatePaymentInput {
                customer_id: Some(customer),
                amount: Some(amount),
                payment_method: PaymentMethod::Cash,
                notes: None,
                payment_date: None,
            },
        )
        .await
        .unwrap()
        .id
}

/// Asha: debit 500, credit 100, payment 200. Ravi: debit 300, payments 300 + 50.
async fn seed(service: &LedgerService, owner: OwnerId) -> (Customer, Customer) {
    let asha = add_customer(service, owner, "Asha").await;
    let ravi = add_customer(service, owner, "Ravi").await;

    add_tx(service, owner, asha.id, TransactionType::Debit, dec!(500)).await;
    add_tx(service, owner, asha.id, TransactionType::Credit, dec!(100)).await;
    add_payment(service, owner, asha.id, dec!(200)).await;

    add_tx(service, owner, ravi.id, TransactionType::Debit, dec!(300)).await;
    add_payment(service, owner, ravi.id, dec!(300)).await;
    add_payment(service, owner, ravi.id, dec!(50)).await;

    (asha, ravi)
}

#[tokio::test]
async fn test_report_over_seeded_ledger() {
    let service = service();
    let owner = OwnerId::new();
    seed(&service, owner).await;

    let report = service.customer_report(owner).await.unwrap();
    let names: Vec<&str> = report.customers.iter().map(|r| r.customer.name.as_str()).collect();
    assert_eq!(names, vec!["Asha", "Ravi"]);

    assert_eq!(report.customers[0].summary.balance, dec!(200));
    assert_eq!(report.customers[0].status, BalanceStatus::Receivable);
    assert_eq!(report.customers[1].summary.balance, dec!(-50));
    assert_eq!(report.customers[1].status, BalanceStatus::Payable);
    assert_eq!(report.totals.customers_with_debt, 1);
    assert_eq!(report.totals.total_outstanding, dec!(150));
}

#[tokio::test]
async fn test_deleting_customer_recomputes_totals() {
    let service = service();
    let owner = OwnerId::new();
    let (asha, _) = seed(&service, owner).await;

    service.delete_customer(owner, asha.id).await.unwrap();

    let report = service.customer_report(owner).await.unwrap();
    assert_eq!(report.customers.len(), 1);
    assert_eq!(report.totals.customers_with_debt, 0);
    assert_eq!(report.totals.total_outstanding, dec!(-50));

    let metrics = service.dashboard_metrics(owner).await.unwrap();
    assert_eq!(metrics.total_transactions, 1);
    assert_eq!(metrics.total_payments, 2);
}

#[tokio::test]
async fn test_statement() {
    let service = service();
    let owner = OwnerId::new();
    let (asha, _) = seed(&service, owner).await;

    let statement = service.customer_statement(owner, asha.id).await.unwrap();
    assert_eq!(statement.customer.id, asha.id);
    assert_eq!(statement.transactions.len(), 2);
    assert_eq!(statement.payments.len(), 1);
    assert_eq!(statement.summary.balance, dec!(200));
}

#[tokio::test]
async fn test_statement_for_missing_customer() {
    let service = service();
    let result = service
        .customer_statement(OwnerId::new(), CustomerId::new())
        .await;
    assert!(matches!(result, Err(LedgerError::NotFound { entity: "Customer", .. })));
}

#[tokio::test]
async fn test_dashboard_on_empty_ledger() {
    let metrics = service().dashboard_metrics(OwnerId::new()).await.unwrap();
    assert_eq!(metrics.total_customers, 0);
    assert_eq!(metrics.outstanding_balance, Decimal::ZERO);
    assert_eq!(metrics.status, BalanceStatus::Settled);
}

#[tokio::test]
async fn test_validation_blocks_write() {
    let service = service();
    let owner = OwnerId::new();
    let asha = add_customer(&service, owner, "Asha").await;

    let result = service
        .create_transaction(
            owner,
            CreateTransactionInput {
                customer_id: Some(asha.id),
                transaction_type: TransactionType::Debit,
                amount: Some(dec!(-5)),
                description: None,
                transaction_date: None,
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(LedgerError::Validation(ValidationError::NonPositiveAmount(_)))
    ));
    assert!(service.list_transactions(owner, None).await.unwrap().is_empty());

    let result = service
        .create_customer(owner, CreateCustomerInput::default())
        .await;
    assert!(matches!(result, Err(LedgerError::Validation(ValidationError::EmptyName))));
    assert_eq!(
        service
            .list_customers(owner, CustomerOrder::Newest)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_unknown_customer_is_not_found() {
    let service = service();
    let result = service
        .create_payment(
            OwnerId::new(),
            CreatePaymentInput {
                customer_id: Some(CustomerId::new()),
                amount: Some(dec!(10)),
                payment_method: PaymentMethod::Upi,
                notes: None,
                payment_date: None,
            },
        )
        .await;
    assert!(matches!(result, Err(LedgerError::NotFound { entity: "Customer", .. })));
}

#[tokio::test]
async fn test_update_is_idempotent_apart_from_timestamp() {
    let service = service();
    let owner = OwnerId::new();
    let asha = add_customer(&service, owner, "Asha").await;

    let input = UpdateCustomerInput {
        name: Some("Asha Devi".into()),
        phone: Some(Some("98450 22222".into())),
        address: None,
    };
    let first = service.update_customer(owner, asha.id, input.clone()).await.unwrap();
    let second = service.update_customer(owner, asha.id, input).await.unwrap();

    assert_eq!(
        Customer {
            updated_at: first.updated_at,
            ..second
        },
        first
    );
    assert_eq!(first.name, "Asha Devi");
    assert_eq!(first.created_at, asha.created_at);
}

#[tokio::test]
async fn test_update_and_delete_missing_records() {
    let service = service();
    let owner = OwnerId::new();

    assert!(matches!(
        service
            .update_transaction(owner, TransactionId::new(), UpdateTransactionInput::default())
            .await,
        Err(LedgerError::NotFound { entity: "Transaction", .. })
    ));
    assert!(matches!(
        service.delete_payment(owner, PaymentId::new()).await,
        Err(LedgerError::NotFound { entity: "Payment", .. })
    ));
    assert!(matches!(
        service.delete_customer(owner, CustomerId::new()).await,
        Err(LedgerError::NotFound { entity: "Customer", .. })
    ));
}

#[tokio::test]
async fn test_edit_transaction_changes_balance() {
    let service = service();
    let owner = OwnerId::new();
    let asha = add_customer(&service, owner, "Asha").await;
    let tx = add_tx(&service, owner, asha.id, TransactionType::Debit, dec!(500)).await;

    service
        .update_transaction(
            owner,
            tx,
            UpdateTransactionInput {
                transaction_type: Some(TransactionType::Credit),
                ..UpdateTransactionInput::default()
            },
        )
        .await
        .unwrap();

    let statement = service.customer_statement(owner, asha.id).await.unwrap();
    assert_eq!(statement.summary.balance, dec!(-500));
}

#[tokio::test]
async fn test_owners_do_not_see_each_other() {
    let service = service();
    let owner_a = OwnerId::new();
    let owner_b = OwnerId::new();
    let (asha, _) = seed(&service, owner_a).await;

    let report = service.customer_report(owner_b).await.unwrap();
    assert!(report.customers.is_empty());
    assert!(matches!(
        service.customer_statement(owner_b, asha.id).await,
        Err(LedgerError::NotFound { .. })
    ));
    assert!(service.delete_customer(owner_b, asha.id).await.is_err());

    let report = service.customer_report(owner_a).await.unwrap();
    assert_eq!(report.customers.len(), 2);
}

#[tokio::test]
async fn test_amounts_beyond_limit_are_rejected_before_reporting() {
    let service = service();
    let owner = OwnerId::new();
    let asha = add_customer(&service, owner, "Asha").await;

    for _ in 0..2 {
        let result = service
            .create_transaction(
                owner,
                CreateTransactionInput {
                    customer_id: Some(asha.id),
                    transaction_type: TransactionType::Debit,
                    amount: Some(Decimal::MAX),
                    description: None,
                    transaction_date: None,
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::AmountTooLarge(_)))
        ));
    }

    add_tx(&service, owner, asha.id, TransactionType::Debit, MAX_AMOUNT).await;
    add_tx(&service, owner, asha.id, TransactionType::Debit, MAX_AMOUNT).await;

    let report = service.customer_report(owner).await.unwrap();
    assert_eq!(report.customers[0].summary.balance, MAX_AMOUNT * Decimal::TWO);
}

#[tokio::test]
async fn test_overlong_customer_name_is_not_stored() {
    let service = service();
    let owner = OwnerId::new();

    let result = service
        .create_customer(
            owner,
            CreateCustomerInput {
                name: "a".repeat(300),
                ..CreateCustomerInput::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(LedgerError::Validation(ValidationError::TooLong { field: "name", .. }))
    ));
    assert!(
        service
            .list_customers(owner, CustomerOrder::Newest)
            .await
            .unwrap()
            .is_empty()
    );
}
