//! Customer balance calculation.
//!
//! A customer's balance is recomputed from full history on every read:
//!
//! ```text
//! balance = total_debit - total_credit - total_payments
//! ```
//!
//! Amounts are stored as positive magnitudes; the sign comes from the
//! transaction type or from being a payment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::types::{Payment, Transaction, TransactionType};

/// Classification of a balance by its sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    /// The customer owes the shop (balance > 0).
    Receivable,
    /// The shop owes the customer (balance < 0).
    Payable,
    /// Nothing outstanding.
    Settled,
}

impl BalanceStatus {
    /// Classifies a balance.
    #[must_use]
    pub fn from_balance(balance: Decimal) -> Self {
        if balance > Decimal::ZERO {
            Self::Receivable
        } else if balance < Decimal::ZERO {
            Self::Payable
        } else {
            Self::Settled
        }
    }
}

/// Totals and net balance for one customer (or a whole ledger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Sum of debit transactions.
    pub total_debit: Decimal,
    /// Sum of credit transactions.
    pub total_credit: Decimal,
    /// Sum of payments received.
    pub total_payments: Decimal,
    /// `total_debit - total_credit - total_payments`.
    pub balance: Decimal,
}

impl BalanceSummary {
    /// An all-zero summary.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Adds a transaction amount on the side given by its type.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Overflow` if a total leaves the `Decimal` range.
    /// The summary is unchanged in that case.
    pub fn add_transaction(
        &mut self,
        transaction_type: TransactionType,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let mut next = *self;
        match transaction_type {
            TransactionType::Debit => next.total_debit = add_amounts(next.total_debit, amount)?,
            TransactionType::Credit => next.total_credit = add_amounts(next.total_credit, amount)?,
        }
        *self = next.recomputed()?;
        Ok(())
    }

    /// Adds a payment amount.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Overflow` if a total leaves the `Decimal` range.
    /// The summary is unchanged in that case.
    pub fn add_payment(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        let mut next = *self;
        next.total_payments = add_amounts(next.total_payments, amount)?;
        *self = next.recomputed()?;
        Ok(())
    }

    /// Sign classification of the balance.
    #[must_use]
    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::from_balance(self.balance)
    }

    fn recomputed(mut self) -> Result<Self, LedgerError> {
        self.balance = self
            .total_debit
            .checked_sub(self.total_credit)
            .and_then(|b| b.checked_sub(self.total_payments))
            .ok_or(LedgerError::Overflow)?;
        Ok(self)
    }
}

/// Adds two amounts without panicking on overflow.
///
/// # Errors
///
/// Returns `LedgerError::Overflow` if the sum is out of range.
pub fn add_amounts(a: Decimal, b: Decimal) -> Result<Decimal, LedgerError> {
    a.checked_add(b).ok_or(LedgerError::Overflow)
}

/// Reduces transactions and payments into a [`BalanceSummary`].
///
/// Callers pass only the rows of the customer they care about; no filtering
/// by customer happens here. Empty inputs yield all zeros.
///
/// # Examples
///
/// ```
/// use bahi_core::ledger::{Payment, Transaction, compute_balance};
///
/// let summary = compute_balance(&Vec::<Transaction>::new(), &Vec::<Payment>::new()).unwrap();
/// assert!(summary.balance.is_zero());
/// ```
///
/// # Errors
///
/// Returns `LedgerError::Overflow` if a total leaves the `Decimal` range.
pub fn compute_balance<'a, T, P>(transactions: T, payments: P) -> Result<BalanceSummary, LedgerError>
where
    T: IntoIterator<Item = &'a Transaction>,
    P: IntoIterator<Item = &'a Payment>,
{
    let mut summary = BalanceSummary::zero();
    for tx in transactions {
        summary.add_transaction(tx.transaction_type, tx.amount)?;
    }
    for payment in payments {
        summary.add_payment(payment.amount)?;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{NewPayment, NewTransaction, PaymentMethod};
    use bahi_shared::types::{CustomerId, OwnerId};
    use chrono::{NaiveDate, Utc};
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    const NO_TRANSACTIONS: &[Transaction] = &[];
    const NO_PAYMENTS: &[Payment] = &[];

    fn tx(transaction_type: TransactionType, amount: Decimal) -> Transaction {
        Transaction::new(
            OwnerId::new(),
            NewTransaction {
                customer_id: CustomerId::new(),
                transaction_type,
                amount,
                description: None,
                transaction_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            },
            Utc::now(),
        )
    }

    fn payment(amount: Decimal) -> Payment {
        Payment::new(
            OwnerId::new(),
            NewPayment {
                customer_id: CustomerId::new(),
                amount,
                payment_method: PaymentMethod::Cash,
                notes: None,
                payment_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_empty_is_zero() {
        let summary = compute_balance(NO_TRANSACTIONS, NO_PAYMENTS).unwrap();
        assert_eq!(summary, BalanceSummary::zero());
        assert_eq!(summary.status(), BalanceStatus::Settled);
    }

    #[test]
    fn test_receivable_customer() {
        let txs = vec![
            tx(TransactionType::Debit, dec!(500)),
            tx(TransactionType::Credit, dec!(100)),
        ];
        let payments = vec![payment(dec!(200))];

        let summary = compute_balance(&txs, &payments).unwrap();
        assert_eq!(summary.total_debit, dec!(500));
        assert_eq!(summary.total_credit, dec!(100));
        assert_eq!(summary.total_payments, dec!(200));
        assert_eq!(summary.balance, dec!(200));
        assert_eq!(summary.status(), BalanceStatus::Receivable);
    }

    #[test]
    fn test_overpaid_customer_is_payable() {
        let txs = vec![tx(TransactionType::Debit, dec!(300))];
        let payments = vec![payment(dec!(300)), payment(dec!(50))];

        let summary = compute_balance(&txs, &payments).unwrap();
        assert_eq!(summary.balance, dec!(-50));
        assert_eq!(summary.status(), BalanceStatus::Payable);
    }

    #[test]
    fn test_full_precision_kept() {
        let txs = vec![
            tx(TransactionType::Debit, dec!(0.001)),
            tx(TransactionType::Debit, dec!(0.002)),
        ];
        assert_eq!(compute_balance(&txs, NO_PAYMENTS).unwrap().balance, dec!(0.003));
    }

    #[rstest]
    #[case(dec!(0.01), BalanceStatus::Receivable)]
    #[case(dec!(0), BalanceStatus::Settled)]
    #[case(dec!(-0.01), BalanceStatus::Payable)]
    fn test_status_from_balance(#[case] balance: Decimal, #[case] expected: BalanceStatus) {
        assert_eq!(BalanceStatus::from_balance(balance), expected);
    }

    #[test]
    fn test_overflowing_totals_are_an_error() {
        let txs = vec![
            tx(TransactionType::Debit, Decimal::MAX),
            tx(TransactionType::Debit, Decimal::MAX),
        ];
        assert!(matches!(compute_balance(&txs, NO_PAYMENTS), Err(LedgerError::Overflow)));
    }

    #[test]
    fn test_overflowing_balance_leaves_summary_unchanged() {
        let mut summary = BalanceSummary::zero();
        summary.add_payment(Decimal::MAX).unwrap();
        let before = summary;

        // 0 - MAX - MAX is below Decimal::MIN
        assert!(matches!(
            summary.add_transaction(TransactionType::Credit, Decimal::MAX),
            Err(LedgerError::Overflow)
        ));
        assert_eq!(summary, before);
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #[test]
        fn prop_balance_identity(
            debits in prop::collection::vec(amount_strategy(), 0..20),
            credits in prop::collection::vec(amount_strategy(), 0..20),
            paid in prop::collection::vec(amount_strategy(), 0..20),
        ) {
            let mut txs: Vec<Transaction> = debits.iter().map(|a| tx(TransactionType::Debit, *a)).collect();
            txs.extend(credits.iter().map(|a| tx(TransactionType::Credit, *a)));
            let payments: Vec<Payment> = paid.iter().map(|a| payment(*a)).collect();

            let summary = compute_balance(&txs, &payments).unwrap();
            let expected = debits.iter().sum::<Decimal>()
                - credits.iter().sum::<Decimal>()
                - paid.iter().sum::<Decimal>();

            prop_assert_eq!(summary.balance, expected);
            prop_assert_eq!(summary.total_debit, debits.iter().sum::<Decimal>());
            prop_assert_eq!(summary.status(), BalanceStatus::from_balance(expected));
        }

        #[test]
        fn prop_order_independent(
            amounts in prop::collection::vec(amount_strategy(), 1..20),
        ) {
            let txs: Vec<Transaction> = amounts
                .iter()
                .enumerate()
                .map(|(i, a)| {
                    let kind = if i % 2 == 0 { TransactionType::Debit } else { TransactionType::Credit };
                    tx(kind, *a)
                })
                .collect();
            let mut reversed = txs.clone();
            reversed.reverse();

            prop_assert_eq!(
                compute_balance(&txs, NO_PAYMENTS).unwrap(),
                compute_balance(&reversed, NO_PAYMENTS).unwrap()
            );
        }
    }
}
