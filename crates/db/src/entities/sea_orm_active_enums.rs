//! Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use bahi_core::ledger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
pub enum TransactionType {
    #[sea_orm(string_value = "debit")]
    Debit,
    #[sea_orm(string_value = "credit")]
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "upi")]
    Upi,
    #[sea_orm(string_value = "cheque")]
    Cheque,
    #[sea_orm(string_value = "other")]
    Other,
}

impl From<ledger::TransactionType> for TransactionType {
    fn from(value: ledger::TransactionType) -> Self {
        match value {
            ledger::TransactionType::Debit => Self::Debit,
            ledger::TransactionType::Credit => Self::Credit,
        }
    }
}

impl From<TransactionType> for ledger::TransactionType {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Debit => Self::Debit,
            TransactionType::Credit => Self::Credit,
        }
    }
}

impl From<ledger::PaymentMethod> for PaymentMethod {
    fn from(value: ledger::PaymentMethod) -> Self {
        match value {
            ledger::PaymentMethod::Cash => Self::Cash,
            ledger::PaymentMethod::BankTransfer => Self::BankTransfer,
            ledger::PaymentMethod::Upi => Self::Upi,
            ledger::PaymentMethod::Cheque => Self::Cheque,
            ledger::PaymentMethod::Other => Self::Other,
        }
    }
}

impl From<PaymentMethod> for ledger::PaymentMethod {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::BankTransfer => Self::BankTransfer,
            PaymentMethod::Upi => Self::Upi,
            PaymentMethod::Cheque => Self::Cheque,
            PaymentMethod::Other => Self::Other,
        }
    }
}
