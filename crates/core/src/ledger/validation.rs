//! Business rule validation for ledger inputs.
//!
//! Turns request inputs into the validated forms the store accepts. Nothing
//! reaches the store until it passes here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{
    CreateCustomerInput, CreatePaymentInput, CreateTransactionInput, CustomerPatch, NewCustomer,
    NewPayment, NewTransaction, PaymentPatch, TransactionPatch, UpdateCustomerInput,
    UpdatePaymentInput, UpdateTransactionInput,
};

/// Longest customer name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Longest customer phone number, in characters.
pub const MAX_PHONE_LEN: usize = 50;

/// Largest amount a single transaction or payment may carry: 10^12.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Validation errors for ledger inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Customer name is empty after trimming.
    #[error("Customer name is required")]
    EmptyName,

    /// No customer was selected.
    #[error("Customer is required")]
    MissingCustomer,

    /// No amount was given.
    #[error("Amount is required")]
    MissingAmount,

    /// Amount is zero or negative.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Amount is above [`MAX_AMOUNT`].
    #[error("Amount must not exceed {max}, got {0}", max = MAX_AMOUNT)]
    AmountTooLarge(Decimal),

    /// A text field is longer than its column allows.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name as sent by clients.
        field: &'static str,
        /// Limit in characters.
        max: usize,
    },
}

/// Trims an optional string, mapping blank to `None`.
#[must_use]
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn normalize_nullable(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(normalize_optional)
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn validate_phone(phone: Option<String>) -> Result<Option<String>, ValidationError> {
    let phone = normalize_optional(phone);
    if let Some(p) = &phone {
        check_length("phone", p, MAX_PHONE_LEN)?;
    }
    Ok(phone)
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    check_length("name", trimmed, MAX_NAME_LEN)?;
    Ok(trimmed.to_string())
}

/// Checks that an amount is strictly positive and at most [`MAX_AMOUNT`].
///
/// # Errors
///
/// Returns `ValidationError::NonPositiveAmount` for zero or negative amounts
/// and `ValidationError::AmountTooLarge` above the limit.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(amount));
    }
    Ok(amount)
}

fn required_amount(amount: Option<Decimal>) -> Result<Decimal, ValidationError> {
    amount
        .ok_or(ValidationError::MissingAmount)
        .and_then(validate_amount)
}

/// Validates a new customer.
///
/// # Errors
///
/// Returns `ValidationError::EmptyName` if the name is blank and
/// `ValidationError::TooLong` if the name or phone is over its limit.
pub fn validate_new_customer(input: CreateCustomerInput) -> Result<NewCustomer, ValidationError> {
    Ok(NewCustomer {
        name: validate_name(&input.name)?,
        phone: validate_phone(input.phone)?,
        address: normalize_optional(input.address),
    })
}

/// Validates a customer update.
///
/// # Errors
///
/// Returns `ValidationError::EmptyName` if a name is given but blank and
/// `ValidationError::TooLong` if the name or phone is over its limit.
pub fn validate_customer_patch(input: UpdateCustomerInput) -> Result<CustomerPatch, ValidationError> {
    Ok(CustomerPatch {
        name: input.name.as_deref().map(validate_name).transpose()?,
        phone: input.phone.map(validate_phone).transpose()?,
        address: normalize_nullable(input.address),
    })
}

/// Validates a new transaction; an absent date becomes `today`.
///
/// # Errors
///
/// Returns an error if the customer or amount is missing or the amount is not positive.
pub fn validate_new_transaction(
    input: CreateTransactionInput,
    today: NaiveDate,
) -> Result<NewTransaction, ValidationError> {
    let customer_id = input.customer_id.ok_or(ValidationError::MissingCustomer)?;
    let amount = required_amount(input.amount)?;

    Ok(NewTransaction {
        customer_id,
        transaction_type: input.transaction_type,
        amount,
        description: normalize_optional(input.description),
        transaction_date: input.transaction_date.unwrap_or(today),
    })
}

/// Validates a transaction update.
///
/// # Errors
///
/// Returns `ValidationError::NonPositiveAmount` if a new amount is not positive.
pub fn validate_transaction_patch(
    input: UpdateTransactionInput,
) -> Result<TransactionPatch, ValidationError> {
    Ok(TransactionPatch {
        customer_id: input.customer_id,
        transaction_type: input.transaction_type,
        amount: input.amount.map(validate_amount).transpose()?,
        description: normalize_nullable(input.description),
        transaction_date: input.transaction_date,
    })
}

/// Validates a new payment; an absent date becomes `today`.
///
/// # Errors
///
/// Returns an error if the customer or amount is missing or the amount is not positive.
pub fn validate_new_payment(
    input: CreatePaymentInput,
    today: NaiveDate,
) -> Result<NewPayment, ValidationError> {
    let customer_id = input.customer_id.ok_or(ValidationError::MissingCustomer)?;
    let amount = required_amount(input.amount)?;

    Ok(NewPayment {
        customer_id,
        amount,
        payment_method: input.payment_method,
        notes: normalize_optional(input.notes),
        payment_date: input.payment_date.unwrap_or(today),
    })
}

/// Validates a payment update.
///
/// # Errors
///
/// Returns `ValidationError::NonPositiveAmount` if a new amount is not positive.
pub fn validate_payment_patch(input: UpdatePaymentInput) -> Result<PaymentPatch, ValidationError> {
    Ok(PaymentPatch {
        customer_id: input.customer_id,
        amount: input.amount.map(validate_amount).transpose()?,
        payment_method: input.payment_method,
        notes: normalize_nullable(input.notes),
        payment_date: input.payment_date,
    })
}
