//! Ledger domain types: customers, transactions and payments.
//!
//! Stored records carry the owner (`admin_id`) they belong to. Request inputs
//! (`Create*Input` / `Update*Input`) are what clients send; the validated
//! forms (`New*` / `*Patch`) are what the store accepts.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bahi_shared::types::{CustomerId, OwnerId, PaymentId, TransactionId};

/// Direction of a ledger transaction.
///
/// A debit increases what the customer owes; a credit reverses part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Amount the customer owes the shop.
    Debit,
    /// Amount reversing a debit (returns, adjustments).
    Credit,
}

impl TransactionType {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            _ => Err(format!("Unknown transaction type: {s}")),
        }
    }
}

/// How a payment was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash over the counter.
    #[default]
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// UPI or other online payment.
    #[serde(alias = "online")]
    Upi,
    /// Cheque.
    Cheque,
    /// Anything else.
    Other,
}

impl PaymentMethod {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::Upi => "upi",
            Self::Cheque => "cheque",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "bank_transfer" => Ok(Self::BankTransfer),
            "upi" | "online" => Ok(Self::Upi),
            "cheque" => Ok(Self::Cheque),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown payment method: {s}")),
        }
    }
}

/// A customer of the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer ID.
    pub id: CustomerId,
    /// Owning shop operator.
    pub admin_id: OwnerId,
    /// Display name, never blank.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Builds a fresh customer record.
    #[must_use]
    pub fn new(owner: OwnerId, input: NewCustomer, now: DateTime<Utc>) -> Self {
        Self {
            id: CustomerId::new(),
            admin_id: owner,
            name: input.name,
            phone: input.phone,
            address: input.address,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the fields present in `patch` and bumps `updated_at`.
    pub fn apply(&mut self, patch: CustomerPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        self.updated_at = now;
    }
}

/// A debit or credit recorded against a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Owning shop operator.
    pub admin_id: OwnerId,
    /// Customer the transaction belongs to.
    pub customer_id: CustomerId,
    /// Debit or credit.
    pub transaction_type: TransactionType,
    /// Positive magnitude; the sign comes from `transaction_type`.
    pub amount: Decimal,
    /// Free-text description.
    pub description: Option<String>,
    /// Business date of the transaction.
    pub transaction_date: NaiveDate,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a fresh transaction record.
    #[must_use]
    pub fn new(owner: OwnerId, input: NewTransaction, now: DateTime<Utc>) -> Self {
        Self {
            id: TransactionId::new(),
            admin_id: owner,
            customer_id: input.customer_id,
            transaction_type: input.transaction_type,
            amount: input.amount,
            description: input.description,
            transaction_date: input.transaction_date,
            created_at: now,
        }
    }

    /// Overwrites the fields present in `patch`.
    pub fn apply(&mut self, patch: TransactionPatch) {
        if let Some(customer_id) = patch.customer_id {
            self.customer_id = customer_id;
        }
        if let Some(transaction_type) = patch.transaction_type {
            self.transaction_type = transaction_type;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.transaction_date {
            self.transaction_date = date;
        }
    }
}

/// Money received from a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment ID.
    pub id: PaymentId,
    /// Owning shop operator.
    pub admin_id: OwnerId,
    /// Paying customer.
    pub customer_id: CustomerId,
    /// Positive amount received.
    pub amount: Decimal,
    /// How the money was received.
    pub payment_method: PaymentMethod,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Business date of the payment.
    pub payment_date: NaiveDate,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Builds a fresh payment record.
    #[must_use]
    pub fn new(owner: OwnerId, input: NewPayment, now: DateTime<Utc>) -> Self {
        Self {
            id: PaymentId::new(),
            admin_id: owner,
            customer_id: input.customer_id,
            amount: input.amount,
            payment_method: input.payment_method,
            notes: input.notes,
            payment_date: input.payment_date,
            created_at: now,
        }
    }

    /// Overwrites the fields present in `patch`.
    pub fn apply(&mut self, patch: PaymentPatch) {
        if let Some(customer_id) = patch.customer_id {
            self.customer_id = customer_id;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(method) = patch.payment_method {
            self.payment_method = method;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(date) = patch.payment_date {
            self.payment_date = date;
        }
    }
}

// ========== Request inputs ==========

/// Input for creating a customer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCustomerInput {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Input for updating a customer.
///
/// Nullable fields distinguish "absent" (keep) from `null` (clear).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomerInput {
    /// New display name.
    pub name: Option<String>,
    /// New phone number, or `null` to clear it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub phone: Option<Option<String>>,
    /// New address, or `null` to clear it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub address: Option<Option<String>>,
}

/// Input for recording a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionInput {
    /// Customer the transaction is recorded against.
    pub customer_id: Option<CustomerId>,
    /// Debit or credit.
    pub transaction_type: TransactionType,
    /// Positive amount.
    pub amount: Option<Decimal>,
    /// Free-text description.
    pub description: Option<String>,
    /// Business date; today when absent.
    pub transaction_date: Option<NaiveDate>,
}

/// Input for editing a transaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTransactionInput {
    /// Re-point to another customer.
    pub customer_id: Option<CustomerId>,
    /// New direction.
    pub transaction_type: Option<TransactionType>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New description, or `null` to clear it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    /// New business date.
    pub transaction_date: Option<NaiveDate>,
}

/// Input for recording a payment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentInput {
    /// Paying customer.
    pub customer_id: Option<CustomerId>,
    /// Positive amount.
    pub amount: Option<Decimal>,
    /// How the money was received; cash when absent.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Business date; today when absent.
    pub payment_date: Option<NaiveDate>,
}

/// Input for editing a payment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePaymentInput {
    /// Re-point to another customer.
    pub customer_id: Option<CustomerId>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New method.
    pub payment_method: Option<PaymentMethod>,
    /// New notes, or `null` to clear them.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,
    /// New business date.
    pub payment_date: Option<NaiveDate>,
}

// ========== Validated store inputs ==========

/// A validated customer, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    /// Trimmed, non-empty name.
    pub name: String,
    /// Phone; blank normalised to `None`.
    pub phone: Option<String>,
    /// Address; blank normalised to `None`.
    pub address: Option<String>,
}

/// A validated partial customer update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPatch {
    /// New name.
    pub name: Option<String>,
    /// `Some(None)` clears the phone.
    pub phone: Option<Option<String>>,
    /// `Some(None)` clears the address.
    pub address: Option<Option<String>>,
}

/// A validated transaction, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Customer the transaction is recorded against.
    pub customer_id: CustomerId,
    /// Debit or credit.
    pub transaction_type: TransactionType,
    /// Positive amount.
    pub amount: Decimal,
    /// Description; blank normalised to `None`.
    pub description: Option<String>,
    /// Business date.
    pub transaction_date: NaiveDate,
}

/// A validated partial transaction update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    /// New customer.
    pub customer_id: Option<CustomerId>,
    /// New direction.
    pub transaction_type: Option<TransactionType>,
    /// New positive amount.
    pub amount: Option<Decimal>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    /// New business date.
    pub transaction_date: Option<NaiveDate>,
}

/// A validated payment, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    /// Paying customer.
    pub customer_id: CustomerId,
    /// Positive amount.
    pub amount: Decimal,
    /// How the money was received.
    pub payment_method: PaymentMethod,
    /// Notes; blank normalised to `None`.
    pub notes: Option<String>,
    /// Business date.
    pub payment_date: NaiveDate,
}

/// A validated partial payment update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentPatch {
    /// New customer.
    pub customer_id: Option<CustomerId>,
    /// New positive amount.
    pub amount: Option<Decimal>,
    /// New method.
    pub payment_method: Option<PaymentMethod>,
    /// `Some(None)` clears the notes.
    pub notes: Option<Option<String>>,
    /// New business date.
    pub payment_date: Option<NaiveDate>,
}
