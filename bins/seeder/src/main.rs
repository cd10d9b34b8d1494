//! Demo data seeder for Bahi development.
//!
//! Creates a demo owner and a two-customer sample ledger through the store
//! traits, so it works against whichever backend is configured. Running it
//! again leaves existing data untouched.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use rust_decimal::Decimal;
use tracing::info;

use bahi_core::auth::{AuthService, User};
use bahi_core::ledger::{
    CreateCustomerInput, CreatePaymentInput, CreateTransactionInput, LedgerService, PaymentMethod,
    TransactionType,
};
use bahi_core::store::{CustomerOrder, IdentityStore};
use bahi_shared::auth::RegisterRequest;
use bahi_shared::types::CustomerId;
use bahi_shared::{AppConfig, JwtConfig, JwtService};

/// Demo owner credentials.
const DEMO_EMAIL: &str = "demo@bahi.dev";
const DEMO_PASSWORD: &str = "demo-password";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seeder=info,bahi=info".into()),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let stores = bahi_db::init_storage(&config)
        .await
        .context("Failed to open storage")?;

    let auth = AuthService::new(
        stores.identity.clone(),
        Arc::new(JwtService::new(JwtConfig::from(&config.jwt))),
    );
    let ledger = LedgerService::new(stores.ledger);

    let owner = seed_owner(&auth, &stores.identity).await?;
    seed_ledger(&ledger, &owner).await?;

    info!("Seeding complete");
    Ok(())
}

/// Registers the demo owner unless the email is already taken.
async fn seed_owner(
    auth: &AuthService,
    identity: &Arc<dyn IdentityStore>,
) -> anyhow::Result<User> {
    if let Some(user) = identity.find_user_by_email(DEMO_EMAIL).await? {
        info!(owner_id = %user.id, "Demo owner already exists, skipping");
        return Ok(user);
    }

    let user = auth
        .register(RegisterRequest {
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
            repeat_password: DEMO_PASSWORD.to_string(),
            username: Some("Demo Shop".to_string()),
        })
        .await?;
    info!(owner_id = %user.id, email = DEMO_EMAIL, "Demo owner created");
    Ok(user)
}

/// Seeds Asha (owes 200) and Ravi (overpaid by 50) for an owner with no customers.
async fn seed_ledger(ledger: &LedgerService, owner: &User) -> anyhow::Result<()> {
    if !ledger
        .list_customers(owner.id, CustomerOrder::Newest)
        .await?
        .is_empty()
    {
        info!(owner_id = %owner.id, "Demo ledger already exists, skipping");
        return Ok(());
    }

    let asha = add_customer(ledger, owner, "Asha", Some("98450 11111")).await?;
    add_transaction(ledger, owner, asha, TransactionType::Debit, 500, "Monthly groceries").await?;
    add_transaction(ledger, owner, asha, TransactionType::Credit, 100, "Returned rice bag").await?;
    add_payment(ledger, owner, asha, 200, PaymentMethod::Upi).await?;

    let ravi = add_customer(ledger, owner, "Ravi", None).await?;
    add_transaction(ledger, owner, ravi, TransactionType::Debit, 300, "Stationery").await?;
    add_payment(ledger, owner, ravi, 300, PaymentMethod::Cash).await?;
    add_payment(ledger, owner, ravi, 50, PaymentMethod::Cash).await?;

    let report = ledger.customer_report(owner.id).await?;
    info!(
        customers = report.totals.customer_count,
        total_outstanding = %report.totals.total_outstanding,
        "Demo ledger created"
    );
    Ok(())
}

async fn add_customer(
    ledger: &LedgerService,
    owner: &User,
    name: &str,
    phone: Option<&str>,
) -> anyhow::Result<CustomerId> {
    let customer = ledger
        .create_customer(
            owner.id,
            CreateCustomerInput {
                name: name.to_string(),
                phone: phone.map(String::from),
                address: None,
            },
        )
        .await?;
    Ok(customer.id)
}

async fn add_transaction(
    ledger: &LedgerService,
    owner: &User,
    customer: CustomerId,
    transaction_type: TransactionType,
    amount: i64,
    description: &str,
) -> anyhow::Result<()> {
    ledger
        .create_transaction(
            owner.id,
            CreateTransactionInput {
                customer_id: Some(customer),
                transaction_type,
                amount: Some(Decimal::from(amount)),
                description: Some(description.to_string()),
                transaction_date: None,
            },
        )
        .await?;
    Ok(())
}

async fn add_payment(
    ledger: &LedgerService,
    owner: &User,
    customer: CustomerId,
    amount: i64,
    payment_method: PaymentMethod,
) -> anyhow::Result<()> {
    ledger
        .create_payment(
            owner.id,
            CreatePaymentInput {
                customer_id: Some(customer),
                amount: Some(Decimal::from(amount)),
                payment_method,
                notes: None,
                payment_date: None,
            },
        )
        .await?;
    Ok(())
}
