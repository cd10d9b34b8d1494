//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//! - Store wiring for the configured backend

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod rls;
pub mod store;

pub use repositories::{
    CustomerRepository, PaymentRepository, RepositoryError, SessionRepository,
    TransactionRepository, UserRepository,
};
pub use store::{SeaOrmIdentityStore, SeaOrmLedgerStore};

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

use bahi_core::store::{IdentityStore, LedgerStore, MemoryIdentityStore, MemoryLedgerStore};
use bahi_shared::config::{AppConfig, DatabaseConfig, StorageBackend};

/// Connects with the pool limits from configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}

/// The store pair a running service uses.
#[derive(Clone)]
pub struct Stores {
    /// Customers, transactions and payments.
    pub ledger: Arc<dyn LedgerStore>,
    /// Owners and refresh sessions.
    pub identity: Arc<dyn IdentityStore>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

impl Stores {
    /// In-process stores.
    #[must_use]
    pub fn memory() -> Self {
        Self {
            ledger: Arc::new(MemoryLedgerStore::new()),
            identity: Arc::new(MemoryIdentityStore::new()),
        }
    }

    /// PostgreSQL stores sharing one pool.
    #[must_use]
    pub fn postgres(db: DatabaseConnection) -> Self {
        Self {
            ledger: Arc::new(SeaOrmLedgerStore::new(db.clone())),
            identity: Arc::new(SeaOrmIdentityStore::new(db)),
        }
    }
}

/// Errors raised while selecting and opening the storage backend.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The postgres backend was chosen without `database.url`.
    #[error("Configuration error: {0}")]
    Config(#[from] bahi_shared::config::ConfigError),

    /// The database could not be reached.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Opens the backend named by `storage.backend`.
///
/// # Errors
///
/// Returns an error if the postgres backend is selected without database
/// settings or the connection fails.
pub async fn init_storage(config: &AppConfig) -> Result<Stores, InitError> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!(backend = %StorageBackend::Memory, "Using in-memory storage; data is lost on restart");
            Ok(Stores::memory())
        }
        StorageBackend::Postgres => {
            let database = config.require_database()?;
            let db = connect_with(database).await?;
            info!(backend = %StorageBackend::Postgres, "Connected to database");
            Ok(Stores::postgres(db))
        }
    }
}
