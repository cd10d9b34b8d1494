//! Bahi API Server
//!
//! Main entry point for the Bahi backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use bahi_api::{AppState, create_router};
use bahi_db::init_storage;
use bahi_shared::config::LogFormat;
use bahi_shared::{AppConfig, JwtConfig, JwtService};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bahi=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(config.logging.format);

    let stores = init_storage(&config)
        .await
        .context("Failed to initialise storage")?;

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));
    let state = AppState::new(
        stores.ledger,
        stores.identity,
        Arc::new(jwt_service),
        config.display.currency,
    );

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(
        %addr,
        backend = %config.storage.backend,
        currency = %config.display.currency,
        "Server listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
