//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Request extractors
//! - Error responses

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use bahi_core::auth::AuthService;
use bahi_core::ledger::LedgerService;
use bahi_core::store::{IdentityStore, LedgerStore};
use bahi_shared::JwtService;
use bahi_shared::types::Currency;

pub use error::{ApiError, ApiResult};

/// Application state shared across handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Owner-scoped ledger operations.
    pub ledger: LedgerService,
    /// Registration, login and sessions.
    pub auth: AuthService,
    /// Currency used for `formatted` amounts.
    pub currency: Currency,
}

impl AppState {
    /// Wires the services over the given stores.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        identity: Arc<dyn IdentityStore>,
        jwt: Arc<JwtService>,
        currency: Currency,
    ) -> Self {
        Self {
            ledger: LedgerService::new(ledger),
            auth: AuthService::new(identity, jwt),
            currency,
        }
    }

    /// JWT service used by the auth middleware.
    #[must_use]
    pub fn jwt(&self) -> &JwtService {
        self.auth.jwt()
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
