//! Transaction routes.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use bahi_core::ledger::{CreateTransactionInput, Transaction, UpdateTransactionInput};
use bahi_shared::types::{CustomerId, TransactionId};

use crate::{
    AppState,
    error::ApiResult,
    extractors::{Json, Path, Query},
    middleware::AuthUser,
};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
}

/// Query parameters for ledger lists.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerListQuery {
    /// Restrict to one customer.
    pub customer_id: Option<Uuid>,
}

impl LedgerListQuery {
    /// The customer filter as a typed ID.
    #[must_use]
    pub fn customer(&self) -> Option<CustomerId> {
        self.customer_id.map(CustomerId::from_uuid)
    }
}

/// GET `/transactions` - List transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LedgerListQuery>,
) -> ApiResult<impl IntoResponse> {
    let transactions = state
        .ledger
        .list_transactions(auth.owner_id(), query.customer())
        .await?;
    Ok(Json(json!({ "transactions": transactions })))
}

/// POST `/transactions` - Record a debit or credit.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTransactionInput>,
) -> ApiResult<impl IntoResponse> {
    let tx = state
        .ledger
        .create_transaction(auth.owner_id(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(tx)))
}

/// GET `/transactions/{id}` - Fetch one transaction.
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Transaction>> {
    let tx = state
        .ledger
        .get_transaction(auth.owner_id(), TransactionId::from_uuid(id))
        .await?;
    Ok(Json(tx))
}

/// PATCH `/transactions/{id}` - Edit a transaction.
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionInput>,
) -> ApiResult<Json<Transaction>> {
    let tx = state
        .ledger
        .update_transaction(auth.owner_id(), TransactionId::from_uuid(id), payload)
        .await?;
    Ok(Json(tx))
}

/// DELETE `/transactions/{id}` - Delete a transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .ledger
        .delete_transaction(auth.owner_id(), TransactionId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
