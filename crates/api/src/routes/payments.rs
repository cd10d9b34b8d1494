//! Payment routes.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use uuid::Uuid;

use bahi_core::ledger::{CreatePaymentInput, Payment, UpdatePaymentInput};
use bahi_shared::types::PaymentId;

use super::transactions::LedgerListQuery;
use crate::{
    AppState,
    error::ApiResult,
    extractors::{Json, Path, Query},
    middleware::AuthUser,
};

/// Creates the payment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
        .route(
            "/payments/{id}",
            get(get_payment).patch(update_payment).delete(delete_payment),
        )
}

/// GET `/payments` - List payments, newest first.
async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LedgerListQuery>,
) -> ApiResult<impl IntoResponse> {
    let payments = state
        .ledger
        .list_payments(auth.owner_id(), query.customer())
        .await?;
    Ok(Json(json!({ "payments": payments })))
}

/// POST `/payments` - Record a payment.
async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreatePaymentInput>,
) -> ApiResult<impl IntoResponse> {
    let payment = state.ledger.create_payment(auth.owner_id(), payload).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

async fn get_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Payment>> {
    let payment = state
        .ledger
        .get_payment(auth.owner_id(), PaymentId::from_uuid(id))
        .await?;
    Ok(Json(payment))
}

async fn update_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentInput>,
) -> ApiResult<Json<Payment>> {
    let payment = state
        .ledger
        .update_payment(auth.owner_id(), PaymentId::from_uuid(id), payload)
        .await?;
    Ok(Json(payment))
}

async fn delete_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .ledger
        .delete_payment(auth.owner_id(), PaymentId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
