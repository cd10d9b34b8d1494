//! Customer routes.
//!
//! `GET /customers/{id}` returns the customer's statement, and `DELETE`
//! removes the customer together with its whole ledger.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use bahi_core::ledger::{CreateCustomerInput, Customer, UpdateCustomerInput};
use bahi_core::reports::CustomerStatement;
use bahi_core::store::CustomerOrder;
use bahi_shared::types::CustomerId;

use super::FormattedSummary;
use crate::{
    AppState,
    error::ApiResult,
    extractors::{Json, Path, Query},
    middleware::AuthUser,
};

/// Creates the customer routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer).patch(update_customer).delete(delete_customer),
        )
}

/// Query parameters for the customer list.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerListQuery {
    /// `newest` (default) or `name`.
    #[serde(default)]
    pub order: CustomerOrder,
}

/// A statement with display strings for its totals.
#[derive(Debug, Serialize)]
pub struct StatementResponse {
    /// The statement.
    #[serde(flatten)]
    pub statement: CustomerStatement,
    /// Formatted totals.
    pub formatted: FormattedSummary,
}

/// GET `/customers` - List the owner's customers.
async fn list_customers(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CustomerListQuery>,
) -> ApiResult<impl IntoResponse> {
    let customers = state.ledger.list_customers(auth.owner_id(), query.order).await?;
    Ok(Json(json!({ "customers": customers })))
}

/// POST `/customers` - Create a customer.
async fn create_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCustomerInput>,
) -> ApiResult<impl IntoResponse> {
    let customer = state.ledger.create_customer(auth.owner_id(), payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET `/customers/{id}` - Customer with its transactions, payments and balance.
async fn get_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StatementResponse>> {
    let statement = state
        .ledger
        .customer_statement(auth.owner_id(), CustomerId::from_uuid(id))
        .await?;
    let formatted = FormattedSummary::new(&statement.summary, state.currency);
    Ok(Json(StatementResponse {
        statement,
        formatted,
    }))
}

/// PATCH `/customers/{id}` - Update name, phone or address.
async fn update_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerInput>,
) -> ApiResult<Json<Customer>> {
    let customer = state
        .ledger
        .update_customer(auth.owner_id(), CustomerId::from_uuid(id), payload)
        .await?;
    Ok(Json(customer))
}

/// DELETE `/customers/{id}` - Delete a customer and its ledger.
async fn delete_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .ledger
        .delete_customer(auth.owner_id(), CustomerId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
