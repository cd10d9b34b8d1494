//! API route definitions.

use axum::{Router, middleware};
use rust_decimal::Decimal;
use serde::Serialize;

use bahi_core::ledger::BalanceSummary;
use bahi_shared::types::{Currency, Money};

use crate::{AppState, middleware::auth_middleware};

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod payments;
pub mod reports;
pub mod transactions;

/// Creates the API router; everything except health and session
/// management sits behind the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(customers::routes())
        .merge(transactions::routes())
        .merge(payments::routes())
        .merge(dashboard::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Display string for an amount, e.g. `-₹50.00`.
pub(crate) fn format_amount(amount: Decimal, currency: Currency) -> String {
    Money::new(amount, currency).format()
}

/// Display strings for a [`BalanceSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct FormattedSummary {
    /// Sum of debits.
    pub total_debit: String,
    /// Sum of credits.
    pub total_credit: String,
    /// Sum of payments.
    pub total_payments: String,
    /// Net balance.
    pub balance: String,
}

impl FormattedSummary {
    pub(crate) fn new(summary: &BalanceSummary, currency: Currency) -> Self {
        Self {
            total_debit: format_amount(summary.total_debit, currency),
            total_credit: format_amount(summary.total_credit, currency),
            total_payments: format_amount(summary.total_payments, currency),
            balance: format_amount(summary.balance, currency),
        }
    }
}
