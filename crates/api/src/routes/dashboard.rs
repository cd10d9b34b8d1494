//! Dashboard routes.

use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use bahi_core::reports::DashboardMetrics;
use bahi_shared::types::Currency;

use super::format_amount;
use crate::{AppState, error::ApiResult, extractors::Json, middleware::AuthUser};

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/metrics", get(get_dashboard_metrics))
}

/// Response for dashboard metrics.
#[derive(Debug, Serialize)]
pub struct DashboardMetricsResponse {
    /// Counts and amounts.
    #[serde(flatten)]
    pub metrics: DashboardMetrics,
    /// Display currency.
    pub currency: Currency,
    /// Formatted amounts.
    pub formatted: FormattedMetrics,
}

/// Display strings for the dashboard amounts.
#[derive(Debug, Serialize)]
pub struct FormattedMetrics {
    /// Sum of debits.
    pub total_debit: String,
    /// Sum of credits.
    pub total_credit: String,
    /// Sum of payments.
    pub total_payments_amount: String,
    /// Net balance.
    pub outstanding_balance: String,
}

impl FormattedMetrics {
    fn new(metrics: &DashboardMetrics, currency: Currency) -> Self {
        Self {
            total_debit: format_amount(metrics.total_debit, currency),
            total_credit: format_amount(metrics.total_credit, currency),
            total_payments_amount: format_amount(metrics.total_payments_amount, currency),
            outstanding_balance: format_amount(metrics.outstanding_balance, currency),
        }
    }
}

/// GET `/dashboard/metrics` - Headline figures over the owner's ledger.
async fn get_dashboard_metrics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DashboardMetricsResponse>> {
    let metrics = state.ledger.dashboard_metrics(auth.owner_id()).await?;
    Ok(Json(DashboardMetricsResponse {
        formatted: FormattedMetrics::new(&metrics, state.currency),
        currency: state.currency,
        metrics,
    }))
}
