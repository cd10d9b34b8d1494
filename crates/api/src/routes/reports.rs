//! Report routes.

use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use bahi_core::reports::{CustomerWithBalance, ReportTotals};
use bahi_shared::types::Currency;

use super::format_amount;
use crate::{AppState, error::ApiResult, extractors::Json, middleware::AuthUser};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/customer-balances", get(get_customer_balances))
}

/// One customer row with its formatted balance.
#[derive(Debug, Serialize)]
pub struct CustomerBalanceRow {
    /// Customer, totals and status.
    #[serde(flatten)]
    pub row: CustomerWithBalance,
    /// Formatted balance.
    pub formatted: String,
}

/// Report totals with display strings.
#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    /// Counts and amounts.
    #[serde(flatten)]
    pub totals: ReportTotals,
    /// Formatted amounts.
    pub formatted: FormattedTotals,
}

/// Display strings for the report totals.
#[derive(Debug, Serialize)]
pub struct FormattedTotals {
    /// Sum of balances.
    pub total_outstanding: String,
    /// Sum of debits.
    pub total_debit_issued: String,
    /// Sum of credits.
    pub total_credit: String,
    /// Sum of payments.
    pub total_payments_received: String,
}

/// Response for the customer balances report.
#[derive(Debug, Serialize)]
pub struct CustomerBalancesResponse {
    /// Rows ordered by customer name.
    pub customers: Vec<CustomerBalanceRow>,
    /// Rollup.
    pub totals: TotalsResponse,
    /// Display currency.
    pub currency: Currency,
}

/// GET `/reports/customer-balances` - Per-customer balances with totals.
async fn get_customer_balances(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CustomerBalancesResponse>> {
    let report = state.ledger.customer_report(auth.owner_id()).await?;
    let currency = state.currency;

    let customers = report
        .customers
        .into_iter()
        .map(|row| CustomerBalanceRow {
            formatted: format_amount(row.summary.balance, currency),
            row,
        })
        .collect();

    let totals = report.totals;
    Ok(Json(CustomerBalancesResponse {
        customers,
        totals: TotalsResponse {
            formatted: FormattedTotals {
                total_outstanding: format_amount(totals.total_outstanding, currency),
                total_debit_issued: format_amount(totals.total_debit_issued, currency),
                total_credit: format_amount(totals.total_credit, currency),
                total_payments_received: format_amount(totals.total_payments_received, currency),
            },
            totals,
        },
        currency,
    }))
}
