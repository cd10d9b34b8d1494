//! Balance reports.
//!
//! Pure aggregation over rows fetched from the store:
//! - Per-customer balances with system-wide totals
//! - Dashboard metrics
//! - Customer statements

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::ReportService;
pub use types::*;
