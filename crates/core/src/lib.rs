//! Core business logic for Bahi.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Customers, transactions, payments and balance calculation
//! - `reports` - Per-customer balances, dashboard metrics, statements
//! - `store` - Storage interfaces and the in-memory backend
//! - `auth` - Password handling and the identity service

pub mod auth;
pub mod ledger;
pub mod reports;
pub mod store;
