//! `SeaORM` entities.

pub mod prelude;

pub mod customers;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod transactions;
pub mod users;
