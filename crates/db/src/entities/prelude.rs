//! Entity re-exports.

pub use super::customers::Entity as Customers;
pub use super::payments::Entity as Payments;
pub use super::sessions::Entity as Sessions;
pub use super::transactions::Entity as Transactions;
pub use super::users::Entity as Users;
