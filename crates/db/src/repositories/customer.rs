//! Customer repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Order,
    QueryFilter, QueryOrder, Set, sea_query::Expr,
};
use tracing::debug;

use bahi_core::ledger::{CustomerPatch, NewCustomer};
use bahi_core::store::CustomerOrder;
use bahi_shared::types::{CustomerId, OwnerId};

use super::RepositoryError;
use crate::entities::{customers, payments, transactions};
use crate::rls::OwnerScope;

/// Customer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the owner's customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        owner: OwnerId,
        order: CustomerOrder,
    ) -> Result<Vec<customers::Model>, RepositoryError> {
        let scope = OwnerScope::begin(&self.db, owner).await?;

        let query = customers::Entity::find().filter(customers::Column::AdminId.eq(owner.into_inner()));
        let query = match order {
            CustomerOrder::Newest => query
                .order_by_desc(customers::Column::CreatedAt)
                .order_by_desc(customers::Column::Id),
            CustomerOrder::Name => query
                .order_by(Expr::cust("lower(name)"), Order::Asc)
                .order_by_asc(customers::Column::Id),
        };
        let rows = query.all(scope.transaction()).await?;

        scope.commit().await?;
        Ok(rows)
    }

    /// Finds a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        owner: OwnerId,
        id: CustomerId,
    ) -> Result<Option<customers::Model>, RepositoryError> {
        let scope = OwnerScope::begin(&self.db, owner).await?;
        let row = customers::Entity::find_by_id(id.into_inner())
            .filter(customers::Column::AdminId.eq(owner.into_inner()))
            .one(scope.transaction())
            .await?;
        scope.commit().await?;
        Ok(row)
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        owner: OwnerId,
        input: NewCustomer,
    ) -> Result<customers::Model, RepositoryError> {
        let now = Utc::now().into();
        let scope = OwnerScope::begin(&self.db, owner).await?;

        let customer = customers::ActiveModel {
            id: Set(CustomerId::new().into_inner()),
            admin_id: Set(owner.into_inner()),
            name: Set(input.name),
            phone: Set(input.phone),
            address: Set(input.address),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(scope.transaction())
        .await?;

        scope.commit().await?;
        Ok(customer)
    }

    /// Applies a patch; `None` if the customer does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        owner: OwnerId,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<Option<customers::Model>, RepositoryError> {
        let scope = OwnerScope::begin(&self.db, owner).await?;

        let Some(existing) = customers::Entity::find_by_id(id.into_inner())
            .filter(customers::Column::AdminId.eq(owner.into_inner()))
            .one(scope.transaction())
            .await?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(phone) = patch.phone {
            model.phone = Set(phone);
        }
        if let Some(address) = patch.address {
            model.address = Set(address);
        }
        model.updated_at = Set(Utc::now().into());

        let updated = model.update(scope.transaction()).await?;
        scope.commit().await?;
        Ok(Some(updated))
    }

    /// Deletes a customer and all of its transactions and payments in one
    /// database transaction. Returns `false` if the customer does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any delete fails; nothing is removed in that case.
    pub async fn delete_cascade(&self, owner: OwnerId, id: CustomerId) -> Result<bool, RepositoryError> {
        let owner_uuid = owner.into_inner();
        let customer_uuid = id.into_inner();
        let scope = OwnerScope::begin(&self.db, owner).await?;
        let txn = scope.transaction();

        let removed_payments = payments::Entity::delete_many()
            .filter(payments::Column::AdminId.eq(owner_uuid))
            .filter(payments::Column::CustomerId.eq(customer_uuid))
            .exec(txn)
            .await?
            .rows_affected;
        let removed_transactions = transactions::Entity::delete_many()
            .filter(transactions::Column::AdminId.eq(owner_uuid))
            .filter(transactions::Column::CustomerId.eq(customer_uuid))
            .exec(txn)
            .await?
            .rows_affected;
        let removed = customers::Entity::delete_many()
            .filter(customers::Column::AdminId.eq(owner_uuid))
            .filter(customers::Column::Id.eq(customer_uuid))
            .exec(txn)
            .await?
            .rows_affected;

        if removed == 0 {
            scope.rollback().await?;
            return Ok(false);
        }

        scope.commit().await?;
        debug!(
            customer_id = %id,
            removed_transactions,
            removed_payments,
            "Customer cascade committed"
        );
        Ok(true)
    }
}
