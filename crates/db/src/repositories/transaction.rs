//! Transaction repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use bahi_core::ledger::{NewTransaction, TransactionPatch};
use bahi_shared::types::{CustomerId, OwnerId, TransactionId};

use super::{RepositoryError, ensure_customer};
use crate::entities::transactions;
use crate::rls::OwnerScope;

/// Transaction repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the owner's transactions, newest business date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        owner: OwnerId,
        customer: Option<CustomerId>,
    ) -> Result<Vec<transactions::Model>, RepositoryError> {
        let scope = OwnerScope::begin(&self.db, owner).await?;

        let mut query =
            transactions::Entity::find().filter(transactions::Column::AdminId.eq(owner.into_inner()));
        if let Some(customer) = customer {
            query = query.filter(transactions::Column::CustomerId.eq(customer.into_inner()));
        }
        let rows = query
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .all(scope.transaction())
            .await?;

        scope.commit().await?;
        Ok(rows)
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        owner: OwnerId,
        id: TransactionId,
    ) -> Result<Option<transactions::Model>, RepositoryError> {
        let scope = OwnerScope::begin(&self.db, owner).await?;
        let row = find_owned(&scope, owner, id.into_inner()).await?;
        scope.commit().await?;
        Ok(row)
    }

    /// Records a transaction against one of the owner's customers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::UnknownCustomer` if the customer does not
    /// exist, or a database error if the insert fails.
    pub async fn create(
        &self,
        owner: OwnerId,
        input: NewTransaction,
    ) -> Result<transactions::Model, RepositoryError> {
        let scope = OwnerScope::begin(&self.db, owner).await?;
        ensure_customer(scope.transaction(), owner.into_inner(), input.customer_id.into_inner()).await?;

        let tx = transactions::ActiveModel {
            id: Set(TransactionId::new().into_inner()),
            admin_id: Set(owner.into_inner()),
            customer_id: Set(input.customer_id.into_inner()),
            transaction_type: Set(input.transaction_type.into()),
            amount: Set(input.amount),
            description: Set(input.description),
            transaction_date: Set(input.transaction_date),
            created_at: Set(Utc::now().into()),
        }
        .insert(scope.transaction())
        .await?;

        scope.commit().await?;
        Ok(tx)
    }

    /// Applies a patch; `None` if the transaction does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::UnknownCustomer` if the patch moves the
    /// transaction to a customer the owner does not have.
    pub async fn update(
        &self,
        owner: OwnerId,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Option<transactions::Model>, RepositoryError> {
        let scope = OwnerScope::begin(&self.db, owner).await?;

        let Some(existing) = find_owned(&scope, owner, id.into_inner()).await? else {
            return Ok(None);
        };

        let mut model = existing.clone().into_active_model();
        if let Some(customer_id) = patch.customer_id {
            ensure_customer(scope.transaction(), owner.into_inner(), customer_id.into_inner()).await?;
            model.customer_id = Set(customer_id.into_inner());
        }
        if let Some(transaction_type) = patch.transaction_type {
            model.transaction_type = Set(transaction_type.into());
        }
        if let Some(amount) = patch.amount {
            model.amount = Set(amount);
        }
        if let Some(description) = patch.description {
            model.description = Set(description);
        }
        if let Some(date) = patch.transaction_date {
            model.transaction_date = Set(date);
        }

        // Nothing to write.
        if !model.is_changed() {
            scope.commit().await?;
            return Ok(Some(existing));
        }

        let updated = model.update(scope.transaction()).await?;
        scope.commit().await?;
        Ok(Some(updated))
    }

    /// Deletes a transaction; `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, owner: OwnerId, id: TransactionId) -> Result<bool, RepositoryError> {
        let scope = OwnerScope::begin(&self.db, owner).await?;
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::AdminId.eq(owner.into_inner()))
            .filter(transactions::Column::Id.eq(id.into_inner()))
            .exec(scope.transaction())
            .await?;
        scope.commit().await?;
        Ok(result.rows_affected > 0)
    }
}

async fn find_owned(
    scope: &OwnerScope,
    owner: OwnerId,
    id: Uuid,
) -> Result<Option<transactions::Model>, RepositoryError> {
    Ok(transactions::Entity::find_by_id(id)
        .filter(transactions::Column::AdminId.eq(owner.into_inner()))
        .one(scope.transaction())
        .await?)
}
