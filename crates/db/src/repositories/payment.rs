//! Payment repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use bahi_core::ledger::{NewPayment, PaymentPatch};
use bahi_shared::types::{CustomerId, OwnerId, PaymentId};

use super::{RepositoryError, ensure_customer};
use crate::entities::payments;
use crate::rls::OwnerScope;

/// Payment repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the owner's payments, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        owner: OwnerId,
        customer: Option<CustomerId>,
    ) -> Result<Vec<payments::Model>, RepositoryError> {
        let scope = OwnerScope::begin(&self.db, owner).await?;

        let mut query =
            payments::Entity::find().filter(payments::Column::AdminId.eq(owner.into_inner()));
        if let Some(customer) = customer {
            query = query.filter(payments::Column::CustomerId.eq(customer.into_inner()));
        }
        let rows = query
            .order_by_desc(payments::Column::PaymentDate)
            .order_by_desc(payments::Column::CreatedAt)
            .order_by_desc(payments::Column::Id)
            .all(scope.transaction())
            .await?;

        scope.commit().await?;
        Ok(rows)
    }

    /// Finds a payment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        owner: OwnerId,
        id: PaymentId,
    ) -> Result<Option<payments::Model>, RepositoryError> {
        let scope = OwnerScope::begin(&self.db, owner).await?;
        let row = find_owned(&scope, owner, id.into_inner()).await?;
        scope.commit().await?;
        Ok(row)
    }

    /// Records a payment from one of the owner's customers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::UnknownCustomer` if the customer does not
    /// exist, or a database error if the insert fails.
    pub async fn create(
        &self,
        owner: OwnerId,
        input: NewPayment,
    ) -> Result<payments::Model, RepositoryError> {
        let scope = OwnerScope::begin(&self.db, owner).await?;
        ensure_customer(scope.transaction(), owner.into_inner(), input.customer_id.into_inner()).await?;

        let payment = payments::ActiveModel {
            id: Set(PaymentId::new().into_inner()),
            admin_id: Set(owner.into_inner()),
            customer_id: Set(input.customer_id.into_inner()),
            amount: Set(input.amount),
            payment_method: Set(input.payment_method.into()),
            notes: Set(input.notes),
            payment_date: Set(input.payment_date),
            created_at: Set(Utc::now().into()),
        }
        .insert(scope.transaction())
        .await?;

        scope.commit().await?;
        Ok(payment)
    }

    /// Applies a patch; `None` if the payment does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::UnknownCustomer` if the patch moves the
    /// payment to a customer the owner does not have.
    pub async fn update(
        &self,
        owner: OwnerId,
        id: PaymentId,
        patch: PaymentPatch,
    ) -> Result<Option<payments::Model>, RepositoryError> {
        let scope = OwnerScope::begin(&self.db, owner).await?;

        let Some(existing) = find_owned(&scope, owner, id.into_inner()).await? else {
            return Ok(None);
        };

        let mut model = existing.clone().into_active_model();
        if let Some(customer_id) = patch.customer_id {
            ensure_customer(scope.transaction(), owner.into_inner(), customer_id.into_inner()).await?;
            model.customer_id = Set(customer_id.into_inner());
        }
        if let Some(amount) = patch.amount {
            model.amount = Set(amount);
        }
        if let Some(method) = patch.payment_method {
            model.payment_method = Set(method.into());
        }
        if let Some(notes) = patch.notes {
            model.notes = Set(notes);
        }
        if let Some(date) = patch.payment_date {
            model.payment_date = Set(date);
        }

        if !model.is_changed() {
            scope.commit().await?;
            return Ok(Some(existing));
        }

        let updated = model.update(scope.transaction()).await?;
        scope.commit().await?;
        Ok(Some(updated))
    }

    /// Deletes a payment; `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, owner: OwnerId, id: PaymentId) -> Result<bool, RepositoryError> {
        let scope = OwnerScope::begin(&self.db, owner).await?;
        let result = payments::Entity::delete_many()
            .filter(payments::Column::AdminId.eq(owner.into_inner()))
            .filter(payments::Column::Id.eq(id.into_inner()))
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
) -> Result<Option<payments::Model>, RepositoryError> {
    Ok(payments::Entity::find_by_id(id)
        .filter(payments::Column::AdminId.eq(owner.into_inner()))
        .one(scope.transaction())
        .await?)
}
