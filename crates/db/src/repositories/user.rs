//! User repository for database operations.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use bahi_core::auth::NewUser;
use bahi_shared::types::OwnerId;

use super::RepositoryError;
use crate::entities::users;

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, RepositoryError> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: OwnerId) -> Result<Option<users::Model>, RepositoryError> {
        Ok(users::Entity::find_by_id(id.into_inner()).one(&self.db).await?)
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub async fn create(&self, input: NewUser) -> Result<users::Model, RepositoryError> {
        let now = Utc::now().into();

        let user = users::ActiveModel {
            id: Set(OwnerId::new().into_inner()),
            email: Set(input.email),
            username: Set(input.username),
            password_hash: Set(input.password_hash),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(&self.db).await?)
    }
}
