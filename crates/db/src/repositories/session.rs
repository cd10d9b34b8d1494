//! Session repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};

use bahi_core::auth::NewSession;
use bahi_shared::types::{OwnerId, SessionId};

use super::RepositoryError;
use crate::entities::sessions;

/// Session repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: NewSession) -> Result<sessions::Model, RepositoryError> {
        let session = sessions::ActiveModel {
            id: Set(SessionId::new().into_inner()),
            user_id: Set(input.user_id.into_inner()),
            refresh_token_hash: Set(input.refresh_token_hash),
            expires_at: Set(input.expires_at.into()),
            revoked_at: Set(None),
            created_at: Set(Utc::now().into()),
        };

        Ok(session.insert(&self.db).await?)
    }

    /// Finds a live session by refresh token hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<sessions::Model>, RepositoryError> {
        Ok(sessions::Entity::find()
            .filter(sessions::Column::RefreshTokenHash.eq(token_hash))
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await?)
    }

    /// Revokes a session; `false` if it was unknown or already revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke(&self, id: SessionId) -> Result<bool, RepositoryError> {
        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::RevokedAt, Expr::value(Utc::now()))
            .filter(sessions::Column::Id.eq(id.into_inner()))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Revokes all sessions for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke_all_user_sessions(&self, user_id: OwnerId) -> Result<u64, RepositoryError> {
        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::RevokedAt, Expr::value(Utc::now()))
            .filter(sessions::Column::UserId.eq(user_id.into_inner()))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
