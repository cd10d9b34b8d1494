//! Mapping of domain errors onto JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use bahi_core::auth::AuthError;
use bahi_core::ledger::LedgerError;
use bahi_shared::AppError;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An [`AppError`] rendered as `{"error": code, "message": text}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_server_error() {
            error!(error = %err, "Request failed");
        }

        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": err.public_message(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self(match err {
            LedgerError::Validation(e) => AppError::Validation(e.to_string()),
            LedgerError::NotFound { .. } => AppError::NotFound(err.to_string()),
            LedgerError::Overflow => AppError::Internal(err.to_string()),
            LedgerError::Store(e) => AppError::Storage(e.to_string()),
        })
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(match err {
            AuthError::InvalidEmail | AuthError::UsernameTooLong => {
                AppError::Validation(err.to_string())
            }
            AuthError::Password(ref e) if e.is_policy_violation() => {
                AppError::Validation(err.to_string())
            }
            AuthError::Password(_) | AuthError::Token(_) => AppError::Internal(err.to_string()),
            AuthError::EmailTaken => AppError::Conflict(err.to_string()),
            AuthError::InvalidCredentials
            | AuthError::AccountDisabled
            | AuthError::InvalidToken
            | AuthError::UserNotFound => AppError::Unauthorized(err.to_string()),
            AuthError::Store(e) => AppError::Storage(e.to_string()),
        })
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bahi_core::ledger::ValidationError;
    use bahi_core::store::StoreError;
    use uuid::Uuid;

    #[test]
    fn test_ledger_error_mapping() {
        let ApiError(err) = LedgerError::Validation(ValidationError::EmptyName).into();
        assert_eq!(err.status_code(), 400);

        let ApiError(err) = LedgerError::customer_not_found(Uuid::now_v7()).into();
        assert_eq!(err.status_code(), 404);

        let ApiError(err) = LedgerError::Store(StoreError::Backend("connection refused".into())).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), "An error occurred");

        let ApiError(err) = LedgerError::Validation(ValidationError::TooLong {
            field: "name",
            max: 255,
        })
        .into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.public_message(), "name must be at most 255 characters");

        let ApiError(err) = LedgerError::Overflow.into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_auth_error_mapping() {
        let ApiError(err) = AuthError::EmailTaken.into();
        assert_eq!(err.status_code(), 409);

        let ApiError(err) = AuthError::InvalidCredentials.into();
        assert_eq!(err.status_code(), 401);

        let ApiError(err) = AuthError::InvalidEmail.into();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let ApiError(err) = AuthError::UsernameTooLong.into();
        assert_eq!(err.status_code(), 400);
    }
}
