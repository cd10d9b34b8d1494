//! Authentication routes for register, login, refresh and logout.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tracing::info;

use bahi_shared::auth::{
    LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RegisterRequest, UserInfo,
};

use crate::{AppState, error::ApiResult, extractors::Json, middleware::AuthUser};

/// Public session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// Routes that need a valid access token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/logout-all", post(logout_all))
}

/// Response for a refreshed access token.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token.
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

/// Response for revoking every session of an owner.
#[derive(Debug, Serialize)]
pub struct LogoutAllResponse {
    /// Sessions that were still live.
    pub revoked_sessions: u64,
}

/// POST /auth/register - Register a new owner.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user.info())))
}

/// POST /auth/login - Authenticate and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (user, tokens) = state.auth.login(payload).await?;
    Ok(Json(LoginResponse {
        user: user.info(),
        tokens,
    }))
}

/// POST /auth/refresh - Exchange a refresh token for an access token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let issued = state.auth.refresh(&payload.refresh_token).await?;
    Ok(Json(RefreshResponse {
        access_token: issued.token,
        expires_in: state.jwt().access_token_expires_in(),
    }))
}

/// POST /auth/logout - Revoke the session behind a refresh token.
///
/// Always 204; an unknown or already revoked token is not an error.
async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> ApiResult<StatusCode> {
    if !state.auth.logout(&payload.refresh_token).await? {
        info!("Logout with no live session");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /auth/logout-all - Revoke every live session of the caller.
async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<LogoutAllResponse>> {
    let revoked_sessions = state.auth.logout_all(auth.owner_id()).await?;
    Ok(Json(LogoutAllResponse { revoked_sessions }))
}

/// GET /auth/me - The authenticated owner.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserInfo>> {
    let user = state.auth.current_user(auth.owner_id()).await?;
    Ok(Json(user.info()))
}
