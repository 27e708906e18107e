//! Handler functions for authentication-related API endpoints.
//!
//! These functions process login, logout and session checks: they parse
//! request data, validate input, and call into `auth::service` for the
//! credential and session logic.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use crate::api::{ApiJson, AppState};
use crate::auth::cookies::{clear_session_cookies, session_cookies};
use crate::auth::errors::AuthError;
use crate::auth::models::{AuthStatus, LoginRequest, LoginResponse, MessageResponse};
use crate::auth::service;
use crate::errors::{ApiError, ApiResult};

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<Response> {
    if body.username.is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation("Username and password are required".into()));
    }

    let user = service::authenticate(&state.db, &body.username, &body.password).await?;
    info!(user_id = user.id, username = %user.username, "login");

    let response = LoginResponse {
        message: "Login successful",
        role: user.role,
    };
    Ok((session_cookies(&user, &state.cookies), Json(response)).into_response())
}

/// Reports the caller's session. Never fails for a missing session; a stale
/// one gets its cookies cleared.
pub async fn check_auth(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    match service::resolve_session(&state.db, &headers).await {
        Ok(user) => Ok(Json(AuthStatus::from(&user)).into_response()),
        Err(AuthError::NoSession) => Ok(Json(AuthStatus::anonymous()).into_response()),
        Err(AuthError::StaleSession) => Ok((
            clear_session_cookies(&state.cookies),
            Json(AuthStatus::anonymous()),
        )
            .into_response()),
        Err(err) => Err(err.into()),
    }
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        clear_session_cookies(&state.cookies),
        Json(MessageResponse {
            message: "Logout successful",
        }),
    )
}
