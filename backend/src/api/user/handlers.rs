//! Handler functions for the account administration endpoints.
//!
//! These functions parse request data and hand it to
//! `services::user_admin`, which owns validation and the self-protection
//! rules.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::{ApiJson, ApiPath, AppState};
use crate::auth::models::{CurrentUser, MessageResponse, User};
use crate::errors::ApiResult;
use crate::services::user_admin::{self, CreateUserRequest, UpdateUserRequest};

#[derive(Debug, Serialize)]
pub struct AdminGreeting {
    pub message: &'static str,
    pub user: User,
}

pub async fn admin_data(CurrentUser(user): CurrentUser) -> Json<AdminGreeting> {
    Json(AdminGreeting {
        message: "This is admin-only data.",
        user,
    })
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(user_admin::list_users(&state.db).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = user_admin::create_user(&state.db, state.bcrypt_cost, request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let user = user_admin::update_user(&state.db, state.bcrypt_cost, &actor, id, request).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    user_admin::delete_user(&state.db, &actor, id).await?;
    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}
