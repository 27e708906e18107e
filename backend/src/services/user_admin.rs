//! Account management performed by administrators.
//!
//! Validates admin requests, hashes passwords, and guards against an admin
//! locking themselves out before anything reaches the store.

use serde::Deserialize;
use tracing::info;

use crate::auth::models::{Role, User};
use crate::auth::service::hash_password;
use crate::database::models::{normalize_pages, NewUser, UserChanges};
use crate::database::{queries, Database};
use crate::errors::{ApiError, ApiResult, ForbiddenReason};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub allowed_pages: Option<Vec<String>>,
}

/// Every field optional; empty strings count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub allowed_pages: Option<Vec<String>>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_role(raw: &str) -> ApiResult<Role> {
    raw.parse()
        .map_err(|_| ApiError::Validation("Invalid role specified".into()))
}

pub async fn list_users(db: &Database) -> ApiResult<Vec<User>> {
    Ok(queries::list_users(db).await?)
}

pub async fn create_user(db: &Database, bcrypt_cost: u32, request: CreateUserRequest) -> ApiResult<User> {
    let (Some(username), Some(password), Some(role)) = (
        present(request.username),
        present(request.password),
        present(request.role),
    ) else {
        return Err(ApiError::Validation(
            "Username, password, and role are required".into(),
        ));
    };
    let role = parse_role(&role)?;

    let password_hash = hash_password(&password, bcrypt_cost).await?;
    let user = queries::insert_user(
        db,
        NewUser {
            username,
            password_hash,
            role,
            allowed_pages: normalize_pages(request.allowed_pages.unwrap_or_default()),
        },
    )
    .await?;

    info!(user_id = user.id, username = %user.username, role = %user.role, "user created");
    Ok(user)
}

/// Apply a partial update on behalf of `actor`.
pub async fn update_user(
    db: &Database,
    bcrypt_cost: u32,
    actor: &User,
    id: i64,
    request: UpdateUserRequest,
) -> ApiResult<User> {
    let role = present(request.role).map(|r| parse_role(&r)).transpose()?;

    if id == actor.id && role.is_some_and(|r| r != Role::Admin) {
        return Err(ApiError::Forbidden(ForbiddenReason::SelfDemotion));
    }

    let password_hash = match present(request.password) {
        Some(password) => Some(hash_password(&password, bcrypt_cost).await?),
        None => None,
    };
    let changes = UserChanges {
        username: present(request.username),
        password_hash,
        role,
        allowed_pages: request.allowed_pages.map(normalize_pages),
    };
    if changes.is_empty() {
        return Err(ApiError::Validation("No fields to update".into()));
    }

    let user = queries::update_user(db, id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(user_id = id, actor = actor.id, "user updated");
    Ok(user)
}

pub async fn delete_user(db: &Database, actor: &User, id: i64) -> ApiResult<()> {
    if id == actor.id {
        return Err(ApiError::Forbidden(ForbiddenReason::SelfDelete));
    }
    if !queries::delete_user(db, id).await? {
        return Err(ApiError::NotFound("User not found".into()));
    }

    info!(user_id = id, actor = actor.id, "user deleted");
    Ok(())
}
