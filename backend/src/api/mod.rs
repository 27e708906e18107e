//! Central module for organizing the application's API endpoints.
//!
//! This module owns the shared [`AppState`], the JSON/query/path extractors
//! that report malformed input as `ApiError`, and [`router`], which mounts
//! every route under `/api` with its access requirement.

pub mod reports;
pub mod storage;
pub mod user;

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts};
use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Json, Router};

use crate::auth::cookies::CookieSettings;
use crate::auth::models::MessageResponse;
use crate::auth::routes::auth_router;
use crate::database::Database;
use crate::errors::ApiError;
use crate::middleware::log_requests;
use crate::services::ReportService;

/// Everything a handler may need, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub cookies: CookieSettings,
    pub reports: Arc<ReportService>,
    pub bcrypt_cost: u32,
}

/// `Json` whose rejection is a 400 in the API's error format.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

async fn public_data() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "This is public data.",
    })
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth_router())
        .route("/public", get(public_data))
        .merge(user::admin_router(&state))
        .merge(reports::reports_router(&state))
        .merge(storage::storage_router(&state));

    Router::new()
        .nest("/api", api)
        .layer(from_fn(log_requests))
        .with_state(state)
}
