//! Defines the HTTP routes for the label bucket browser.

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;

use super::handlers::{image, list, search};
use crate::api::AppState;
use crate::auth::middleware::{enforce, Gate};
use crate::auth::models::AccessRequirement;

pub const S3_DOWNLOADER_PAGE: &str = "/s3-downloader";

pub fn storage_router(state: &AppState) -> Router<AppState> {
    let gate = Gate::new(state, AccessRequirement::page(S3_DOWNLOADER_PAGE));

    Router::new()
        .route("/s3-downloader/list", get(list))
        .route("/s3-downloader/search", get(search))
        .route("/s3-downloader/image", get(image))
        .route_layer(from_fn_with_state(gate, enforce))
}
