//! Defines the HTTP routes for the report endpoints.

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;

use super::handlers::{label_summary, s3_summary};
use crate::api::AppState;
use crate::auth::middleware::{enforce, Gate};
use crate::auth::models::AccessRequirement;

pub const S3_SUMMARY_PAGE: &str = "/s3-summary";
pub const LABEL_SUMMARY_PAGE: &str = "/label-summary";

pub fn reports_router(state: &AppState) -> Router<AppState> {
    let summary = Router::new()
        .route("/s3-summary", get(s3_summary))
        .route_layer(from_fn_with_state(
            Gate::new(state, AccessRequirement::page(S3_SUMMARY_PAGE)),
            enforce,
        ));

    let labels = Router::new()
        .route("/label-summary", get(label_summary))
        .route_layer(from_fn_with_state(
            Gate::new(state, AccessRequirement::page(LABEL_SUMMARY_PAGE)),
            enforce,
        ));

    summary.merge(labels)
}
