//! Handler functions for the report endpoints.

use adapters::BucketSummary;
use axum::extract::State;
use axum::Json;

use crate::api::AppState;
use crate::errors::ApiResult;
use crate::services::LabelSummary;

pub async fn s3_summary(State(state): State<AppState>) -> ApiResult<Json<BucketSummary>> {
    Ok(Json(state.reports.s3_summary().await?))
}

/// Label reports for today (server local time) and the next working day.
pub async fn label_summary(State(state): State<AppState>) -> ApiResult<Json<LabelSummary>> {
    let today = chrono::Local::now().date_naive();
    Ok(Json(state.reports.label_summary(today).await?))
}
