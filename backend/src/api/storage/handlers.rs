//! Handler functions for the label bucket browser.
//!
//! Each request names the bucket and, optionally, the AWS profile and
//! region to use; those travel to the script untouched.

use adapters::{BucketListing, BucketQuery, LabelImage, SearchHit};
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::{ApiQuery, AppState};
use crate::errors::{ApiError, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct BrowseParams {
    pub bucket: Option<String>,
    pub profile: Option<String>,
    pub region: Option<String>,
    pub prefix: Option<String>,
    pub term: Option<String>,
    pub key: Option<String>,
}

fn required(value: Option<String>, name: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(format!("Missing required parameter: {name}")))
}

impl BrowseParams {
    fn bucket_query(&mut self) -> ApiResult<BucketQuery> {
        Ok(BucketQuery {
            bucket: required(self.bucket.take(), "bucket")?,
            profile: self.profile.take(),
            region: self.region.take(),
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(mut params): ApiQuery<BrowseParams>,
) -> ApiResult<Json<BucketListing>> {
    let query = params.bucket_query()?;
    let prefix = params.prefix.unwrap_or_default();
    Ok(Json(state.reports.list(&query, &prefix).await?))
}

pub async fn search(
    State(state): State<AppState>,
    ApiQuery(mut params): ApiQuery<BrowseParams>,
) -> ApiResult<Json<SearchHit>> {
    let query = params.bucket_query()?;
    let term = required(params.term, "term")?;
    let prefix = params.prefix.unwrap_or_default();
    Ok(Json(state.reports.search(&query, &prefix, &term).await?))
}

pub async fn image(
    State(state): State<AppState>,
    ApiQuery(mut params): ApiQuery<BrowseParams>,
) -> ApiResult<Json<LabelImage>> {
    let query = params.bucket_query()?;
    let key = required(params.key, "key")?;
    Ok(Json(state.reports.image(&query, &key).await?))
}
