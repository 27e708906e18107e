//! Report orchestration over the script adapters.
//!
//! Owns one adapter per script and turns their results into API payloads.
//! The label summary fans out two script runs and only answers when both
//! succeed.

use std::sync::Arc;

use adapters::labels::DATE_FORMAT;
use adapters::{
    BucketBrowserAdapter, BucketListing, BucketQuery, BucketSummary, BucketSummaryAdapter,
    LabelImage, LabelReportAdapter, ScriptRunner, SearchHit,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::ScriptSettings;
use crate::errors::ApiResult;
use crate::services::calendar::next_working_day;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSummary {
    pub today_date: String,
    pub today_report: String,
    pub next_day_date: String,
    pub next_day_report: String,
}

pub struct ReportService {
    summary: BucketSummaryAdapter,
    labels: LabelReportAdapter,
    browser: BucketBrowserAdapter,
}

impl ReportService {
    pub fn new(runner: Arc<dyn ScriptRunner>, settings: &ScriptSettings) -> Self {
        Self {
            summary: BucketSummaryAdapter::new(
                Arc::clone(&runner),
                &settings.s3_summary,
                &settings.aws_profile,
            ),
            labels: LabelReportAdapter::new(
                Arc::clone(&runner),
                &settings.label_report,
                &settings.aws_profile,
            ),
            browser: BucketBrowserAdapter::new(runner, &settings.s3_downloader),
        }
    }

    pub async fn s3_summary(&self) -> ApiResult<BucketSummary> {
        let summary = self.summary.summary().await?;
        info!(buckets = summary.buckets.len(), "bucket summary fetched");
        Ok(summary)
    }

    /// Reports for `today` and the following working day, run concurrently.
    /// The first failure wins and the other run is dropped.
    #[instrument(skip(self))]
    pub async fn label_summary(&self, today: NaiveDate) -> ApiResult<LabelSummary> {
        let next_day = next_working_day(today);

        let (today_report, next_day_report) = tokio::try_join!(
            self.labels.report_for(today),
            self.labels.report_for(next_day),
        )?;

        Ok(LabelSummary {
            today_date: today.format(DATE_FORMAT).to_string(),
            today_report,
            next_day_date: next_day.format(DATE_FORMAT).to_string(),
            next_day_report,
        })
    }

    pub async fn list(&self, query: &BucketQuery, prefix: &str) -> ApiResult<BucketListing> {
        Ok(self.browser.list(query, prefix).await?)
    }

    pub async fn search(&self, query: &BucketQuery, prefix: &str, term: &str) -> ApiResult<SearchHit> {
        Ok(self.browser.search(query, prefix, term).await?)
    }

    pub async fn image(&self, query: &BucketQuery, key: &str) -> ApiResult<LabelImage> {
        Ok(self.browser.image(query, key).await?)
    }
}
