//! S3 adapters: the bucket summary script and the label bucket browser.
//!
//! Both talk to S3 only through their scripts. This file owns the argument
//! layout each script expects and decodes the JSON each one prints.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::AdapterResult;
use crate::models::{BucketListing, BucketSummary, LabelImage, ScriptInvocation, SearchHit};
use crate::ScriptRunner;

const ENV_PROFILE: &str = "AWS_PROFILE";
const ENV_REGION: &str = "AWS_REGION";

/// Lists every bucket visible to a profile along with its object count.
#[derive(Clone)]
pub struct BucketSummaryAdapter {
    runner: Arc<dyn ScriptRunner>,
    script: PathBuf,
    profile: String,
}

impl BucketSummaryAdapter {
    pub fn new(runner: Arc<dyn ScriptRunner>, script: impl Into<PathBuf>, profile: impl Into<String>) -> Self {
        Self {
            runner,
            script: script.into(),
            profile: profile.into(),
        }
    }

    pub async fn summary(&self) -> AdapterResult<BucketSummary> {
        let invocation = ScriptInvocation::new(&self.script).env(ENV_PROFILE, &self.profile);
        self.runner.run(&invocation).await?.json()
    }
}

/// Connection parameters shared by every browser command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketQuery {
    pub bucket: String,
    pub profile: Option<String>,
    pub region: Option<String>,
}

impl BucketQuery {
    fn invocation(&self, script: &Path, command: &str) -> ScriptInvocation {
        let mut invocation = ScriptInvocation::new(script).arg(command).arg(&self.bucket);
        if let Some(profile) = self.profile.as_deref().filter(|p| !p.is_empty()) {
            invocation = invocation.env(ENV_PROFILE, profile);
        }
        if let Some(region) = self.region.as_deref().filter(|r| !r.is_empty()) {
            invocation = invocation.env(ENV_REGION, region);
        }
        invocation
    }
}

/// Folder navigation, search and image retrieval over the label bucket.
#[derive(Clone)]
pub struct BucketBrowserAdapter {
    runner: Arc<dyn ScriptRunner>,
    script: PathBuf,
}

impl BucketBrowserAdapter {
    pub fn new(runner: Arc<dyn ScriptRunner>, script: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            script: script.into(),
        }
    }

    /// Immediate sub-folders and files under `prefix`.
    pub async fn list(&self, query: &BucketQuery, prefix: &str) -> AdapterResult<BucketListing> {
        let mut invocation = query.invocation(&self.script, "list");
        if !prefix.is_empty() {
            invocation = invocation.arg(prefix);
        }
        self.runner.run(&invocation).await?.json()
    }

    /// Newest PNG under `prefix` whose key contains `term`.
    pub async fn search(&self, query: &BucketQuery, prefix: &str, term: &str) -> AdapterResult<SearchHit> {
        let invocation = query.invocation(&self.script, "search").arg(prefix).arg(term);
        let hit: Option<SearchHit> = self.runner.run(&invocation).await?.json()?;
        Ok(hit.unwrap_or(SearchHit { key: None }))
    }

    pub async fn image(&self, query: &BucketQuery, key: &str) -> AdapterResult<LabelImage> {
        let invocation = query.invocation(&self.script, "get_image").arg(key);
        self.runner.run(&invocation).await?.json()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::errors::AdapterError;
    use crate::models::ScriptOutput;

    /// Replays a canned stdout and records every invocation.
    pub(crate) struct Canned {
        pub stdout: String,
        pub seen: Mutex<Vec<ScriptInvocation>>,
    }

    impl Canned {
        pub(crate) fn new(stdout: &str) -> Arc<Self> {
            Arc::new(Self {
                stdout: stdout.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ScriptRunner for Canned {
        async fn run(&self, invocation: &ScriptInvocation) -> AdapterResult<ScriptOutput> {
            self.seen.lock().unwrap().push(invocation.clone());
            Ok(ScriptOutput {
                stdout: self.stdout.clone().into_bytes(),
            })
        }
    }

    #[tokio::test]
    async fn summary_passes_profile_through_env() {
        let runner = Canned::new(r#"{"buckets": []}"#);
        let adapter = BucketSummaryAdapter::new(runner.clone(), "s3_utils.py", "gateway");

        let summary = adapter.summary().await.unwrap();

        assert!(summary.buckets.is_empty());
        let seen = runner.seen.lock().unwrap();
        assert!(seen[0].args.is_empty());
        assert_eq!(seen[0].env, vec![("AWS_PROFILE".to_string(), "gateway".to_string())]);
    }

    #[tokio::test]
    async fn list_omits_empty_prefix_and_blank_credentials() {
        let runner = Canned::new(r#"{"folders": ["2024/"], "files": []}"#);
        let adapter = BucketBrowserAdapter::new(runner.clone(), "s3_downloader_api.py");
        let query = BucketQuery {
            bucket: "pat-labels".into(),
            profile: Some(String::new()),
            region: Some("eu-west-2".into()),
        };

        let listing = adapter.list(&query, "").await.unwrap();

        assert_eq!(listing.folders, vec!["2024/".to_string()]);
        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen[0].args, vec!["list".to_string(), "pat-labels".to_string()]);
        assert_eq!(seen[0].env, vec![("AWS_REGION".to_string(), "eu-west-2".to_string())]);
    }

    #[tokio::test]
    async fn search_without_match_yields_empty_hit() {
        let runner = Canned::new("null");
        let adapter = BucketBrowserAdapter::new(runner.clone(), "s3_downloader_api.py");
        let query = BucketQuery {
            bucket: "pat-labels".into(),
            ..Default::default()
        };

        let hit = adapter.search(&query, "2024/01/", "ABC").await.unwrap();

        assert_eq!(hit.key, None);
        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen[0].args, vec!["search", "pat-labels", "2024/01/", "ABC"]);
    }

    #[tokio::test]
    async fn image_error_payload_is_reported() {
        let runner = Canned::new(r#"{"error": "NoSuchKey"}"#);
        let adapter = BucketBrowserAdapter::new(runner, "s3_downloader_api.py");
        let query = BucketQuery {
            bucket: "pat-labels".into(),
            ..Default::default()
        };

        let err = adapter.image(&query, "missing.png").await.unwrap_err();
        assert!(matches!(err, AdapterError::Reported(_)));
    }
}
