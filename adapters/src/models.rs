//! Generic data models for the `adapters` crate.
//!
//! These models describe a single script invocation, the raw output it
//! produced, and the typed payloads each feature script prints on stdout,
//! so the backend services work with a consistent data format.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{AdapterError, AdapterResult};

/// One run of `<interpreter> <script> <args...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInvocation {
    pub script: PathBuf,
    pub args: Vec<String>,
    /// Extra environment on top of the inherited one.
    pub env: Vec<(String, String)>,
}

impl ScriptInvocation {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Captured stdout of a script that exited successfully. Stderr is only
/// logged.
#[derive(Debug, Clone, Default)]
pub struct ScriptOutput {
    pub stdout: Vec<u8>,
}

impl ScriptOutput {
    pub fn text(&self) -> AdapterResult<&str> {
        std::str::from_utf8(&self.stdout)
            .map_err(|e| AdapterError::InvalidOutput(format!("stdout is not UTF-8: {e}")))
    }

    /// Decode stdout as JSON. A top-level `{"error": "..."}` object is the
    /// scripts' way of signalling failure and is surfaced as
    /// [`AdapterError::Reported`].
    pub fn json<T: DeserializeOwned>(&self) -> AdapterResult<T> {
        let value: serde_json::Value = serde_json::from_slice(&self.stdout)
            .map_err(|e| AdapterError::InvalidOutput(format!("stdout is not JSON: {e}")))?;

        if let Some(message) = value.get("error") {
            let message = match message.as_str() {
                Some(s) => s.to_string(),
                None => message.to_string(),
            };
            return Err(AdapterError::Reported(message));
        }

        serde_json::from_value(value)
            .map_err(|e| AdapterError::InvalidOutput(format!("unexpected JSON shape: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub buckets: Vec<BucketEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketEntry {
    pub name: String,
    pub object_count: ObjectCount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Either a key count or a marker such as `"Access Denied"` for buckets the
/// profile cannot list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectCount {
    Count(u64),
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketListing {
    pub folders: Vec<String>,
    pub files: Vec<String>,
}

/// Newest `.png` whose key contains the search term, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelImage {
    pub image_data: String,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stdout: &str) -> ScriptOutput {
        ScriptOutput {
            stdout: stdout.as_bytes().to_vec(),
        }
    }

    #[test]
    fn bucket_summary_accepts_counts_and_markers() {
        let summary: BucketSummary = output(
            r#"{"buckets":[{"name":"a","objectCount":3},{"name":"b","objectCount":"Access Denied","error":"nope"}]}"#,
        )
        .json()
        .unwrap();

        assert_eq!(summary.buckets[0].object_count, ObjectCount::Count(3));
        assert_eq!(
            summary.buckets[1].object_count,
            ObjectCount::Unavailable("Access Denied".into())
        );
        assert_eq!(summary.buckets[1].error.as_deref(), Some("nope"));
    }

    #[test]
    fn error_payload_is_reported() {
        let err = output(r#"{"error": "no credentials"}"#)
            .json::<BucketSummary>()
            .unwrap_err();
        assert!(matches!(err, AdapterError::Reported(ref m) if m == "no credentials"));
    }

    #[test]
    fn garbage_is_invalid_output() {
        let err = output("Traceback (most recent call last)").json::<BucketSummary>().unwrap_err();
        assert!(matches!(err, AdapterError::InvalidOutput(_)));

        let err = output(r#"{"folders": 1}"#).json::<BucketListing>().unwrap_err();
        assert!(matches!(err, AdapterError::InvalidOutput(_)));
    }

    #[test]
    fn non_utf8_text_is_invalid_output() {
        let out = ScriptOutput {
            stdout: vec![0xff, 0xfe],
        };
        assert!(matches!(out.text(), Err(AdapterError::InvalidOutput(_))));
    }
}
