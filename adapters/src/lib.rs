//! Core `adapters` crate for invoking the external report and storage scripts.
//!
//! This crate defines the `ScriptRunner` trait, which abstracts "run this
//! script with these arguments and hand back what it printed", a
//! process-backed implementation, and the typed adapters built on top of it
//! (bucket summary, label report, bucket browser).

pub mod errors;
pub mod labels;
pub mod models;
pub mod process;
pub mod s3;

use async_trait::async_trait;

pub use errors::{AdapterError, AdapterResult};
pub use labels::LabelReportAdapter;
pub use models::*;
pub use process::ProcessRunner;
pub use s3::{BucketBrowserAdapter, BucketQuery, BucketSummaryAdapter};

/// Runs a script to completion.
///
/// Implementations return `Ok` only for a zero exit status; a non-zero exit
/// is an [`AdapterError::NonZeroExit`] carrying the captured stderr.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn run(&self, invocation: &ScriptInvocation) -> AdapterResult<ScriptOutput>;
}
