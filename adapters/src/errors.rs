//! Custom error types specific to the `adapters` crate.
//!
//! This module defines errors that can occur while spawning a script,
//! waiting on it, or decoding what it printed, providing a unified error
//! handling mechanism for every script-backed feature.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// The interpreter could not be started at all.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Spawned, but collecting its output failed.
    #[error("failed to wait for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` timed out after {}s", .after.as_secs_f32())]
    Timeout { program: String, after: Duration },

    /// The script ran and exited non-zero. `message` is its stderr, or its
    /// stdout when nothing was written to stderr.
    #[error("script exited with code {code:?}: {message}")]
    NonZeroExit { code: Option<i32>, message: String },

    /// Exit code was zero but stdout did not match the expected payload.
    #[error("invalid script output: {0}")]
    InvalidOutput(String),

    /// Exit code was zero but the script printed an `{"error": ...}` payload.
    #[error("script reported an error: {0}")]
    Reported(String),
}

impl AdapterError {
    /// Whether a fresh attempt could plausibly succeed. Only failures that
    /// happen before the script produced an answer qualify.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AdapterError::Spawn { .. } | AdapterError::Wait { .. } | AdapterError::Timeout { .. }
        )
    }
}

pub type AdapterResult<T> = Result<T, AdapterError>;
