//! Module for the script-backed report endpoints.
//!
//! Bucket summary and label summary, each gated by its own page key.

pub mod handlers;
pub mod routes;

pub use routes::reports_router;
