//! Module for the label bucket browser API.
//!
//! Folder listing, key search and image retrieval, all behind the
//! `/s3-downloader` page key.

pub mod handlers;
pub mod routes;

pub use routes::storage_router;
