//! HTTP backend for the internal operations portal.
//!
//! Cookie sessions over a SQLite user table, a page-level access policy,
//! admin account management, and report endpoints backed by external
//! scripts through the `adapters` crate.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod logging;
pub mod middleware;
pub mod services;
