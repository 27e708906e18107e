//! Module for core business logic services.
//!
//! This module encapsulates the operations behind the API handlers: admin
//! account management, report orchestration over the script adapters, and
//! the working-day calendar the label reports depend on.

pub mod calendar;
pub mod reports;
pub mod user_admin;

pub use reports::{LabelSummary, ReportService};
