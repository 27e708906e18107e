//! Module for the account administration API.
//!
//! Everything here sits behind the `ADMIN` role requirement: listing,
//! creating, editing and deleting user accounts.

pub mod handlers;
pub mod routes;

pub use routes::admin_router;
