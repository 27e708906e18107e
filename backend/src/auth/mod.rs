//! Authentication module for managing sessions and access control.
//!
//! This module provides the public interface for login, logout and session
//! checks, the cookie session format, and the access gate every protected
//! route sits behind.

pub mod cookies;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;

// Re-exports for convenience
pub use errors::AuthError;
pub use middleware::{enforce, Gate};
pub use models::*;
pub use routes::auth_router;
pub use service::{authorize, resolve_session};
