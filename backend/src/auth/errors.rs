//! Custom error types specific to authentication failures.
//!
//! This module defines the errors that can occur while resolving a session
//! or checking a route's access requirement, and how each maps onto the
//! global `ApiError` responses.

use thiserror::Error;

use crate::database::DbError;
use crate::errors::{ApiError, ForbiddenReason};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unauthorized: No user logged in")]
    NoSession,

    /// The `userId` cookie points at nothing usable. Cookies must be cleared.
    #[error("Unauthorized: User not found")]
    StaleSession,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Denied(ForbiddenReason),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] DbError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NoSession | AuthError::StaleSession | AuthError::InvalidCredentials => {
                ApiError::Unauthenticated(err.to_string())
            }
            AuthError::Denied(reason) => ApiError::Forbidden(reason),
            AuthError::Hashing(msg) => ApiError::Internal(msg),
            AuthError::Store(db) => db.into(),
        }
    }
}
