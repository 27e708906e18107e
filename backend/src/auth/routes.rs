//! Defines the HTTP routes specifically for authentication.
//!
//! Login, logout and session checks are public: they resolve the session
//! themselves instead of sitting behind the access gate.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{check_auth, login, logout};
use crate::api::AppState;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/check-auth", get(check_auth))
        .route("/logout", post(logout))
}
