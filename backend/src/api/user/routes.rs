//! Defines the HTTP routes for account administration.

use axum::middleware::from_fn_with_state;
use axum::routing::{get, put};
use axum::Router;

use super::handlers::{admin_data, create_user, delete_user, list_users, update_user};
use crate::api::AppState;
use crate::auth::middleware::{enforce, Gate};
use crate::auth::models::{AccessRequirement, Role};

pub fn admin_router(state: &AppState) -> Router<AppState> {
    let gate = Gate::new(state, AccessRequirement::role(Role::Admin));

    Router::new()
        .route("/admin", get(admin_data))
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/:id", put(update_user).delete(delete_user))
        .route_layer(from_fn_with_state(gate, enforce))
}
