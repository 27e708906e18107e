//! Middleware for protecting authenticated routes and handling authorization.
//!
//! Every gated router carries one [`Gate`]: the route's declared
//! [`AccessRequirement`] plus what is needed to resolve the caller. The gate
//! re-reads the user row on each request, so role and page edits apply to
//! the very next call.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::api::AppState;
use crate::auth::cookies::{clear_session_cookies, CookieSettings};
use crate::auth::errors::AuthError;
use crate::auth::models::{AccessRequirement, CurrentUser};
use crate::auth::service::{authorize, resolve_session};
use crate::database::Database;
use crate::errors::ApiError;

#[derive(Clone)]
pub struct Gate {
    db: Database,
    cookies: CookieSettings,
    requirement: Arc<AccessRequirement>,
}

impl Gate {
    pub fn new(state: &AppState, requirement: AccessRequirement) -> Self {
        Self {
            db: state.db.clone(),
            cookies: state.cookies.clone(),
            requirement: Arc::new(requirement),
        }
    }
}

/// Resolve the session, apply the gate's requirement and hand the user to
/// the handler as a [`CurrentUser`] extension.
pub async fn enforce(State(gate): State<Gate>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    let user = match resolve_session(&gate.db, request.headers()).await {
        Ok(user) => user,
        Err(AuthError::StaleSession) => {
            warn!(%path, "stale session cookie, clearing");
            let err = ApiError::from(AuthError::StaleSession);
            return (clear_session_cookies(&gate.cookies), err).into_response();
        }
        Err(err) => return ApiError::from(err).into_response(),
    };

    if let Err(err) = authorize(Some(&user), &gate.requirement) {
        debug!(%path, user_id = user.id, "access denied: {err}");
        return ApiError::from(err).into_response();
    }

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AuthError::NoSession.into())
    }
}
