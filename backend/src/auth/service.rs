//! Core business logic for the authentication system.
//!
//! This service handles password hashing, credential checks, turning a
//! request's cookies back into a user, and the access decision every gated
//! route goes through. It orchestrates interactions between handlers and
//! the database.

use axum::http::HeaderMap;
use tracing::{debug, instrument};

use crate::auth::cookies::{read_cookie, USER_ID_COOKIE};
use crate::auth::errors::AuthError;
use crate::auth::models::{AccessRequirement, User};
use crate::database::{queries, Database};
use crate::errors::ForbiddenReason;

/// Hash a password with bcrypt on the blocking pool.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        bcrypt::hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::Hashing(format!("task join error: {e}")))?
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || {
        bcrypt::verify(password, &hash).map_err(|e| AuthError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::Hashing(format!("task join error: {e}")))?
}

/// Check a username/password pair. Unknown users and wrong passwords are
/// indistinguishable to the caller.
#[instrument(skip(db, password))]
pub async fn authenticate(db: &Database, username: &str, password: &str) -> Result<User, AuthError> {
    let Some(user) = queries::find_by_username(db, username).await? else {
        debug!("login for unknown user");
        return Err(AuthError::InvalidCredentials);
    };

    if verify_password(password, &user.password_hash).await? {
        Ok(user)
    } else {
        debug!(user_id = user.id, "login with wrong password");
        Err(AuthError::InvalidCredentials)
    }
}

/// Map the request's `userId` cookie to the stored user.
///
/// The `role` cookie is ignored: role and pages always come from the row.
/// Returns [`AuthError::StaleSession`] when the cookie is unparseable or the
/// user no longer exists, so the caller can clear the cookies.
pub async fn resolve_session(db: &Database, headers: &HeaderMap) -> Result<User, AuthError> {
    let raw = read_cookie(headers, USER_ID_COOKIE).ok_or(AuthError::NoSession)?;
    let id: i64 = raw.trim().parse().map_err(|_| AuthError::StaleSession)?;

    queries::find_by_id(db, id).await?.ok_or(AuthError::StaleSession)
}

/// Decide whether `user` may use a route declaring `requirement`.
///
/// Evaluated in order: no session, admin bypass, role, page.
pub fn authorize(user: Option<&User>, requirement: &AccessRequirement) -> Result<(), AuthError> {
    let user = user.ok_or(AuthError::NoSession)?;

    if user.is_admin() {
        return Ok(());
    }

    if let Some(role) = requirement.required_role {
        if user.role != role {
            return Err(AuthError::Denied(ForbiddenReason::InsufficientRole));
        }
    }

    if let Some(page) = requirement.required_page.as_deref() {
        if !user.can_view(page) {
            return Err(AuthError::Denied(ForbiddenReason::PageDenied));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::header::COOKIE;
    use axum::http::HeaderValue;

    use super::*;
    use crate::auth::models::Role;
    use crate::database::models::NewUser;

    fn user(role: Role, pages: &[&str]) -> User {
        User {
            id: 1,
            username: "someone".into(),
            password_hash: String::new(),
            role,
            allowed_pages: pages.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn requirements() -> Vec<AccessRequirement> {
        vec![
            AccessRequirement::default(),
            AccessRequirement::role(Role::Admin),
            AccessRequirement::role(Role::User),
            AccessRequirement::page("/s3-summary"),
            AccessRequirement {
                required_role: Some(Role::Admin),
                required_page: Some("/nowhere".into()),
            },
        ]
    }

    #[test]
    fn admin_passes_every_requirement() {
        let admin = user(Role::Admin, &[]);
        for requirement in requirements() {
            assert!(authorize(Some(&admin), &requirement).is_ok(), "{requirement:?}");
        }
    }

    #[test]
    fn missing_session_is_rejected_first() {
        for requirement in requirements() {
            assert!(matches!(authorize(None, &requirement), Err(AuthError::NoSession)));
        }
    }

    #[test]
    fn non_admin_never_passes_admin_role() {
        let regular = user(Role::User, &["/admin", "/page1"]);
        let err = authorize(Some(&regular), &AccessRequirement::role(Role::Admin)).unwrap_err();
        assert!(matches!(err, AuthError::Denied(ForbiddenReason::InsufficientRole)));
    }

    #[test]
    fn page_access_follows_allowed_pages() {
        let requirement = AccessRequirement::page("/label-summary");

        let allowed = user(Role::User, &["/home", "/label-summary"]);
        assert!(authorize(Some(&allowed), &requirement).is_ok());

        let denied = user(Role::User, &["/home", "/label-summary-old"]);
        let err = authorize(Some(&denied), &requirement).unwrap_err();
        assert!(matches!(err, AuthError::Denied(ForbiddenReason::PageDenied)));
    }

    #[test]
    fn role_is_checked_before_page() {
        let regular = user(Role::User, &[]);
        let requirement = AccessRequirement {
            required_role: Some(Role::Admin),
            required_page: Some("/x".into()),
        };
        let err = authorize(Some(&regular), &requirement).unwrap_err();
        assert!(matches!(err, AuthError::Denied(ForbiddenReason::InsufficientRole)));
    }

    async fn db_with_user(role: Role) -> (Database, User) {
        let db = Database::open_in_memory().unwrap();
        let user = queries::insert_user(
            &db,
            NewUser {
                username: "ops".into(),
                password_hash: hash_password("hunter22", 4).await.unwrap(),
                role,
                allowed_pages: vec![],
            },
        )
        .await
        .unwrap();
        (db, user)
    }

    fn cookies(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static(value));
        headers
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let (db, created) = db_with_user(Role::User).await;

        let user = authenticate(&db, "ops", "hunter22").await.unwrap();
        assert_eq!(user.id, created.id);

        assert!(matches!(
            authenticate(&db, "ops", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            authenticate(&db, "ghost", "hunter22").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn session_uses_stored_role_not_cookie() {
        let (db, created) = db_with_user(Role::User).await;
        let header = format!("userId={}; role=ADMIN", created.id);
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(&header).unwrap());

        let user = resolve_session(&db, &headers).await.unwrap();

        assert_eq!(user.role, Role::User);
        assert!(authorize(Some(&user), &AccessRequirement::role(Role::Admin)).is_err());
    }

    #[tokio::test]
    async fn session_without_cookie_is_no_session() {
        let (db, _) = db_with_user(Role::User).await;
        assert!(matches!(
            resolve_session(&db, &HeaderMap::new()).await,
            Err(AuthError::NoSession)
        ));
    }

    #[tokio::test]
    async fn session_for_missing_or_garbled_id_is_stale() {
        let (db, _) = db_with_user(Role::User).await;
        assert!(matches!(
            resolve_session(&db, &cookies("userId=999")).await,
            Err(AuthError::StaleSession)
        ));
        assert!(matches!(
            resolve_session(&db, &cookies("userId=abc")).await,
            Err(AuthError::StaleSession)
        ));
    }
}
