//! Session cookie handling.
//!
//! A session is two HttpOnly cookies: `userId`, which the server trusts only
//! as a lookup key, and `role`, which the front end may read for display.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderName};
use axum::response::AppendHeaders;
use cookie::time::OffsetDateTime;
use cookie::{Cookie, SameSite};

use crate::auth::models::User;

pub const USER_ID_COOKIE: &str = "userId";
pub const ROLE_COOKIE: &str = "role";

#[derive(Debug, Clone, Default)]
pub struct CookieSettings {
    /// Set the `Secure` flag; enable whenever the service sits behind TLS.
    pub secure: bool,
}

fn build(name: &'static str, value: String, settings: &CookieSettings) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .build()
}

fn expired(name: &'static str, settings: &CookieSettings) -> Cookie<'static> {
    let mut cookie = build(name, String::new(), settings);
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
    cookie
}

pub type SetCookies = AppendHeaders<[(HeaderName, String); 2]>;

/// `Set-Cookie` headers establishing a session for `user`.
pub fn session_cookies(user: &User, settings: &CookieSettings) -> SetCookies {
    AppendHeaders([
        (SET_COOKIE, build(USER_ID_COOKIE, user.id.to_string(), settings).to_string()),
        (SET_COOKIE, build(ROLE_COOKIE, user.role.to_string(), settings).to_string()),
    ])
}

/// `Set-Cookie` headers that expire both session cookies.
pub fn clear_session_cookies(settings: &CookieSettings) -> SetCookies {
    AppendHeaders([
        (SET_COOKIE, expired(USER_ID_COOKIE, settings).to_string()),
        (SET_COOKIE, expired(ROLE_COOKIE, settings).to_string()),
    ])
}

/// Value of the first request cookie called `name`.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use axum::response::IntoResponse;

    use super::*;
    use crate::auth::models::Role;

    fn user() -> User {
        User {
            id: 3,
            username: "ops".into(),
            password_hash: String::new(),
            role: Role::User,
            allowed_pages: Vec::new(),
        }
    }

    fn set_cookie_values(headers: SetCookies) -> Vec<String> {
        let response = headers.into_response();
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn session_cookies_are_http_only() {
        let values = set_cookie_values(session_cookies(&user(), &CookieSettings::default()));

        assert_eq!(values.len(), 2);
        assert!(values[0].starts_with("userId=3"));
        assert!(values[1].starts_with("role=USER"));
        assert!(values.iter().all(|v| v.contains("HttpOnly") && v.contains("Path=/")));
        assert!(values.iter().all(|v| !v.contains("Secure")));
    }

    #[test]
    fn secure_flag_follows_settings() {
        let values = set_cookie_values(session_cookies(&user(), &CookieSettings { secure: true }));
        assert!(values.iter().all(|v| v.contains("Secure")));
    }

    #[test]
    fn clearing_expires_both_cookies() {
        let values = set_cookie_values(clear_session_cookies(&CookieSettings::default()));

        assert!(values[0].starts_with("userId=;"));
        assert!(values[1].starts_with("role=;"));
        assert!(values.iter().all(|v| v.contains("1970")));
    }

    #[test]
    fn reads_named_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("role=ADMIN; userId=12"));

        assert_eq!(read_cookie(&headers, USER_ID_COOKIE).as_deref(), Some("12"));
        assert_eq!(read_cookie(&headers, ROLE_COOKIE).as_deref(), Some("ADMIN"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }
}
