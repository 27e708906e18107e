//! Data structures for authentication-related entities.
//!
//! This module defines models for users, user roles, per-route access
//! requirements, and the login/check-auth payloads, used for data transfer
//! and internal representation within the authentication flow.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role `{}`", self.0)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A stored account. The password hash never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub allowed_pages: Vec<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn can_view(&self, page: &str) -> bool {
        self.allowed_pages.iter().any(|p| p == page)
    }
}

/// What a route demands of its caller. Both fields unset means any
/// resolved session passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRequirement {
    pub required_role: Option<Role>,
    pub required_page: Option<String>,
}

impl AccessRequirement {
    pub fn role(role: Role) -> Self {
        Self {
            required_role: Some(role),
            required_page: None,
        }
    }

    pub fn page(page: impl Into<String>) -> Self {
        Self {
            required_role: None,
            required_page: Some(page.into()),
        }
    }
}

/// The user resolved for the current request, inserted as a request
/// extension by the access gate.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub role: Role,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub is_authenticated: bool,
    pub role: Option<Role>,
    pub username: Option<String>,
    pub allowed_pages: Vec<String>,
}

impl AuthStatus {
    pub fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            role: None,
            username: None,
            allowed_pages: Vec::new(),
        }
    }
}

impl From<&User> for AuthStatus {
    fn from(user: &User) -> Self {
        Self {
            is_authenticated: true,
            role: Some(user.role),
            username: Some(user.username.clone()),
            allowed_pages: user.allowed_pages.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
