//! Rust structs that represent database table mappings.
//!
//! `UserRow` mirrors the `users` table column for column; the other types
//! describe writes. Conversion into the domain `User` parses the stored role
//! and the JSON-encoded page list.

use crate::auth::models::{Role, User};
use crate::database::{DbError, DbResult};

pub(crate) const USER_COLUMNS: &str = "id, username, password_hash, role, allowed_pages";

#[derive(Debug)]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub allowed_pages: String,
}

impl UserRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            role: row.get(3)?,
            allowed_pages: row.get(4)?,
        })
    }

    pub fn into_user(self) -> DbResult<User> {
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e| DbError::Corrupt(format!("user {}: {e}", self.id)))?;
        let allowed_pages: Vec<String> = serde_json::from_str(&self.allowed_pages)
            .map_err(|e| DbError::Corrupt(format!("user {} allowed_pages: {e}", self.id)))?;

        Ok(User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            role,
            allowed_pages,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub allowed_pages: Vec<String>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub allowed_pages: Option<Vec<String>>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.allowed_pages.is_none()
    }
}

/// Drop repeated page keys, keeping the first occurrence.
pub fn normalize_pages(pages: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    pages
        .into_iter()
        .filter(|page| seen.insert(page.clone()))
        .collect()
}

pub(crate) fn encode_pages(pages: &[String]) -> DbResult<String> {
    serde_json::to_string(pages).map_err(|e| DbError::Corrupt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(role: &str, pages: &str) -> UserRow {
        UserRow {
            id: 1,
            username: "u".into(),
            password_hash: "h".into(),
            role: role.into(),
            allowed_pages: pages.into(),
        }
    }

    #[test]
    fn parses_role_and_pages() {
        let user = row("USER", r#"["/page1","/home"]"#).into_user().unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.allowed_pages, vec!["/page1", "/home"]);
    }

    #[test]
    fn unknown_role_is_corrupt() {
        assert!(matches!(row("ROOT", "[]").into_user(), Err(DbError::Corrupt(_))));
    }

    #[test]
    fn malformed_pages_are_corrupt() {
        assert!(matches!(row("USER", "/page1,/page2").into_user(), Err(DbError::Corrupt(_))));
    }

    #[test]
    fn normalize_keeps_first_occurrence_order() {
        let pages = normalize_pages(vec!["/b".into(), "/a".into(), "/b".into()]);
        assert_eq!(pages, vec!["/b", "/a"]);
    }
}
