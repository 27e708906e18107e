//! Database query functions (Data Access Objects).
//!
//! This module centralizes all direct database operations on the `users`
//! table, providing reusable functions for the auth and admin services and
//! abstracting the SQL away from higher-level code. Every write runs in its
//! own transaction.

use rusqlite::types::ToSql;
use rusqlite::{params, OptionalExtension};
use tracing::{debug, instrument};

use crate::auth::models::User;
use crate::database::models::{encode_pages, NewUser, UserChanges, UserRow, USER_COLUMNS};
use crate::database::{Database, DbError, DbResult};

fn map_unique_violation(err: rusqlite::Error, username: &str) -> DbError {
    if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
        if failure.code == rusqlite::ErrorCode::ConstraintViolation {
            return DbError::Conflict(format!("Username already exists: {username}"));
        }
    }
    DbError::Sqlite(err)
}

#[instrument(skip(db))]
pub async fn find_by_id(db: &Database, id: i64) -> DbResult<Option<User>> {
    db.execute(move |conn| {
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            UserRow::from_row,
        )
        .optional()?
        .map(UserRow::into_user)
        .transpose()
    })
    .await
}

#[instrument(skip(db))]
pub async fn find_by_username(db: &Database, username: &str) -> DbResult<Option<User>> {
    let username = username.to_string();
    db.execute(move |conn| {
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            UserRow::from_row,
        )
        .optional()?
        .map(UserRow::into_user)
        .transpose()
    })
    .await
}

pub async fn list_users(db: &Database) -> DbResult<Vec<User>> {
    db.execute(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
        let rows = stmt
            .query_map([], UserRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(UserRow::into_user).collect()
    })
    .await
}

/// Insert a user and return it with its assigned id.
#[instrument(skip(db, new_user), fields(username = %new_user.username))]
pub async fn insert_user(db: &Database, new_user: NewUser) -> DbResult<User> {
    db.execute(move |conn| {
        let pages = encode_pages(&new_user.allowed_pages)?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO users (username, password_hash, role, allowed_pages) VALUES (?1, ?2, ?3, ?4)",
            params![
                new_user.username,
                new_user.password_hash,
                new_user.role.as_str(),
                pages
            ],
        )
        .map_err(|e| map_unique_violation(e, &new_user.username))?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(user_id = id, "user inserted");
        Ok(User {
            id,
            username: new_user.username,
            password_hash: new_user.password_hash,
            role: new_user.role,
            allowed_pages: new_user.allowed_pages,
        })
    })
    .await
}

/// Apply `changes` to user `id`. Returns `None` when no such user exists.
#[instrument(skip(db, changes))]
pub async fn update_user(db: &Database, id: i64, changes: UserChanges) -> DbResult<Option<User>> {
    db.execute(move |conn| {
        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(username) = &changes.username {
            assignments.push("username = ?");
            values.push(Box::new(username.clone()));
        }
        if let Some(hash) = &changes.password_hash {
            assignments.push("password_hash = ?");
            values.push(Box::new(hash.clone()));
        }
        if let Some(role) = changes.role {
            assignments.push("role = ?");
            values.push(Box::new(role.as_str()));
        }
        if let Some(pages) = &changes.allowed_pages {
            assignments.push("allowed_pages = ?");
            values.push(Box::new(encode_pages(pages)?));
        }
        values.push(Box::new(id));

        let tx = conn.transaction()?;
        if !assignments.is_empty() {
            let sql = format!("UPDATE users SET {} WHERE id = ?", assignments.join(", "));
            let bound: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
            let changed = tx.execute(&sql, bound.as_slice()).map_err(|e| {
                map_unique_violation(e, changes.username.as_deref().unwrap_or_default())
            })?;
            if changed == 0 {
                return Ok(None);
            }
        }

        let updated = tx
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                UserRow::from_row,
            )
            .optional()?
            .map(UserRow::into_user)
            .transpose()?;
        tx.commit()?;
        Ok(updated)
    })
    .await
}

/// Returns whether a row was removed.
#[instrument(skip(db))]
pub async fn delete_user(db: &Database, id: i64) -> DbResult<bool> {
    db.execute(move |conn| {
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(removed > 0)
    })
    .await
}
