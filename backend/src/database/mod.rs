//! Module for database connection setup and common utilities.
//!
//! This module owns the single SQLite connection, runs schema migration and
//! default-account seeding at startup, and provides the `execute` helper
//! every query goes through so blocking SQLite work never runs on the async
//! executor.

pub mod models;
pub mod queries;

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::models::Role;
use crate::auth::service::hash_password;
use crate::errors::ApiError;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A unique constraint rejected the write.
    #[error("{0}")]
    Conflict(String),

    /// A stored row could not be mapped back to a domain value.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("database task failed: {0}")]
    Task(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL,
    allowed_pages TEXT NOT NULL DEFAULT '[]'
);
";

/// Cloneable handle to the user database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (creating if needed) the database file and apply the schema.
    pub fn open(path: &Path) -> DbResult<Self> {
        info!("Initializing database at: {}", path.display());
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    pub async fn execute<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| DbError::Task("connection mutex poisoned".into()))?;
            f(&mut *guard)
        })
        .await
        .map_err(|e| DbError::Task(e.to_string()))?
    }
}

struct SeedAccount {
    username: &'static str,
    password: &'static str,
    role: Role,
    pages: &'static [&'static str],
}

const SEED_ACCOUNTS: &[SeedAccount] = &[
    SeedAccount {
        username: "admin",
        password: "adminpassword",
        role: Role::Admin,
        pages: &[
            "/page1", "/page2", "/page3", "/page4", "/page5", "/page6", "/admin", "/home",
        ],
    },
    SeedAccount {
        username: "user",
        password: "password",
        role: Role::User,
        pages: &[
            "/page1",
            "/page2",
            "/page3",
            "/home",
            "/s3-summary",
            "/label-summary",
        ],
    },
];

/// Create the default `admin` and `user` accounts when they are missing.
pub async fn seed_default_users(db: &Database, bcrypt_cost: u32) -> Result<(), ApiError> {
    for account in SEED_ACCOUNTS {
        if queries::find_by_username(db, account.username).await?.is_some() {
            debug!(username = account.username, "seed account already present");
            continue;
        }

        let password_hash = hash_password(account.password, bcrypt_cost).await?;
        let pages = account.pages.iter().map(|p| p.to_string()).collect();
        queries::insert_user(
            db,
            models::NewUser {
                username: account.username.to_string(),
                password_hash,
                role: account.role,
                allowed_pages: pages,
            },
        )
        .await?;
        info!(username = account.username, role = %account.role, "default user created");
    }
    Ok(())
}
