use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use thiserror::Error;

/// A registered account. `password` holds the PHC-format hash, never the
/// plaintext.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username or email already taken")]
    Duplicate,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Append-only SQLite store of user accounts. The connection sits behind a
/// mutex; every operation is a single short statement and the lock is never
/// held across an await point.
pub struct UserStore {
    conn: Mutex<Connection>,
}

impl UserStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        init_schema(&conn).context("failed to initialize user schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        init_schema(&conn).context("failed to initialize user schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO users (username, email, password) VALUES (?, ?, ?)",
            params![username, email, password_hash],
        )
        .map_err(|err| {
            if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
                StoreError::Duplicate
            } else {
                StoreError::Database(err)
            }
        })?;

        Ok(User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
        })
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let conn = self.lock();
        let user = conn
            .query_row(
                "SELECT id, username, email, password FROM users WHERE username = ?",
                params![username],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let conn = self.lock();
        let user = conn
            .query_row(
                "SELECT id, username, email, password FROM users WHERE id = ?",
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("user store lock poisoned")
    }
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
    })
}
