use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use crate::error::StoreError;

/// Mutex-guarded SQLite handle shared across workers via `web::Data`.
/// The database is the sole arbiter of write ordering; the application layer
/// takes no other locks.
pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, used by the integration tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&conn)
    }
}

pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
             id            TEXT PRIMARY KEY,
             username      TEXT NOT NULL UNIQUE,
             email         TEXT NOT NULL UNIQUE,
             password_hash TEXT NOT NULL,
             created_at    TEXT NOT NULL
         );
         CREATE TABLE IF NOT EXISTS tasks (
             id          TEXT PRIMARY KEY,
             title       TEXT NOT NULL,
             description TEXT NOT NULL DEFAULT '',
             status      TEXT NOT NULL DEFAULT 'pending',
             priority    TEXT NOT NULL DEFAULT 'medium',
             due_date    TEXT,
             user        TEXT NOT NULL REFERENCES users(id),
             created_at  TEXT NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks(user);",
    )?;
    Ok(())
}
