//! Database Connection and Setup
//!
//! Manages the SQLite connection and migrations.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, DEFAULT_CYCLE, DEFAULT_DELAY_SECONDS};

/// Shared connection slot. `None` until `init_db` finishes or after `close`.
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
    pub db_path: PathBuf,
}

impl DbState {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
            db_path,
        }
    }

    pub async fn is_ready(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Drop the connection; repositories report "not initialized" afterwards
    pub async fn close(&self) {
        let mut guard = self.conn.lock().await;
        if guard.take().is_some() {
            log::info!("Database connection closed: {}", self.db_path.display());
        }
    }
}

/// Borrow the live connection out of a locked slot
pub fn connection(guard: &Option<Connection>) -> DomainResult<&Connection> {
    guard
        .as_ref()
        .ok_or_else(|| DomainError::Internal("Database not initialized".to_string()))
}

pub(crate) fn internal(e: rusqlite::Error) -> DomainError {
    DomainError::Internal(e.to_string())
}

/// Open (or create) the database at `db_path` and bring the schema up to date.
/// `":memory:"` gives a private in-memory database.
pub async fn init_db(db_path: &Path) -> Result<DbState, String> {
    let conn = Connection::open(db_path)
        .map_err(|e| format!("Failed to open db {}: {}", db_path.display(), e))?;

    run_migrations(&conn)?;

    let state = DbState::new(db_path.to_path_buf());
    *state.conn.lock().await = Some(conn);

    log::info!("Database ready: {}", db_path.display());
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(mut rows) = stmt.query([]) else {
        return false;
    };
    while let Ok(Some(row)) = rows.next() {
        if let Ok(name) = row.get::<_, String>(1) {
            if name == column {
                return true;
            }
        }
    }
    false
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> Result<(), String> {
    // AUTOINCREMENT keeps deleted ids from being handed out again
    conn.execute(
        "CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            front TEXT NOT NULL,
            back TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    // Priority arrived after the first release; old rows become High
    if !column_exists(conn, "items", "priority") {
        conn.execute("ALTER TABLE items ADD COLUMN priority INTEGER NOT NULL DEFAULT 1", [])
            .map_err(|e| format!("Failed to add priority: {}", e))?;
    }

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_items_front ON items(front)",
        [],
    )
    .map_err(|e| e.to_string())?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS scheduler_state (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            cycle INTEGER NOT NULL DEFAULT 1,
            pending_item_id INTEGER,
            delay_seconds INTEGER NOT NULL DEFAULT 5
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    conn.execute(
        "INSERT OR IGNORE INTO scheduler_state (id, cycle, pending_item_id, delay_seconds) VALUES (1, ?1, NULL, ?2)",
        rusqlite::params![DEFAULT_CYCLE, DEFAULT_DELAY_SECONDS as i64],
    )
    .map_err(|e| e.to_string())?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}
