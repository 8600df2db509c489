//! Settings Repository
//!
//! Key/value settings that are not part of the scheduler row.

use rusqlite::{params, OptionalExtension};

use crate::domain::DomainResult;
use super::db::{connection, internal, SharedConnection};

pub const KEY_GSHEET_LINK: &str = "gsheet_link";

pub struct SettingsRepository {
    conn: SharedConnection,
}

impl SettingsRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(internal)
    }

    pub async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .map_err(internal)?;
        Ok(())
    }

    /// Link of the spreadsheet word lists are imported from, empty if unset
    pub async fn gsheet_link(&self) -> DomainResult<String> {
        Ok(self.get(KEY_GSHEET_LINK).await?.unwrap_or_default())
    }

    pub async fn set_gsheet_link(&self, link: &str) -> DomainResult<()> {
        self.set(KEY_GSHEET_LINK, link.trim()).await
    }
}
