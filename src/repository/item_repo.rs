//! Item Repository
//!
//! SQLite-backed implementation of `Repository<Item>` plus the queries the
//! rotation needs (ascending id scans) and bulk import.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{validate_front, DomainError, DomainResult, ImportEntry, Item, ItemId, Priority};
use super::db::{connection, internal, SharedConnection};
use super::traits::Repository;

const ITEM_COLUMNS: &str = "id, front, back, created_at, priority";

/// SQLite implementation of Item repository
pub struct ItemRepository {
    conn: SharedConnection,
}

impl ItemRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Insert a single item and return its id. Duplicate fronts are allowed here.
    pub async fn insert(&self, front: &str, back: &str) -> DomainResult<ItemId> {
        let item = Item::new(0, front.to_string(), back.to_string());
        self.create(&item).await.map(|created| created.id)
    }

    /// Import many entries in one transaction.
    ///
    /// An entry whose front already exists only updates that item's back text
    /// (its priority is kept). Entries with an empty front are skipped.
    /// Returns the number of newly inserted items.
    pub async fn bulk_upsert(&self, entries: &[ImportEntry]) -> DomainResult<u32> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let tx = conn.unchecked_transaction().map_err(internal)?;
        let now = chrono::Utc::now().timestamp_millis();
        let mut imported = 0u32;

        for entry in entries {
            if entry.front.trim().is_empty() {
                continue;
            }

            let existing: Option<ItemId> = tx
                .query_row(
                    "SELECT id FROM items WHERE front = ?1 ORDER BY id LIMIT 1",
                    params![entry.front],
                    |row| row.get(0),
                )
                .optional()
                .map_err(internal)?;

            match existing {
                Some(id) => {
                    tx.execute(
                        "UPDATE items SET back = ?1 WHERE id = ?2",
                        params![entry.back, id],
                    )
                    .map_err(internal)?;
                }
                None => {
                    tx.execute(
                        "INSERT INTO items (front, back, created_at, priority) VALUES (?1, ?2, ?3, ?4)",
                        params![entry.front, entry.back, now, Priority::High.as_i32()],
                    )
                    .map_err(internal)?;
                    imported += 1;
                }
            }
        }

        tx.commit().map_err(internal)?;
        log::info!("Bulk import: {} entries, {} new", entries.len(), imported);
        Ok(imported)
    }

    /// Replace front and back text of an existing item
    pub async fn update_content(&self, id: ItemId, front: &str, back: &str) -> DomainResult<Item> {
        validate_front(front)?;
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let changed = conn
            .execute(
                "UPDATE items SET front = ?1, back = ?2 WHERE id = ?3",
                params![front, back, id],
            )
            .map_err(internal)?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("item {}", id)));
        }

        log::debug!("Updated item id={}", id);
        find_item(conn, id)?.ok_or_else(|| DomainError::NotFound(format!("item {}", id)))
    }

    pub async fn set_priority(&self, id: ItemId, priority: Priority) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let changed = conn
            .execute(
                "UPDATE items SET priority = ?1 WHERE id = ?2",
                params![priority.as_i32(), id],
            )
            .map_err(internal)?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("item {}", id)));
        }

        log::info!("Updated priority: id={} priority={}", id, priority.label());
        Ok(())
    }

    /// Items with `id > anchor` in ascending id order; `None` means from the start
    pub async fn list_after(&self, anchor: Option<ItemId>) -> DomainResult<Vec<Item>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let lower_bound = anchor.map(i64::from).unwrap_or(-1);
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM items WHERE id > ?1 ORDER BY id ASC",
                ITEM_COLUMNS
            ))
            .map_err(internal)?;
        let rows = stmt
            .query_map(params![lower_bound], row_to_item)
            .map_err(internal)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(internal)
    }

    /// The item with the smallest id
    pub async fn first_by_id(&self) -> DomainResult<Option<Item>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.query_row(
            &format!("SELECT {} FROM items ORDER BY id ASC LIMIT 1", ITEM_COLUMNS),
            [],
            row_to_item,
        )
        .optional()
        .map_err(internal)
    }

    pub async fn count(&self) -> DomainResult<u32> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
            .map_err(internal)
    }

    pub async fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.count().await? == 0)
    }
}

#[async_trait]
impl Repository<Item> for ItemRepository {
    async fn create(&self, entity: &Item) -> DomainResult<Item> {
        entity.validate()?;
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.execute(
            "INSERT INTO items (front, back, created_at, priority) VALUES (?1, ?2, ?3, ?4)",
            params![entity.front, entity.back, entity.created_at, entity.priority.as_i32()],
        )
        .map_err(internal)?;

        let rowid = conn.last_insert_rowid();
        let id = ItemId::try_from(rowid)
            .map_err(|_| DomainError::Internal(format!("Item id {} out of range", rowid)))?;
        log::info!("Inserted item id={} '{}'", id, entity.front);

        let mut created = entity.clone();
        created.id = id;
        Ok(created)
    }

    async fn find_by_id(&self, id: ItemId) -> DomainResult<Option<Item>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;
        find_item(conn, id)
    }

    /// Most recently created first
    async fn list(&self) -> DomainResult<Vec<Item>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM items ORDER BY created_at DESC, id DESC",
                ITEM_COLUMNS
            ))
            .map_err(internal)?;
        let rows = stmt.query_map([], row_to_item).map_err(internal)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(internal)
    }

    async fn update(&self, entity: &Item) -> DomainResult<Item> {
        entity.validate()?;
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let changed = conn
            .execute(
                "UPDATE items SET front = ?1, back = ?2, priority = ?3 WHERE id = ?4",
                params![entity.front, entity.back, entity.priority.as_i32(), entity.id],
            )
            .map_err(internal)?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("item {}", entity.id)));
        }

        Ok(entity.clone())
    }

    /// Deleting an unknown id is not an error
    async fn delete(&self, id: ItemId) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let changed = conn
            .execute("DELETE FROM items WHERE id = ?1", params![id])
            .map_err(internal)?;
        log::info!("Deleted item id={} (rows={})", id, changed);
        Ok(())
    }
}

fn find_item(conn: &rusqlite::Connection, id: ItemId) -> DomainResult<Option<Item>> {
    conn.query_row(
        &format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS),
        params![id],
        row_to_item,
    )
    .optional()
    .map_err(internal)
}

/// Convert a database row to Item
fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        front: row.get(1)?,
        back: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        created_at: row.get(3)?,
        priority: Priority::from_i32(row.get::<_, Option<i32>>(4)?.unwrap_or(1)),
    })
}
