//! Item Commands
//!
//! CRUD on the word list, as called by the host app.

use crate::domain::{ImportEntry, Item, ItemId, Priority};
use crate::repository::Repository;
use crate::AppState;

/// Add a single word
pub async fn add_item(state: &AppState, front: String, back: String) -> Result<Item, String> {
    let item = Item::new(0, front, back);
    let created = state.items.create(&item).await.map_err(|e| e.to_string())?;
    state.notifier.notify();

    // Nothing in rotation yet (first word, or the list was emptied earlier).
    // A pending word means a countdown is already running, possibly from
    // before a restart.
    let pending = state
        .scheduler_state
        .get_pending_item_id()
        .await
        .map_err(|e| e.to_string())?;
    if pending.is_none() {
        state.controller.restore().await.map_err(|e| e.to_string())?;
    }
    Ok(created)
}

/// Import a word list; returns how many new words were added
pub async fn bulk_upsert_items(state: &AppState, entries: Vec<ImportEntry>) -> Result<u32, String> {
    let was_empty = state.items.is_empty().await.map_err(|e| e.to_string())?;

    let imported = state.items.bulk_upsert(&entries).await.map_err(|e| e.to_string())?;
    state.notifier.notify();

    if was_empty && imported > 0 {
        log::info!("First import into an empty list, starting rotation");
        state.controller.restore().await.map_err(|e| e.to_string())?;
    }
    Ok(imported)
}

/// Edit front and back text
pub async fn update_item(
    state: &AppState,
    id: ItemId,
    front: String,
    back: String,
) -> Result<Item, String> {
    let updated = state
        .items
        .update_content(id, &front, &back)
        .await
        .map_err(|e| e.to_string())?;
    state.notifier.notify();
    Ok(updated)
}

/// Delete a word. Removing the pending or presented word moves the
/// rotation on and takes it off the slot.
pub async fn delete_item(state: &AppState, id: ItemId) -> Result<(), String> {
    let pending = state
        .scheduler_state
        .get_pending_item_id()
        .await
        .map_err(|e| e.to_string())?;
    let in_session = state.controller.session_state().await.item_id();

    state.items.delete(id).await.map_err(|e| e.to_string())?;
    state.notifier.notify();

    let emptied = state.items.is_empty().await.map_err(|e| e.to_string())?;
    if pending == Some(id) || in_session == Some(id) || emptied {
        state.controller.restore().await.map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Change a word's priority from the list screen
pub async fn set_priority(state: &AppState, id: ItemId, priority: i32) -> Result<(), String> {
    let priority = Priority::try_from(priority).map_err(|e| e.to_string())?;
    state
        .items
        .set_priority(id, priority)
        .await
        .map_err(|e| e.to_string())?;
    state.notifier.notify();
    Ok(())
}

/// All words, newest first
pub async fn list_items(state: &AppState) -> Result<Vec<Item>, String> {
    state.items.list().await.map_err(|e| e.to_string())
}

/// Get a word by ID
pub async fn get_item(state: &AppState, id: ItemId) -> Result<Option<Item>, String> {
    state.items.find_by_id(id).await.map_err(|e| e.to_string())
}
