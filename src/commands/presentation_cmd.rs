//! Presentation Commands
//!
//! Triggers coming back from the host: app start or boot, the alarm firing,
//! and the buttons on the presented word.

use crate::domain::{Item, ItemId, Priority};
use crate::scheduler::{Action, TimerPayload};
use crate::AppState;

/// Restore the word cycle after start, boot or package replacement
pub async fn restore_cycle(state: &AppState) -> Result<Action, String> {
    state.controller.restore().await.map_err(|e| e.to_string())
}

/// The host's alarm fired with a payload produced by `TimerPayload::to_json`
pub async fn timer_fired(state: &AppState, payload: String) -> Result<(), String> {
    let payload = TimerPayload::from_json(&payload)
        .map_err(|e| format!("Invalid timer payload: {}", e))?;
    state
        .controller
        .on_timer_fired(payload)
        .await
        .map_err(|e| e.to_string())
}

/// Priority button on the presented word; returns the word scheduled next
pub async fn select_priority(
    state: &AppState,
    item_id: ItemId,
    priority: i32,
) -> Result<Option<Item>, String> {
    let priority = Priority::try_from(priority).map_err(|e| e.to_string())?;
    state
        .controller
        .on_priority_selected(item_id, priority)
        .await
        .map_err(|e| e.to_string())
}

/// Play button on the presented word
pub async fn replay(state: &AppState, item_id: ItemId) -> Result<(), String> {
    state.controller.on_replay(item_id).await.map_err(|e| e.to_string())
}

/// The presented word was swiped away
pub async fn dismiss(state: &AppState, item_id: ItemId) -> Result<(), String> {
    state.controller.on_dismissed(item_id).await.map_err(|e| e.to_string())
}

/// Force a word into the slot after the current delay
pub async fn schedule_immediate(state: &AppState, item_id: ItemId) -> Result<Option<Item>, String> {
    state
        .controller
        .schedule_immediate(item_id)
        .await
        .map_err(|e| e.to_string())
}
