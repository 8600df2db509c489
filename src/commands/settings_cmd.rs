//! Settings Commands
//!
//! Delay, import link and the manual pending-word override.

use std::time::Duration;

use crate::domain::{ItemId, Settings};
use crate::AppState;

/// Current settings snapshot
pub async fn get_settings(state: &AppState) -> Result<Settings, String> {
    let delay = state.scheduler_state.get_delay().await.map_err(|e| e.to_string())?;
    let last_word_id = state
        .scheduler_state
        .get_pending_item_id()
        .await
        .map_err(|e| e.to_string())?;
    let gsheet_link = state.settings.gsheet_link().await.map_err(|e| e.to_string())?;

    Ok(Settings {
        delay_seconds: delay.as_secs(),
        gsheet_link,
        last_word_id,
    })
}

/// Change the delay between words and re-arm the pending word with it,
/// so a shorter delay takes effect without waiting out the old one
pub async fn set_delay(state: &AppState, seconds: u64) -> Result<(), String> {
    state
        .scheduler_state
        .set_delay(Duration::from_secs(seconds))
        .await
        .map_err(|e| e.to_string())?;
    state.notifier.notify();

    state.controller.restore().await.map_err(|e| e.to_string())?;
    Ok(())
}

/// Save the spreadsheet link word lists are imported from
pub async fn set_gsheet_link(state: &AppState, link: String) -> Result<(), String> {
    state.settings.set_gsheet_link(&link).await.map_err(|e| e.to_string())?;
    state.notifier.notify();
    Ok(())
}

/// Make `id` the rotation anchor without arming anything
pub async fn set_pending_item(state: &AppState, id: Option<ItemId>) -> Result<(), String> {
    {
        let _guard = state.scheduler_state.lock_rotation().await;
        state
            .scheduler_state
            .set_pending_item_id(id)
            .await
            .map_err(|e| e.to_string())?;
    }
    state.notifier.notify();
    Ok(())
}
