//! Scheduler State
//!
//! The single persisted row the rotation reads and advances, and the
//! settings snapshot handed to the host.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::item::ItemId;

pub const DEFAULT_CYCLE: u32 = 1;
pub const DEFAULT_DELAY_SECONDS: u64 = 5;

/// Snapshot of the scheduler-state row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerState {
    /// Global lap counter, starts at 1 and only grows
    pub cycle: u32,
    /// Anchor of the latest rotation decision
    pub pending_item_id: Option<ItemId>,
    /// Wait between presentations
    pub delay: Duration,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            cycle: DEFAULT_CYCLE,
            pending_item_id: None,
            delay: Duration::from_secs(DEFAULT_DELAY_SECONDS),
        }
    }
}

/// User-facing settings, keyed the way the host app expects them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub delay_seconds: u64,
    /// Spreadsheet the host imports word lists from
    pub gsheet_link: String,
    /// Current pending item
    pub last_word_id: Option<ItemId>,
}
