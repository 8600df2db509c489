//! Presentation Session
//!
//! In-memory view of the single slot. Lost on process death, which is why
//! recovery also asks the presentation facility whether the slot is occupied.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing armed and nothing shown (also the state right after start)
    #[default]
    Idle,
    /// A trigger is armed for this item
    Scheduled(ItemId),
    /// This item occupies the slot
    Shown(ItemId),
}

impl SessionState {
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            SessionState::Idle => None,
            SessionState::Scheduled(id) | SessionState::Shown(id) => Some(*id),
        }
    }
}

/// Shared handle; clones observe the same state
#[derive(Clone, Default)]
pub struct PresentationSession {
    state: Arc<Mutex<SessionState>>,
}

impl PresentationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn state(&self) -> SessionState {
        *self.state.lock().await
    }

    pub async fn set(&self, next: SessionState) {
        let mut state = self.state.lock().await;
        if *state != next {
            log::debug!("Session {:?} -> {:?}", *state, next);
        }
        *state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_tracks_item_in_play() {
        let session = PresentationSession::new();
        assert_eq!(session.state().await.item_id(), None);

        session.set(SessionState::Scheduled(4)).await;
        assert_eq!(session.state().await.item_id(), Some(4));

        // Clones share the slot view
        let other = session.clone();
        other.set(SessionState::Shown(9)).await;
        assert_eq!(session.state().await, SessionState::Shown(9));
        assert_eq!(session.state().await.item_id(), Some(9));
    }
}
