//! Recovery Coordinator
//!
//! Works out what should be pending right now, after a restart, a reboot,
//! a replaced database or any mutation that may have left the pending
//! reference stale. Safe to run any number of times.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{DomainResult, Item, ItemId};
use crate::repository::{ItemRepository, Repository, RotationGuard, SchedulerStateRepository};
use super::facility::PresentationFacility;
use super::rotation::RotationEngine;
use super::session::{PresentationSession, SessionState};

/// Outcome of a reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// The pending item is already on screen
    NoOp,
    /// Arm (or show, for a zero delay) this item
    SchedulePresentation { item: Item, delay: Duration },
    /// The store is empty; nothing is pending any more
    ClearPending,
}

pub struct RecoveryCoordinator {
    items: Arc<ItemRepository>,
    state: Arc<SchedulerStateRepository>,
    engine: Arc<RotationEngine>,
    session: PresentationSession,
    slot: Arc<dyn PresentationFacility>,
}

impl RecoveryCoordinator {
    pub fn new(
        items: Arc<ItemRepository>,
        state: Arc<SchedulerStateRepository>,
        engine: Arc<RotationEngine>,
        session: PresentationSession,
        slot: Arc<dyn PresentationFacility>,
    ) -> Self {
        Self {
            items,
            state,
            engine,
            session,
            slot,
        }
    }

    pub async fn reconcile(&self) -> DomainResult<Action> {
        let guard = self.state.lock_rotation().await;
        self.reconcile_locked(&guard).await
    }

    /// `reconcile` for a caller already inside the rotation lock, so the
    /// caller can act on the result before any other decision runs
    pub async fn reconcile_locked(&self, guard: &RotationGuard) -> DomainResult<Action> {
        let pending = self.state.get_pending_item_id().await?;
        let live = match pending {
            Some(id) => self.items.find_by_id(id).await?,
            None => None,
        };

        if let Some(item) = live {
            if self.is_shown(item.id).await {
                log::debug!("Reconcile: item {} already shown", item.id);
                return Ok(Action::NoOp);
            }
            let delay = self.state.get_delay().await?;
            log::info!("Reconcile: re-arming pending item {}", item.id);
            return Ok(Action::SchedulePresentation { item, delay });
        }

        // Pending is gone, so anything still in the slot is stale
        if self.slot.is_slot_occupied() {
            log::info!("Reconcile: clearing slot left over from {:?}", pending);
            self.slot.clear_slot();
            self.session.set(SessionState::Idle).await;
        }

        match self.engine.get_next_locked(guard, pending).await? {
            Some(item) => {
                self.state.set_pending_item_id(Some(item.id)).await?;
                let delay = self.state.get_delay().await?;
                log::info!(
                    "Reconcile: pending {:?} is gone, moving on to item {}",
                    pending,
                    item.id
                );
                Ok(Action::SchedulePresentation { item, delay })
            }
            None => {
                self.state.set_pending_item_id(None).await?;
                log::info!("Reconcile: store is empty, clearing pending item");
                Ok(Action::ClearPending)
            }
        }
    }

    /// Whether `id` currently occupies the slot
    async fn is_shown(&self, id: ItemId) -> bool {
        if !self.slot.is_slot_occupied() {
            return false;
        }
        match self.session.state().await {
            SessionState::Shown(shown) => shown == id,
            // After a restart the session is blank but the surface survived.
            // The slot is cleared whenever pending moves off its occupant, so
            // it can only be holding the pending item.
            SessionState::Idle => true,
            SessionState::Scheduled(_) => false,
        }
    }
}
