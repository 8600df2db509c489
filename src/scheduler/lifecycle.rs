//! Presentation Lifecycle Controller
//!
//! Drives one item at a time through `Scheduled -> Shown -> resolved`.
//! Every entry point is one external trigger (timer fired, button pressed,
//! app started) and runs to completion inside the rotation lock, so a
//! decision and the arming that follows it are never split by another one.
//!
//! Persistent state is written before a facility is asked to do anything, so
//! a failing facility never leaves the store inconsistent; the next
//! `restore` simply picks up from the stored pending item.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{DomainError, DomainResult, Item, ItemId, Priority};
use crate::repository::{ItemRepository, Repository, RotationGuard, SchedulerStateRepository};
use super::events::ChangeNotifier;
use super::facility::{Facilities, SlotContent, TimerPayload};
use super::recovery::{Action, RecoveryCoordinator};
use super::rotation::RotationEngine;
use super::session::{PresentationSession, SessionState};

pub struct PresentationController {
    items: Arc<ItemRepository>,
    state: Arc<SchedulerStateRepository>,
    engine: Arc<RotationEngine>,
    recovery: RecoveryCoordinator,
    session: PresentationSession,
    facilities: Facilities,
    notifier: ChangeNotifier,
    tts_language: String,
}

impl PresentationController {
    pub fn new(
        items: Arc<ItemRepository>,
        state: Arc<SchedulerStateRepository>,
        facilities: Facilities,
        notifier: ChangeNotifier,
        tts_language: impl Into<String>,
    ) -> Self {
        let session = PresentationSession::new();
        let engine = Arc::new(RotationEngine::new(items.clone(), state.clone()));
        let recovery = RecoveryCoordinator::new(
            items.clone(),
            state.clone(),
            engine.clone(),
            session.clone(),
            facilities.slot.clone(),
        );
        Self {
            items,
            state,
            engine,
            recovery,
            session,
            facilities,
            notifier,
            tts_language: tts_language.into(),
        }
    }

    pub fn engine(&self) -> &RotationEngine {
        &self.engine
    }

    pub fn recovery(&self) -> &RecoveryCoordinator {
        &self.recovery
    }

    pub async fn session_state(&self) -> SessionState {
        self.session.state().await
    }

    /// Reconcile and act on the result. Entry point for app start, device
    /// boot, package replacement and any mutation that may have
    /// invalidated the pending item.
    pub async fn restore(&self) -> DomainResult<Action> {
        let guard = self.state.lock_rotation().await;
        self.restore_locked(&guard).await
    }

    async fn restore_locked(&self, guard: &RotationGuard) -> DomainResult<Action> {
        let action = self.recovery.reconcile_locked(guard).await?;
        self.apply(guard, &action).await?;
        Ok(action)
    }

    /// Carry out a reconciliation result
    async fn apply(&self, guard: &RotationGuard, action: &Action) -> DomainResult<()> {
        match action {
            Action::NoOp => Ok(()),
            Action::SchedulePresentation { item, delay } => self.arm(guard, item, *delay).await,
            Action::ClearPending => {
                self.facilities.slot.clear_slot();
                self.session.set(SessionState::Idle).await;
                self.notifier.notify();
                Ok(())
            }
        }
    }

    /// The armed timer for `payload` went off
    pub async fn on_timer_fired(&self, payload: TimerPayload) -> DomainResult<()> {
        let guard = self.state.lock_rotation().await;
        match self.items.find_by_id(payload.item_id).await? {
            Some(item) => self.show(&guard, &item).await,
            None => {
                log::warn!("Timer fired for missing item {}, recovering", payload.item_id);
                self.restore_locked(&guard).await.map(|_| ())
            }
        }
    }

    /// The user picked a priority on the shown item: store it and move on.
    /// Returns the item scheduled next, `None` when the store is empty.
    pub async fn on_priority_selected(
        &self,
        item_id: ItemId,
        priority: Priority,
    ) -> DomainResult<Option<Item>> {
        log::info!("Priority selected: id={} priority={}", item_id, priority.label());

        match self.items.set_priority(item_id, priority).await {
            Ok(()) => self.notifier.notify(),
            Err(e) if e.is_not_found() => log::warn!("Priority for missing item {} skipped", item_id),
            Err(e) => return Err(e),
        }

        let guard = self.state.lock_rotation().await;
        self.facilities.slot.clear_slot();

        let next = self.engine.get_next_locked(&guard, Some(item_id)).await?;
        self.state.set_pending_item_id(next.as_ref().map(|n| n.id)).await?;

        match &next {
            Some(item) => {
                let delay = self.state.get_delay().await?;
                self.arm(&guard, item, delay).await?;
            }
            None => {
                log::info!("No items left, nothing to schedule");
                self.session.set(SessionState::Idle).await;
                self.notifier.notify();
            }
        }
        Ok(next)
    }

    /// Pronounce the item. Playback problems are logged and otherwise ignored.
    pub async fn on_replay(&self, item_id: ItemId) -> DomainResult<()> {
        let Some(item) = self.items.find_by_id(item_id).await? else {
            log::warn!("Replay for missing item {} ignored", item_id);
            return Ok(());
        };

        let content = SlotContent::for_item(&item, &self.tts_language);
        if let Err(e) = self.facilities.audio.play(&content.audio_url) {
            log::warn!("Audio playback failed for item {}: {}", item_id, e);
        }
        Ok(())
    }

    /// The slot was dismissed without an action: show the same item again later
    pub async fn on_dismissed(&self, item_id: ItemId) -> DomainResult<()> {
        let guard = self.state.lock_rotation().await;
        match self.items.find_by_id(item_id).await? {
            Some(item) => {
                log::info!("Item {} dismissed, snoozing", item_id);
                let delay = self.state.get_delay().await?;
                self.arm(&guard, &item, delay).await
            }
            None => {
                log::warn!("Dismissed item {} no longer exists, recovering", item_id);
                self.restore_locked(&guard).await.map(|_| ())
            }
        }
    }

    /// Make `item_id` the pending item and arm it right away.
    /// Unknown ids are ignored and yield `None`.
    pub async fn schedule_immediate(&self, item_id: ItemId) -> DomainResult<Option<Item>> {
        let guard = self.state.lock_rotation().await;
        let Some(item) = self.items.find_by_id(item_id).await? else {
            log::warn!("Immediate schedule for missing item {} ignored", item_id);
            return Ok(None);
        };

        self.state.set_pending_item_id(Some(item.id)).await?;
        let delay = self.state.get_delay().await?;
        self.arm(&guard, &item, delay).await?;
        Ok(Some(item))
    }

    /// Arm the timer for `item`, or show it at once when `delay` is zero.
    /// Any other item still in the slot is taken down first.
    async fn arm(&self, guard: &RotationGuard, item: &Item, delay: Duration) -> DomainResult<()> {
        if delay.is_zero() {
            return self.show(guard, item).await;
        }

        if self.facilities.slot.is_slot_occupied()
            && self.session.state().await != SessionState::Shown(item.id)
        {
            log::info!("Clearing slot before scheduling item {}", item.id);
            self.facilities.slot.clear_slot();
        }

        self.session.set(SessionState::Scheduled(item.id)).await;
        self.notifier.notify();

        log::info!("Scheduling item {} in {}s", item.id, delay.as_secs());
        self.facilities
            .timer
            .arm_after(delay, TimerPayload::for_item(item.id))
            .map_err(|e| {
                log::error!("Timer rejected item {}: {}", item.id, e);
                DomainError::Internal(e.to_string())
            })
    }

    /// Put `item` into the slot, replacing any previous occupant
    async fn show(&self, _guard: &RotationGuard, item: &Item) -> DomainResult<()> {
        self.state.set_pending_item_id(Some(item.id)).await?;
        self.session.set(SessionState::Shown(item.id)).await;
        self.notifier.notify();

        // Same slot identity for every item: clear first so the new item does
        // not inherit the previous occupant's expanded/collapsed state
        self.facilities.slot.clear_slot();
        let content = SlotContent::for_item(item, &self.tts_language);
        log::info!("Showing item {} '{}'", item.id, item.front);
        self.facilities.slot.occupy_slot(&content).map_err(|e| {
            log::error!("Presentation failed for item {}: {}", item.id, e);
            DomainError::Internal(e.to_string())
        })
    }
}
