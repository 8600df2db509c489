//! Recording fakes of the host facilities, shared by the test modules.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::ItemId;
use crate::repository::init_db;
use crate::scheduler::{
    AudioFacility, Facilities, FacilityError, PresentationFacility, SlotContent, TimerFacility,
    TimerPayload,
};
use crate::{AppConfig, AppState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotEvent {
    Cleared,
    Occupied(ItemId),
}

#[derive(Default)]
pub struct FakeSlot {
    current: Mutex<Option<SlotContent>>,
    events: Mutex<Vec<SlotEvent>>,
    pub fail: AtomicBool,
}

impl FakeSlot {
    pub fn current(&self) -> Option<SlotContent> {
        self.current.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<SlotEvent> {
        self.events.lock().unwrap().clone()
    }

    /// What the user does when swiping the slot away
    pub fn user_dismiss(&self) {
        *self.current.lock().unwrap() = None;
    }
}

impl PresentationFacility for FakeSlot {
    fn occupy_slot(&self, content: &SlotContent) -> Result<(), FacilityError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(FacilityError("slot unavailable".to_string()));
        }
        let mut current = self.current.lock().unwrap();
        assert!(current.is_none(), "slot occupied twice without clearing");
        *current = Some(content.clone());
        self.events.lock().unwrap().push(SlotEvent::Occupied(content.item_id));
        Ok(())
    }

    fn clear_slot(&self) {
        *self.current.lock().unwrap() = None;
        self.events.lock().unwrap().push(SlotEvent::Cleared);
    }

    fn is_slot_occupied(&self) -> bool {
        self.current.lock().unwrap().is_some()
    }
}

#[derive(Default)]
pub struct FakeTimer {
    armed: Mutex<Vec<(Duration, TimerPayload)>>,
    pub fail: AtomicBool,
}

impl FakeTimer {
    pub fn armed(&self) -> Vec<(Duration, TimerPayload)> {
        self.armed.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<(Duration, TimerPayload)> {
        self.armed.lock().unwrap().last().copied()
    }
}

impl TimerFacility for FakeTimer {
    fn arm_after(&self, delay: Duration, payload: TimerPayload) -> Result<(), FacilityError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(FacilityError("alarm rejected".to_string()));
        }
        self.armed.lock().unwrap().push((delay, payload));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeAudio {
    played: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

impl FakeAudio {
    pub fn played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }
}

impl AudioFacility for FakeAudio {
    fn play(&self, identifier: &str) -> Result<(), FacilityError> {
        self.played.lock().unwrap().push(identifier.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(FacilityError("no network".to_string()));
        }
        Ok(())
    }
}

pub struct Harness {
    pub app: AppState,
    pub slot: Arc<FakeSlot>,
    pub timer: Arc<FakeTimer>,
    pub audio: Arc<FakeAudio>,
}

impl Harness {
    /// A new process on the same database and host facilities: the
    /// in-memory session starts blank, the slot and timer survive
    pub fn restart(&self) -> AppState {
        let facilities = Facilities::new(self.slot.clone(), self.timer.clone(), self.audio.clone());
        AppState::with_db(
            self.app.config.clone(),
            self.app.db_state.clone(),
            facilities,
        )
    }
}

/// App state over an in-memory database and fresh fakes
pub async fn harness() -> Harness {
    let db_state = init_db(Path::new(":memory:")).await.expect("Failed to init test DB");
    let slot = Arc::new(FakeSlot::default());
    let timer = Arc::new(FakeTimer::default());
    let audio = Arc::new(FakeAudio::default());
    let facilities = Facilities::new(slot.clone(), timer.clone(), audio.clone());

    let app = AppState::with_db(AppConfig::new("/tmp/memory-trigger-test"), db_state, facilities);
    Harness {
        app,
        slot,
        timer,
        audio,
    }
}
