//! Scheduler Layer
//!
//! Word rotation on top of the repositories:
//! - rotation: picks the next item from the cycle counter and priorities
//! - recovery: rebuilds a consistent pending item after any interruption
//! - lifecycle: moves the single slot through scheduled / shown / resolved
//! - facility: interfaces of the host's slot, timer and audio
//! - events: change notifications for observers

mod events;
mod facility;
mod lifecycle;
mod recovery;
mod rotation;
mod session;


pub use events::{ChangeNotifier, StateChanged, STATE_CHANGED_EVENT};
pub use facility::{
    pronunciation_url, AudioFacility, Facilities, FacilityError, PresentationFacility,
    SlotContent, TimerFacility, TimerPayload, PRESENTATION_SLOT_KEY,
};
pub use lifecycle::PresentationController;
pub use recovery::{Action, RecoveryCoordinator};
pub use rotation::{first_qualifying, RotationEngine, MAX_PASSES};
pub use session::{PresentationSession, SessionState};
