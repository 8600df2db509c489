//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! No storage or IO here; serde for serialization and chrono for timestamps only.

mod entity;
mod item;
mod scheduler_state;

pub use entity::{Entity, DomainError, DomainResult};
pub use item::{validate_front, ImportEntry, Item, ItemId, Priority};
pub use scheduler_state::{SchedulerState, Settings, DEFAULT_CYCLE, DEFAULT_DELAY_SECONDS};
