//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod item_repo;
mod scheduler_state_repo;
mod settings_repo;


pub use traits::Repository;
pub use db::{init_db, DbState, SharedConnection};
pub use item_repo::ItemRepository;
pub use scheduler_state_repo::{RotationGuard, SchedulerStateRepository};
pub use settings_repo::SettingsRepository;
