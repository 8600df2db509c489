//! Memory Trigger Core
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: SQLite data access
//! - scheduler: word rotation, recovery and the presentation lifecycle
//! - commands: handlers the host app calls across its bridge

use std::sync::Arc;
use tokio::sync::broadcast;

pub mod commands;
pub mod config;
pub mod domain;
pub mod repository;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::AppConfig;

use repository::{init_db, DbState, ItemRepository, SchedulerStateRepository, SettingsRepository};
use scheduler::{ChangeNotifier, Facilities, PresentationController, StateChanged};

/// Application state shared across commands
pub struct AppState {
    pub config: AppConfig,
    pub db_state: DbState,
    pub items: Arc<ItemRepository>,
    pub scheduler_state: Arc<SchedulerStateRepository>,
    pub settings: SettingsRepository,
    pub controller: PresentationController,
    pub notifier: ChangeNotifier,
}

impl AppState {
    /// Open the database from `config` and wire up the scheduler
    pub async fn open(config: AppConfig, facilities: Facilities) -> Result<Self, String> {
        std::fs::create_dir_all(&config.data_dir)
            .map_err(|e| format!("Failed to create data dir: {}", e))?;

        log::info!("[{}] App state opening", chrono::Local::now().format("%H:%M:%S%.3f"));
        let db_state = init_db(&config.db_path()).await?;
        Ok(Self::with_db(config, db_state, facilities))
    }

    /// Wire components onto an already initialized database
    pub fn with_db(config: AppConfig, db_state: DbState, facilities: Facilities) -> Self {
        let items = Arc::new(ItemRepository::new(db_state.conn.clone()));
        let scheduler_state = Arc::new(SchedulerStateRepository::new(db_state.conn.clone()));
        let settings = SettingsRepository::new(db_state.conn.clone());
        let notifier = ChangeNotifier::new();
        let controller = PresentationController::new(
            items.clone(),
            scheduler_state.clone(),
            facilities,
            notifier.clone(),
            config.tts_language.clone(),
        );

        Self {
            config,
            db_state,
            items,
            scheduler_state,
            settings,
            controller,
            notifier,
        }
    }

    /// Stream of change events for observers
    pub fn subscribe(&self) -> broadcast::Receiver<StateChanged> {
        self.notifier.subscribe()
    }
}

/// Start the rolling file logger for `config`
pub fn init_logging(config: &AppConfig) -> Result<(), String> {
    rolling_logger::init_logger(config.log_dir.clone(), &config.app_name)
}
