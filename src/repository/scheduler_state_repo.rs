//! Scheduler State Repository
//!
//! Single-row table holding the cycle counter, the pending item and the
//! delay. Each accessor is its own short read or write; callers that need a
//! read-decide-write sequence to be atomic take the rotation lock first.

use rusqlite::{params, OptionalExtension};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    DomainError, DomainResult, ItemId, SchedulerState, DEFAULT_CYCLE, DEFAULT_DELAY_SECONDS,
};
use super::db::{connection, internal, SharedConnection};

/// Proof that the holder owns the rotation decision boundary.
///
/// Held from reading `cycle` until `pending_item_id` is written, so two
/// triggers cannot both advance the cycle or both pick a next item.
pub struct RotationGuard {
    _guard: OwnedMutexGuard<()>,
}

pub struct SchedulerStateRepository {
    conn: SharedConnection,
    rotation: Arc<Mutex<()>>,
}

impl SchedulerStateRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self {
            conn,
            rotation: Arc::new(Mutex::new(())),
        }
    }

    /// Wait for and take the rotation decision lock
    pub async fn lock_rotation(&self) -> RotationGuard {
        RotationGuard {
            _guard: self.rotation.clone().lock_owned().await,
        }
    }

    pub async fn get_cycle(&self) -> DomainResult<u32> {
        let value = self.read_column("cycle").await?;
        Ok(value
            .and_then(|v| u32::try_from(v).ok())
            .filter(|c| *c >= 1)
            .unwrap_or(DEFAULT_CYCLE))
    }

    pub async fn set_cycle(&self, cycle: u32) -> DomainResult<()> {
        if cycle < 1 {
            return Err(DomainError::InvalidInput("cycle must be at least 1".to_string()));
        }
        self.write_column("cycle", Some(i64::from(cycle))).await?;
        log::debug!("Global cycle updated: {}", cycle);
        Ok(())
    }

    pub async fn get_pending_item_id(&self) -> DomainResult<Option<ItemId>> {
        let value = self.read_column("pending_item_id").await?;
        Ok(value.and_then(|v| ItemId::try_from(v).ok()))
    }

    pub async fn set_pending_item_id(&self, id: Option<ItemId>) -> DomainResult<()> {
        self.write_column("pending_item_id", id.map(i64::from)).await?;
        log::debug!("Pending item updated: {:?}", id);
        Ok(())
    }

    pub async fn get_delay(&self) -> DomainResult<Duration> {
        let value = self.read_column("delay_seconds").await?;
        let seconds = value
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(DEFAULT_DELAY_SECONDS);
        Ok(Duration::from_secs(seconds))
    }

    /// Stored with whole-second precision
    pub async fn set_delay(&self, delay: Duration) -> DomainResult<()> {
        let seconds = i64::try_from(delay.as_secs())
            .map_err(|_| DomainError::InvalidInput("delay is too large".to_string()))?;
        self.write_column("delay_seconds", Some(seconds)).await?;
        log::info!("Delay updated: {}s", seconds);
        Ok(())
    }

    /// Read the whole row at once
    pub async fn load(&self) -> DomainResult<SchedulerState> {
        Ok(SchedulerState {
            cycle: self.get_cycle().await?,
            pending_item_id: self.get_pending_item_id().await?,
            delay: self.get_delay().await?,
        })
    }

    async fn read_column(&self, column: &'static str) -> DomainResult<Option<i64>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let value: Option<Option<i64>> = conn
            .query_row(
                &format!("SELECT {} FROM scheduler_state WHERE id = 1", column),
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(internal)?;
        Ok(value.flatten())
    }

    async fn write_column(&self, column: &'static str, value: Option<i64>) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        // The row is seeded by migrations, but a replaced database may lack it
        conn.execute(
            &format!(
                "INSERT INTO scheduler_state (id, {col}) VALUES (1, ?1)
                 ON CONFLICT(id) DO UPDATE SET {col} = excluded.{col}",
                col = column
            ),
            params![value],
        )
        .map_err(internal)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::init_db;
    use std::path::Path;

    async fn setup() -> SchedulerStateRepository {
        let db_state = init_db(Path::new(":memory:")).await.expect("Failed to init test DB");
        SchedulerStateRepository::new(db_state.conn.clone())
    }

    #[tokio::test]
    async fn test_defaults_on_fresh_db() {
        let repo = setup().await;
        let state = repo.load().await.unwrap();
        assert_eq!(state, SchedulerState::default());
        assert_eq!(state.delay, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_defaults_when_row_missing() {
        let repo = setup().await;
        {
            let guard = repo.conn.lock().await;
            guard.as_ref().unwrap().execute("DELETE FROM scheduler_state", []).unwrap();
        }
        assert_eq!(repo.get_cycle().await.unwrap(), 1);
        assert_eq!(repo.get_pending_item_id().await.unwrap(), None);

        repo.set_pending_item_id(Some(4)).await.unwrap();
        assert_eq!(repo.get_pending_item_id().await.unwrap(), Some(4));
        assert_eq!(repo.get_cycle().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_round_trip_fields() {
        let repo = setup().await;
        repo.set_cycle(7).await.unwrap();
        repo.set_pending_item_id(Some(12)).await.unwrap();
        repo.set_delay(Duration::from_secs(30)).await.unwrap();

        let state = repo.load().await.unwrap();
        assert_eq!(state.cycle, 7);
        assert_eq!(state.pending_item_id, Some(12));
        assert_eq!(state.delay, Duration::from_secs(30));

        repo.set_pending_item_id(None).await.unwrap();
        assert_eq!(repo.get_pending_item_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cycle_zero_rejected() {
        let repo = setup().await;
        assert!(matches!(repo.set_cycle(0).await, Err(DomainError::InvalidInput(_))));
        assert_eq!(repo.get_cycle().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_zero_delay_allowed() {
        let repo = setup().await;
        repo.set_delay(Duration::ZERO).await.unwrap();
        assert!(repo.get_delay().await.unwrap().is_zero());
    }

    #[tokio::test]
    async fn test_rotation_lock_is_exclusive() {
        let repo = setup().await;
        let guard = repo.lock_rotation().await;
        assert!(repo.rotation.try_lock().is_err());
        drop(guard);
        assert!(repo.rotation.try_lock().is_ok());
    }
}
