//! Rotation Engine
//!
//! Priority-gated round robin over ascending item ids.
//!
//! One global `cycle` counter is shared by the whole list. An item is
//! eligible when `cycle % priority == 0`, so High items show every lap,
//! Medium every second lap and Low every third. The counter advances only
//! when a scan reaches the end of the list without finding anything to show.

use std::sync::Arc;

use crate::domain::{DomainError, DomainResult, Item, ItemId};
use crate::repository::{ItemRepository, RotationGuard, SchedulerStateRepository};

/// Upper bound on list scans per decision. With priorities 1..=3 a non-empty
/// list always yields an item within four passes.
pub const MAX_PASSES: usize = 20;

/// First item in `candidates` eligible in `cycle`
pub fn first_qualifying(candidates: &[Item], cycle: u32) -> Option<&Item> {
    candidates.iter().find(|item| item.priority.qualifies(cycle))
}

pub struct RotationEngine {
    items: Arc<ItemRepository>,
    state: Arc<SchedulerStateRepository>,
}

impl RotationEngine {
    pub fn new(items: Arc<ItemRepository>, state: Arc<SchedulerStateRepository>) -> Self {
        Self { items, state }
    }

    /// Next item after `anchor`, taking the rotation lock for the duration
    pub async fn get_next(&self, anchor: Option<ItemId>) -> DomainResult<Option<Item>> {
        let guard = self.state.lock_rotation().await;
        self.get_next_locked(&guard, anchor).await
    }

    /// Next item after `anchor` for a caller already inside the rotation lock.
    ///
    /// `anchor` need not exist any more; it is only compared against ids.
    /// Returns `None` only for an empty store.
    pub async fn get_next_locked(
        &self,
        _guard: &RotationGuard,
        anchor: Option<ItemId>,
    ) -> DomainResult<Option<Item>> {
        // An empty list would only spin the cycle counter
        if self.items.is_empty().await? {
            return Ok(None);
        }

        let mut cycle = self.state.get_cycle().await?;
        let mut search_from = anchor;

        for pass in 1..=MAX_PASSES {
            let candidates = self.items.list_after(search_from).await?;
            if let Some(item) = first_qualifying(&candidates, cycle) {
                log::debug!(
                    "Next item id={} (anchor={:?}, cycle={}, pass={})",
                    item.id,
                    anchor,
                    cycle,
                    pass
                );
                return Ok(Some(item.clone()));
            }

            cycle = cycle
                .checked_add(1)
                .ok_or_else(|| DomainError::Internal("Cycle counter overflow".to_string()))?;
            self.state.set_cycle(cycle).await?;
            search_from = None;
            log::info!("Lap exhausted, cycle advanced to {}", cycle);
        }

        log::warn!(
            "No eligible item after {} passes (cycle={}), falling back to the first item",
            MAX_PASSES,
            cycle
        );
        self.items.first_by_id().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;

    fn item(id: ItemId, priority: Priority) -> Item {
        let mut item = Item::new(id, format!("w{}", id), String::new());
        item.priority = priority;
        item
    }

    #[test]
    fn test_first_qualifying_respects_divisor() {
        let list = vec![item(1, Priority::Low), item(2, Priority::Medium), item(3, Priority::High)];

        assert_eq!(first_qualifying(&list, 1).map(|i| i.id), Some(3));
        assert_eq!(first_qualifying(&list, 2).map(|i| i.id), Some(2));
        assert_eq!(first_qualifying(&list, 3).map(|i| i.id), Some(1));
        assert_eq!(first_qualifying(&list, 6).map(|i| i.id), Some(1));
    }

    #[test]
    fn test_first_qualifying_none() {
        let list = vec![item(1, Priority::Low), item(2, Priority::Medium)];
        assert!(first_qualifying(&list, 1).is_none());
        assert!(first_qualifying(&[], 1).is_none());
    }
}
