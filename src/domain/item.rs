//! Item Entity
//!
//! A vocabulary entry: foreign word on the front, translation on the back,
//! plus the priority that gates how often the rotation shows it.

use serde::{Deserialize, Serialize};
use super::entity::{DomainError, DomainResult, Entity};

/// Item identifier, assigned by the store in insertion order and never reused
pub type ItemId = u32;

/// How often an item comes up in the rotation.
///
/// The numeric value is a divisor of the global cycle counter: an item is
/// eligible in every cycle that is a multiple of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Priority {
    /// Every cycle
    #[default]
    High = 1,
    /// Every second cycle
    Medium = 2,
    /// Every third cycle
    Low = 3,
}

impl Priority {
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Decode a stored value. Rows written before priorities existed, or with
    /// a value outside 1..=3, are treated as High.
    pub fn from_i32(value: i32) -> Self {
        Self::try_from(value).unwrap_or_default()
    }

    pub fn divisor(&self) -> u32 {
        *self as u32
    }

    /// Whether an item of this priority is eligible in `cycle`
    pub fn qualifies(&self, cycle: u32) -> bool {
        cycle % self.divisor() == 0
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl From<Priority> for i32 {
    fn from(priority: Priority) -> Self {
        priority.as_i32()
    }
}

impl TryFrom<i32> for Priority {
    type Error = DomainError;

    fn try_from(value: i32) -> DomainResult<Self> {
        match value {
            1 => Ok(Priority::High),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::Low),
            other => Err(DomainError::InvalidInput(format!(
                "priority must be 1, 2 or 3, got {}",
                other
            ))),
        }
    }
}

/// A vocabulary item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier (0 until stored)
    pub id: ItemId,
    /// Foreign word, never empty
    pub front: String,
    /// Translation
    pub back: String,
    /// Creation time, unix milliseconds
    pub created_at: i64,
    pub priority: Priority,
}

impl Item {
    /// Create an unsaved item with default priority
    pub fn new(id: ItemId, front: String, back: String) -> Self {
        Self {
            id,
            front,
            back,
            created_at: chrono::Utc::now().timestamp_millis(),
            priority: Priority::default(),
        }
    }

    /// Reject items the store must never hold
    pub fn validate(&self) -> DomainResult<()> {
        validate_front(&self.front)
    }
}

pub fn validate_front(front: &str) -> DomainResult<()> {
    if front.trim().is_empty() {
        return Err(DomainError::InvalidInput("front text must not be empty".to_string()));
    }
    Ok(())
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// One row of a bulk import. Field aliases accept the host's word-list keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    #[serde(alias = "foreign_word")]
    pub front: String,
    #[serde(alias = "translation", default)]
    pub back: String,
}

impl ImportEntry {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_creation() {
        let item = Item::new(0, "Haus".to_string(), "house".to_string());
        assert_eq!(item.id(), 0);
        assert_eq!(item.priority, Priority::High);
        assert!(item.created_at > 0);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_blank_front_rejected() {
        let item = Item::new(0, "   ".to_string(), "nothing".to_string());
        assert!(matches!(item.validate(), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_priority_qualification() {
        assert!((1..=12).all(|c| Priority::High.qualifies(c)));
        assert!(!Priority::Medium.qualifies(1));
        assert!(Priority::Medium.qualifies(2));
        assert!(!Priority::Low.qualifies(2));
        assert!(Priority::Low.qualifies(3));
        assert!(Priority::Low.qualifies(6));
    }

    #[test]
    fn test_priority_decoding() {
        assert_eq!(Priority::from_i32(2), Priority::Medium);
        assert_eq!(Priority::from_i32(0), Priority::High);
        assert_eq!(Priority::from_i32(9), Priority::High);
        assert!(Priority::try_from(4).is_err());
        assert_eq!(Priority::Low.label(), "Low");
    }

    #[test]
    fn test_priority_serializes_as_number() {
        let json = serde_json::to_string(&Priority::Medium).unwrap();
        assert_eq!(json, "2");
        let parsed: Priority = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Priority::Low);
        assert!(serde_json::from_str::<Priority>("5").is_err());
    }

    #[test]
    fn test_import_entry_accepts_word_list_keys() {
        let entry: ImportEntry =
            serde_json::from_str(r#"{"foreign_word": "Baum", "translation": "tree"}"#).unwrap();
        assert_eq!(entry, ImportEntry::new("Baum", "tree"));

        let bare: ImportEntry = serde_json::from_str(r#"{"front": "Hund"}"#).unwrap();
        assert_eq!(bare.back, "");
    }
}
