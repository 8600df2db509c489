//! External Facilities
//!
//! The core never renders, waits or plays sound itself. The host plugs in
//! these three collaborators.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{Item, ItemId, Priority};

/// Timer key of the single presentation slot. Arming again under this key
/// replaces the previous trigger.
pub const PRESENTATION_SLOT_KEY: u32 = 1001;

const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Characters left as-is in a query value, matching what browsers keep
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Failure reported by a facility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityError(pub String);

impl std::fmt::Display for FacilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Facility error: {}", self.0)
    }
}

impl std::error::Error for FacilityError {}

/// What the slot shows for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotContent {
    pub item_id: ItemId,
    pub front: String,
    pub back: String,
    /// Current priority, so the surface can highlight the matching button
    pub priority: Priority,
    /// Identifier handed to the audio facility on replay
    pub audio_url: String,
}

impl SlotContent {
    pub fn for_item(item: &Item, tts_language: &str) -> Self {
        Self {
            item_id: item.id,
            front: item.front.clone(),
            back: item.back.clone(),
            priority: item.priority,
            audio_url: pronunciation_url(&item.front, tts_language),
        }
    }
}

/// Text-to-speech URL that pronounces `word`
pub fn pronunciation_url(word: &str, language: &str) -> String {
    format!(
        "{}?ie=UTF-8&tl={}&client=tw-ob&q={}",
        TTS_ENDPOINT,
        utf8_percent_encode(language, QUERY_VALUE),
        utf8_percent_encode(word, QUERY_VALUE)
    )
}

/// Data carried by an armed timer and handed back when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerPayload {
    pub key: u32,
    pub item_id: ItemId,
}

impl TimerPayload {
    pub fn for_item(item_id: ItemId) -> Self {
        Self {
            key: PRESENTATION_SLOT_KEY,
            item_id,
        }
    }

    /// Encoding used when the payload crosses into the host's alarm system
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// The single display slot
pub trait PresentationFacility: Send + Sync {
    /// Put `content` into the slot
    fn occupy_slot(&self, content: &SlotContent) -> Result<(), FacilityError>;

    /// Remove whatever the slot holds
    fn clear_slot(&self);

    fn is_slot_occupied(&self) -> bool;
}

/// Delayed one-shot trigger
pub trait TimerFacility: Send + Sync {
    /// Fire `payload` once after `delay`, replacing any trigger armed under the same key
    fn arm_after(&self, delay: Duration, payload: TimerPayload) -> Result<(), FacilityError>;
}

/// Best-effort audio playback
pub trait AudioFacility: Send + Sync {
    fn play(&self, identifier: &str) -> Result<(), FacilityError>;
}

/// The three collaborators, as handed over by the host
#[derive(Clone)]
pub struct Facilities {
    pub slot: Arc<dyn PresentationFacility>,
    pub timer: Arc<dyn TimerFacility>,
    pub audio: Arc<dyn AudioFacility>,
}

impl Facilities {
    pub fn new(
        slot: Arc<dyn PresentationFacility>,
        timer: Arc<dyn TimerFacility>,
        audio: Arc<dyn AudioFacility>,
    ) -> Self {
        Self { slot, timer, audio }
    }
}
