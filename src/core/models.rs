use std::collections::{
    BTreeMap,
    HashMap,
};

use serde::{
    Deserialize,
    Serialize,
};

/// Scheduler card type, as stored by Anki in `cards.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CardType {
    New,
    Learning,
    Review,
    Relearning,
}

impl CardType {
    /// Anything that has left the new queue has an interval worth averaging.
    pub fn is_scheduled(self) -> bool {
        !matches!(self, CardType::New)
    }

    /// Cards whose due dates feed the per-unit earliest-due tracking.
    pub fn tracks_due(self) -> bool {
        matches!(self, CardType::Review)
    }
}

impl From<CardType> for u8 {
    fn from(card_type: CardType) -> Self {
        match card_type {
            CardType::New => 0,
            CardType::Learning => 1,
            CardType::Review => 2,
            CardType::Relearning => 3,
        }
    }
}

impl TryFrom<u8> for CardType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CardType::New),
            1 => Ok(CardType::Learning),
            2 => Ok(CardType::Review),
            3 => Ok(CardType::Relearning),
            other => Err(format!("unknown card type {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub card_id: u64,
    pub note_id: u64,
    pub sequence: u64, // Externally assigned, drives "order found"
    pub card_type: CardType,
    pub interval: f64, // Days
    pub due: i64,
    #[serde(default)]
    pub original_due: i64,
    #[serde(default)]
    pub modified: i64,
}

/// `(name, text)` pairs of a single note, in the note type's field order.
pub type NoteFields = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitProfile {
    pub value: char,
    pub first_seen: Option<u64>,
    pub count: u32,
    pub avg_interval: f64,
    pub due: Option<i64>,
    pub original_due: Option<i64>,
    pub last_change: Option<i64>,
}

impl UnitProfile {
    pub fn new(value: char) -> Self {
        Self {
            value,
            first_seen: None,
            count: 0,
            avg_interval: 0.0,
            due: None,
            original_due: None,
            last_change: None,
        }
    }

    pub fn add_card(&mut self, card: &CardRecord) {
        if card.card_type.is_scheduled() {
            let total = self.avg_interval * self.count as f64 + card.interval;
            self.count += 1;
            self.avg_interval = total / self.count as f64;
        }

        if card.card_type.tracks_due() {
            if self.due.map_or(true, |due| card.due < due) {
                self.due = Some(card.due);
            }
            // last_change follows the winning original due
            if self.original_due.map_or(true, |odue| card.original_due < odue) {
                self.original_due = Some(card.original_due);
                self.last_change = Some(card.original_due);
            }
        }

        if self.first_seen.map_or(true, |seen| card.sequence < seen) {
            self.first_seen = Some(card.sequence);
        }
    }

    pub fn is_reviewed(&self) -> bool {
        self.count > 0
    }

    /// `None` until at least one scheduled card contributed.
    pub fn strength(&self, strong_interval: u32) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(crate::grid::scoring::strength(self.avg_interval, strong_interval))
    }

    /// Sort key for score-based orderings, unreviewed units rank as zero.
    pub fn sort_strength(&self, strong_interval: u32) -> f64 {
        self.strength(strong_interval).unwrap_or(0.0)
    }
}

pub type UnitMap = BTreeMap<char, UnitProfile>;

/// Cards plus the fields of the notes they belong to, as handed over by a host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionDump {
    pub cards: Vec<CardRecord>,
    pub notes: HashMap<u64, NoteFields>,
}
