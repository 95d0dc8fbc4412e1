//! Core data model types for lexirep.
//!
//! These are the per-item types the scheduler and the memory manager operate
//! on: ratings, item identifiers, memory states and their classification.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// Interval (in days) at which an item counts as mastered.
pub const MASTERY_THRESHOLD_DAYS: u32 = 30;

/// A learner's recall rating for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Rating {
    /// The item was forgotten.
    Again = 1,
    /// Recalled with serious difficulty.
    Hard = 2,
    /// Recalled after some hesitation.
    Good = 3,
    /// Recalled effortlessly.
    Easy = 4,
}

impl Rating {
    /// All ratings in ascending order.
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// The ordinal value used by the model formulas (1-4).
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Returns `true` for every rating except `again`.
    pub fn is_recall(self) -> bool {
        self != Rating::Again
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Again => write!(f, "again"),
            Rating::Hard => write!(f, "hard"),
            Rating::Good => write!(f, "good"),
            Rating::Easy => write!(f, "easy"),
        }
    }
}

impl FromStr for Rating {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "again" | "1" => Ok(Rating::Again),
            "hard" | "2" => Ok(Rating::Hard),
            "good" | "3" => Ok(Rating::Good),
            "easy" | "4" => Ok(Rating::Easy),
            other => Err(SchedulerError::InvalidRating(other.to_string())),
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = SchedulerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rating::Again),
            2 => Ok(Rating::Hard),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::Easy),
            other => Err(SchedulerError::InvalidRating(other.to_string())),
        }
    }
}

/// Stable identifier of a learning item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Coarse learning stage derived from a memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryStrength {
    New,
    Learning,
    Mastered,
    Review,
}

impl fmt::Display for MemoryStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryStrength::New => write!(f, "new"),
            MemoryStrength::Learning => write!(f, "learning"),
            MemoryStrength::Mastered => write!(f, "mastered"),
            MemoryStrength::Review => write!(f, "review"),
        }
    }
}

/// The memory model's view of one item.
///
/// Values are validated on construction: stability is finite and positive,
/// difficulty lies in [1, 10], retrievability in [0, 1] and the interval is
/// at least one day. A state is only ever replaced by the output of a review
/// transition, never edited in place by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MemoryRecord", into = "MemoryRecord")]
pub struct MemoryState {
    pub(crate) difficulty: f64,
    pub(crate) stability: f64,
    pub(crate) retrievability: f64,
    pub(crate) last_review: Option<DateTime<Utc>>,
    pub(crate) next_review: Option<DateTime<Utc>>,
    pub(crate) interval: u32,
    pub(crate) repetitions: u32,
    pub(crate) lapses: u32,
}

impl MemoryState {
    /// Create an unreviewed state with the given difficulty and stability.
    pub fn new(difficulty: f64, stability: f64) -> Result<Self, SchedulerError> {
        MemoryRecord {
            difficulty,
            stability,
            ..MemoryRecord::default()
        }
        .try_into()
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn stability(&self) -> f64 {
        self.stability
    }

    /// Predicted recall probability at the most recent review.
    pub fn retrievability(&self) -> f64 {
        self.retrievability
    }

    pub fn last_review(&self) -> Option<DateTime<Utc>> {
        self.last_review
    }

    /// Scheduled next review; `None` means the item is due immediately.
    pub fn next_review(&self) -> Option<DateTime<Utc>> {
        self.next_review
    }

    /// Days between the last review and the next one.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    pub fn lapses(&self) -> u32 {
        self.lapses
    }

    pub fn is_new(&self) -> bool {
        self.repetitions == 0
    }

    /// Reviewed at least once and scheduled at least
    /// [`MASTERY_THRESHOLD_DAYS`] out.
    pub fn is_mastered(&self) -> bool {
        !self.is_new() && self.interval >= MASTERY_THRESHOLD_DAYS
    }

    pub fn is_learning(&self) -> bool {
        self.repetitions > 0 && self.interval < MASTERY_THRESHOLD_DAYS
    }

    /// Classify the state. `new` wins over everything, then `mastered`.
    pub fn memory_strength(&self) -> MemoryStrength {
        if self.is_new() {
            MemoryStrength::New
        } else if self.is_mastered() {
            MemoryStrength::Mastered
        } else if self.is_learning() {
            MemoryStrength::Learning
        } else {
            MemoryStrength::Review
        }
    }

    /// Count one completed review, and a lapse if it was rated `again`.
    pub(crate) fn count_review(&mut self, rating: Rating) {
        self.repetitions = self.repetitions.saturating_add(1);
        if rating == Rating::Again {
            self.lapses = self.lapses.saturating_add(1);
        }
    }

    /// The persistence record for this state.
    pub fn to_record(&self) -> MemoryRecord {
        MemoryRecord::from(self.clone())
    }
}

/// Flat key/value form of a [`MemoryState`] used for persistence.
///
/// Timestamps are RFC 3339 strings; absent timestamps are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    pub difficulty: f64,
    pub stability: f64,
    #[serde(default = "default_retrievability")]
    pub retrievability: f64,
    #[serde(default)]
    pub last_review: Option<DateTime<Utc>>,
    #[serde(default, rename = "nextReviewDate")]
    pub next_review: Option<DateTime<Utc>>,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub repetitions: u32,
    #[serde(default)]
    pub lapses: u32,
}

fn default_retrievability() -> f64 {
    1.0
}

fn default_interval() -> u32 {
    1
}

impl Default for MemoryRecord {
    fn default() -> Self {
        Self {
            difficulty: 5.0,
            stability: 1.0,
            retrievability: default_retrievability(),
            last_review: None,
            next_review: None,
            interval: default_interval(),
            repetitions: 0,
            lapses: 0,
        }
    }
}

impl TryFrom<MemoryRecord> for MemoryState {
    type Error = SchedulerError;

    fn try_from(r: MemoryRecord) -> Result<Self, Self::Error> {
        if !r.stability.is_finite() || r.stability <= 0.0 {
            return Err(SchedulerError::InvalidStability(r.stability));
        }
        if !(1.0..=10.0).contains(&r.difficulty) {
            return Err(SchedulerError::InvalidDifficulty(r.difficulty));
        }
        if !(0.0..=1.0).contains(&r.retrievability) {
            return Err(SchedulerError::InvalidRetrievability(r.retrievability));
        }
        if r.interval == 0 {
            return Err(SchedulerError::InvalidInterval(r.interval));
        }
        Ok(Self {
            difficulty: r.difficulty,
            stability: r.stability,
            retrievability: r.retrievability,
            last_review: r.last_review,
            next_review: r.next_review,
            interval: r.interval,
            repetitions: r.repetitions,
            lapses: r.lapses,
        })
    }
}

impl From<MemoryState> for MemoryRecord {
    fn from(s: MemoryState) -> Self {
        Self {
            difficulty: s.difficulty,
            stability: s.stability,
            retrievability: s.retrievability,
            last_review: s.last_review,
            next_review: s.next_review,
            interval: s.interval,
            repetitions: s.repetitions,
            lapses: s.lapses,
        }
    }
}

/// Whether an item has been reviewed before.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemState {
    /// No review has ever been recorded.
    Unseen,
    /// The item carries a memory state from earlier reviews.
    Reviewed(MemoryState),
}

impl ItemState {
    pub fn as_reviewed(&self) -> Option<&MemoryState> {
        match self {
            ItemState::Unseen => None,
            ItemState::Reviewed(state) => Some(state),
        }
    }
}

impl From<Option<MemoryState>> for ItemState {
    fn from(state: Option<MemoryState>) -> Self {
        state.map_or(ItemState::Unseen, ItemState::Reviewed)
    }
}

impl From<Option<&MemoryState>> for ItemState {
    fn from(state: Option<&MemoryState>) -> Self {
        state.cloned().into()
    }
}
