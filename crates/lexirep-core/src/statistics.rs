//! Collection statistics and study progress.
//!
//! [`MemoryStatistics`] is a snapshot computed from the stored states;
//! [`StudyProgress`] is the running tally kept across sessions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::manager::ReviewOutcome;
use crate::model::{MemoryState, MemoryStrength};
use crate::scheduler::Scheduler;

/// Classification counts for a set of memory states.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStatistics {
    /// Number of states considered.
    pub total: usize,
    pub new: usize,
    pub learning: usize,
    pub mastered: usize,
    pub review: usize,
    /// States whose next review has come.
    pub due: usize,
    /// Mean predicted recall right now; 0 for an empty collection.
    pub mean_retrievability: f64,
}

/// Count states by class and due status.
pub fn compute_statistics<'a>(
    states: impl IntoIterator<Item = &'a MemoryState>,
    scheduler: &Scheduler,
    now: DateTime<Utc>,
) -> MemoryStatistics {
    let mut stats = MemoryStatistics::default();
    let mut retrievability_sum = 0.0;

    for state in states {
        stats.total += 1;
        match state.memory_strength() {
            MemoryStrength::New => stats.new += 1,
            MemoryStrength::Learning => stats.learning += 1,
            MemoryStrength::Mastered => stats.mastered += 1,
            MemoryStrength::Review => stats.review += 1,
        }
        if scheduler.is_due(state, now) {
            stats.due += 1;
        }
        retrievability_sum += scheduler.current_retrievability(state, now);
    }

    if stats.total > 0 {
        stats.mean_retrievability = retrievability_sum / stats.total as f64;
    }
    stats
}

/// Running study tally persisted alongside the memory states.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyProgress {
    /// Size of the word list last studied.
    pub total_words: usize,
    /// Items that have crossed into the mastered class.
    pub mastered_words: usize,
    /// Consecutive study days ending at `last_study_date`.
    pub streak: u32,
    pub last_study_date: Option<NaiveDate>,
    /// Reviews recorded on `last_study_date`.
    pub today_count: u32,
}

impl StudyProgress {
    /// Mark `today` as a study day, updating the streak.
    pub fn begin_session(&mut self, today: NaiveDate) {
        match self.last_study_date {
            Some(last) if last == today => return,
            Some(last) if last.succ_opt() == Some(today) => self.streak += 1,
            _ => self.streak = 1,
        }
        self.today_count = 0;
        self.last_study_date = Some(today);
    }

    /// Count one review.
    pub fn record(&mut self, outcome: &ReviewOutcome) {
        self.today_count += 1;
        if outcome.became_mastered() {
            self.mastered_words += 1;
        }
    }
}
