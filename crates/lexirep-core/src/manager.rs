//! Keyed collection of memory states.
//!
//! The manager is the only place that mutates the collection and the
//! authoritative owner of the repetition and lapse counters: the scheduler
//! computes new model numbers, the manager counts the review.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{ItemId, ItemState, MemoryState, MemoryStrength, Rating};
use crate::scheduler::Scheduler;
use crate::statistics::{compute_statistics, MemoryStatistics};

/// Memory states keyed by item.
///
/// Serializes as a map of item id to [`MemoryRecord`](crate::model::MemoryRecord).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryManager {
    states: BTreeMap<ItemId, MemoryState>,
}

/// The result of recording one review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub item: ItemId,
    pub rating: Rating,
    /// State before the review; `None` for a first review.
    pub previous: Option<MemoryState>,
    /// State after the review, counters included.
    pub current: MemoryState,
}

impl ReviewOutcome {
    /// `true` when this review moved the item into the mastered class.
    pub fn became_mastered(&self) -> bool {
        let was_mastered = self
            .previous
            .as_ref()
            .is_some_and(|p| p.memory_strength() == MemoryStrength::Mastered);
        !was_mastered && self.current.memory_strength() == MemoryStrength::Mastered
    }

    pub fn is_first_review(&self) -> bool {
        self.previous.is_none()
    }
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored state, or `None` for items never reviewed.
    pub fn get(&self, id: &ItemId) -> Option<&MemoryState> {
        self.states.get(id)
    }

    /// The scheduler's view of an item.
    pub fn item_state(&self, id: &ItemId) -> ItemState {
        self.get(id).into()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.states.contains_key(id)
    }

    /// Store a state, returning the one it replaced.
    pub fn set(&mut self, id: ItemId, state: MemoryState) -> Option<MemoryState> {
        self.states.insert(id, state)
    }

    /// Replace an item's state with a value computed from its current one.
    pub fn update<F>(&mut self, id: ItemId, f: F) -> &MemoryState
    where
        F: FnOnce(ItemState) -> MemoryState,
    {
        let next = f(self.item_state(&id));
        self.states.insert(id.clone(), next);
        &self.states[&id]
    }

    pub fn remove(&mut self, id: &ItemId) -> Option<MemoryState> {
        self.states.remove(id)
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &MemoryState)> {
        self.states.iter()
    }

    fn ids_where(&self, pred: impl Fn(&MemoryState) -> bool) -> Vec<ItemId> {
        self.states
            .iter()
            .filter(|(_, s)| pred(s))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn new_items(&self) -> Vec<ItemId> {
        self.ids_where(MemoryState::is_new)
    }

    pub fn learning_items(&self) -> Vec<ItemId> {
        self.ids_where(|s| s.memory_strength() == MemoryStrength::Learning)
    }

    pub fn mastered_items(&self) -> Vec<ItemId> {
        self.ids_where(|s| s.memory_strength() == MemoryStrength::Mastered)
    }

    pub fn due_items(&self, scheduler: &Scheduler, now: DateTime<Utc>) -> Vec<ItemId> {
        self.ids_where(|s| scheduler.is_due(s, now))
    }

    /// Due items with their priority, most overdue first. Ties keep id order.
    pub fn due_by_priority(&self, scheduler: &Scheduler, now: DateTime<Utc>) -> Vec<(ItemId, f64)> {
        let mut due: Vec<(ItemId, f64)> = self
            .states
            .iter()
            .filter(|(_, s)| scheduler.is_due(s, now))
            .map(|(id, s)| (id.clone(), scheduler.review_priority(s, now)))
            .collect();
        due.sort_by(|a, b| b.1.total_cmp(&a.1));
        due
    }

    pub fn statistics(&self, scheduler: &Scheduler, now: DateTime<Utc>) -> MemoryStatistics {
        compute_statistics(self.states.values(), scheduler, now)
    }

    /// Run one review through the scheduler, count it, and store the result.
    pub fn record_review<R: Rng + ?Sized>(
        &mut self,
        id: &ItemId,
        rating: Rating,
        scheduler: &Scheduler,
        now: DateTime<Utc>,
        elapsed_days: Option<f64>,
        rng: &mut R,
    ) -> ReviewOutcome {
        let previous = self.get(id).cloned();
        let mut current =
            scheduler.process_review(&previous.clone().into(), rating, now, elapsed_days, rng);
        current.count_review(rating);
        self.states.insert(id.clone(), current.clone());

        tracing::debug!(
            item = %id,
            %rating,
            repetitions = current.repetitions(),
            lapses = current.lapses(),
            interval = current.interval(),
            "recorded review"
        );

        ReviewOutcome {
            item: id.clone(),
            rating,
            previous,
            current,
        }
    }
}
