//! Study deck assembly.
//!
//! A deck is the list of cards shown in one session: due items that already
//! carry a memory state, most overdue first, followed by a batch of items
//! never seen before.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::manager::MemoryManager;
use crate::model::ItemId;
use crate::scheduler::Scheduler;

/// Limits on the size and order of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckPolicy {
    /// At most this many due items per session.
    #[serde(default = "default_max_review")]
    pub max_review: usize,
    /// At most this many unseen items per session.
    #[serde(default = "default_max_new")]
    pub max_new: usize,
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
}

fn default_max_review() -> usize {
    5
}

fn default_max_new() -> usize {
    5
}

fn default_shuffle() -> bool {
    true
}

impl Default for DeckPolicy {
    fn default() -> Self {
        Self {
            max_review: default_max_review(),
            max_new: default_max_new(),
            shuffle: default_shuffle(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    New,
    Review,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckCard {
    pub item: ItemId,
    pub kind: CardKind,
    /// Review priority at assembly time; 1 for new cards.
    pub priority: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub cards: Vec<DeckCard>,
}

impl Deck {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn new_count(&self) -> usize {
        self.count(CardKind::New)
    }

    pub fn review_count(&self) -> usize {
        self.count(CardKind::Review)
    }

    fn count(&self, kind: CardKind) -> usize {
        self.cards.iter().filter(|c| c.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeckCard> {
        self.cards.iter()
    }
}

/// Pick the cards for one session from `items`.
///
/// Items without a stored state, or whose state has never been reviewed,
/// are new. Reviewed items are candidates only when due. Duplicate ids in
/// `items` are considered once.
pub fn assemble_deck<R: Rng + ?Sized>(
    items: &[ItemId],
    manager: &MemoryManager,
    scheduler: &Scheduler,
    policy: &DeckPolicy,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Deck {
    let mut seen = std::collections::BTreeSet::new();
    let mut review = Vec::new();
    let mut new = Vec::new();

    for id in items {
        if !seen.insert(id) {
            continue;
        }
        match manager.get(id) {
            Some(state) if state.is_new() => new.push(DeckCard {
                item: id.clone(),
                kind: CardKind::New,
                priority: 1.0,
            }),
            Some(state) if scheduler.is_due(state, now) => review.push(DeckCard {
                item: id.clone(),
                kind: CardKind::Review,
                priority: scheduler.review_priority(state, now),
            }),
            Some(_) => {}
            None => new.push(DeckCard {
                item: id.clone(),
                kind: CardKind::New,
                priority: 1.0,
            }),
        }
    }

    review.sort_by(|a, b| b.priority.total_cmp(&a.priority));
    review.truncate(policy.max_review);
    new.truncate(policy.max_new);

    let mut cards = review;
    cards.extend(new);
    if policy.shuffle {
        cards.shuffle(rng);
    }

    let deck = Deck { cards };
    tracing::debug!(
        review = deck.review_count(),
        new = deck.new_count(),
        "assembled deck"
    );
    deck
}
