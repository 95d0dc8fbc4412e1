//! Study content: words and word lists.
//!
//! The scheduler only ever sees [`ItemId`]s; everything else here is for
//! display.

use serde::{Deserialize, Serialize};

use crate::model::ItemId;

/// The built-in word list written by `lexirep init`.
pub const STARTER_WORDS_TOML: &str = include_str!("../data/starter.toml");

/// One vocabulary card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: ItemId,
    pub word: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pronunciation: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub example: String,
    /// Translation of `example`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub translation: String,
}

/// A named collection of words.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub words: Vec<Word>,
}

impl WordList {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Item ids in list order.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.words.iter().map(|w| w.id.clone()).collect()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Word> {
        self.words.iter().find(|w| &w.id == id)
    }

    /// Look a word up by id or, failing that, by its spelling.
    pub fn find(&self, key: &str) -> Option<&Word> {
        self.words
            .iter()
            .find(|w| w.id.as_str() == key)
            .or_else(|| self.words.iter().find(|w| w.word.eq_ignore_ascii_case(key)))
    }

    /// Concatenate several lists into one, keeping the first list's header.
    pub fn merge(lists: Vec<WordList>) -> WordList {
        let mut iter = lists.into_iter();
        let Some(mut first) = iter.next() else {
            return WordList::default();
        };
        for list in iter {
            first.words.extend(list.words);
        }
        first
    }
}
