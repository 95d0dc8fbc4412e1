//! TOML word list parser.
//!
//! Loads word lists from TOML files and directories, and validates them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::content::{Word, WordList, STARTER_WORDS_TOML};
use crate::model::ItemId;

/// Intermediate TOML structure for parsing word list files.
#[derive(Debug, Deserialize)]
struct TomlWordFile {
    word_list: TomlWordListHeader,
    #[serde(default)]
    words: Vec<TomlWord>,
}

#[derive(Debug, Deserialize)]
struct TomlWordListHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlWord {
    id: TomlId,
    word: String,
    #[serde(default)]
    pronunciation: String,
    #[serde(default)]
    meaning: String,
    #[serde(default)]
    example: String,
    #[serde(default)]
    translation: String,
}

/// Word ids may be written as integers or strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlId {
    Int(u64),
    Str(String),
}

impl From<TomlId> for ItemId {
    fn from(id: TomlId) -> Self {
        match id {
            TomlId::Int(n) => ItemId::from(n),
            TomlId::Str(s) => ItemId::from(s),
        }
    }
}

/// Parse a single TOML file into a `WordList`.
pub fn parse_word_list(path: &Path) -> Result<WordList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read word list file: {}", path.display()))?;

    parse_word_list_str(&content, path)
}

/// Parse a TOML string into a `WordList` (useful for testing).
pub fn parse_word_list_str(content: &str, source_path: &Path) -> Result<WordList> {
    let parsed: TomlWordFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let words = parsed
        .words
        .into_iter()
        .map(|w| Word {
            id: w.id.into(),
            word: w.word,
            pronunciation: w.pronunciation,
            meaning: w.meaning,
            example: w.example,
            translation: w.translation,
        })
        .collect();

    Ok(WordList {
        id: parsed.word_list.id,
        name: parsed.word_list.name,
        description: parsed.word_list.description,
        words,
    })
}

/// The built-in starter list.
pub fn starter_word_list() -> Result<WordList> {
    parse_word_list_str(STARTER_WORDS_TOML, Path::new("starter.toml"))
}

/// Recursively load all `.toml` word list files from a directory.
///
/// Files are visited in name order so item order is stable across runs.
pub fn load_word_directory(dir: &Path) -> Result<Vec<WordList>> {
    let mut lists = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            lists.extend(load_word_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_word_list(&path) {
                Ok(list) => lists.push(list),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(lists)
}

/// Load words from a single file or every list under a directory.
pub fn load_words(path: &Path) -> Result<WordList> {
    if path.is_dir() {
        Ok(WordList::merge(load_word_directory(path)?))
    } else {
        parse_word_list(path)
    }
}

/// A warning from word list validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The word ID (if applicable).
    pub item_id: Option<ItemId>,
    /// Warning message.
    pub message: String,
}

/// Validate a word list for common issues.
pub fn validate_word_list(list: &WordList) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if list.words.is_empty() {
        warnings.push(ValidationWarning {
            item_id: None,
            message: "word list has no words".into(),
        });
    }

    let mut seen_ids = std::collections::HashSet::new();
    for word in &list.words {
        if !seen_ids.insert(&word.id) {
            warnings.push(ValidationWarning {
                item_id: Some(word.id.clone()),
                message: format!("duplicate word ID: {}", word.id),
            });
        }
    }

    for word in &list.words {
        if word.word.trim().is_empty() {
            warnings.push(ValidationWarning {
                item_id: Some(word.id.clone()),
                message: "word is empty".into(),
            });
        }
        if word.meaning.trim().is_empty() {
            warnings.push(ValidationWarning {
                item_id: Some(word.id.clone()),
                message: "meaning is empty".into(),
            });
        }
    }

    warnings
}
