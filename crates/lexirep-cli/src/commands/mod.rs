//! Subcommand implementations and the state they share.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use lexirep_core::config::{load_config_from, LexirepConfig};
use lexirep_core::content::WordList;
use lexirep_core::parser::{load_words, starter_word_list};
use lexirep_core::store::Snapshot;
use lexirep_core::{ItemId, Scheduler};

pub mod due;
pub mod init;
pub mod preview;
pub mod review;
pub mod stats;
pub mod study;
pub mod transfer;
pub mod validate;

/// Global options every command receives.
pub struct Context {
    pub config_path: Option<PathBuf>,
    pub now: DateTime<Utc>,
}

/// Loaded configuration, scheduler, words and persisted state.
pub struct Workspace {
    pub config: LexirepConfig,
    pub scheduler: Scheduler,
    pub words: WordList,
    pub snapshot: Snapshot,
    pub now: DateTime<Utc>,
}

impl Workspace {
    pub fn open(ctx: &Context) -> Result<Self> {
        let config = load_config_from(ctx.config_path.as_deref())?;
        let scheduler = config.build_scheduler()?;
        let words = if config.words.exists() {
            load_words(&config.words)?
        } else {
            tracing::debug!(
                "{} not found, using the built-in starter list",
                config.words.display()
            );
            starter_word_list()?
        };
        let snapshot = Snapshot::load_or_default(&config.state_file)?;

        Ok(Self {
            config,
            scheduler,
            words,
            snapshot,
            now: ctx.now,
        })
    }

    /// Persist the snapshot to the configured state file.
    pub fn save(&mut self) -> Result<()> {
        self.snapshot.progress.total_words = self.words.len();
        let path = self.config.state_file.clone();
        self.snapshot.save_json(&path, self.now)
    }

    /// Map a user-supplied id or spelling to an item id.
    pub fn resolve_item(&self, key: &str) -> Result<ItemId> {
        if let Some(word) = self.words.find(key) {
            return Ok(word.id.clone());
        }
        let id = ItemId::from(key);
        if self.snapshot.memory.contains(&id) {
            return Ok(id);
        }
        anyhow::bail!("unknown item: {key}")
    }

    /// Spelling of an item, or its id when the word list lacks it.
    pub fn label(&self, id: &ItemId) -> String {
        self.words
            .get(id)
            .map(|w| w.word.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

/// A seeded generator when a seed is given, otherwise one from OS entropy.
pub fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

pub fn format_date(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Result<Self> {
        match format {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown format: {other} (expected text or json)"),
        }
    }
}
