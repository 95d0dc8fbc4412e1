//! lexirep-core — Memory model, FSRS scheduler, and review bookkeeping.
//!
//! This crate defines the per-item memory state, the scheduler that advances
//! it after each review, and the collaborators the `lexirep` CLI builds on:
//! word lists, deck assembly, study progress, configuration and persistence.

pub mod config;
pub mod content;
pub mod deck;
pub mod error;
pub mod manager;
pub mod model;
pub mod parser;
pub mod scheduler;
pub mod statistics;
pub mod store;

pub use error::SchedulerError;
pub use manager::{MemoryManager, ReviewOutcome};
pub use model::{ItemId, ItemState, MemoryState, MemoryStrength, Rating};
pub use scheduler::{Scheduler, SchedulerConfig};
