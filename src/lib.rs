//! Algo Trainer Core - step-validation engine for algorithm training games
//!
//! The player executes bubble sort, insertion sort or binary search by hand,
//! one discrete action at a time. The engine judges every action against the
//! canonical next step, keeps score and time, and reports when the game ends.
//! Finished games feed a profile with per-algorithm mastery and achievements.
//!
//! Python bindings are available behind the `python` feature.

pub mod achievement;
pub mod condition;
pub mod config;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod progress;
pub mod rules;
pub mod trainer;

#[cfg(feature = "python")]
mod python;

pub use crate::config::{Difficulty, Mastery, TrainerConfig};
pub use crate::error::{Rejection, Result, TrainerError};
pub use crate::progress::{record_game, JsonFileStore, MemoryStore, ProgressStore, UserProfile};
pub use crate::rules::{Action, Reason};
pub use crate::trainer::{
    apply_action, Algorithm, GameSession, GameSummary, Status, StepOutcome, Trainer,
};
