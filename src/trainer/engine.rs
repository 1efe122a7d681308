//! Session factory and the host-facing step function

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::{Difficulty, TrainerConfig};
use crate::error::Result;
use crate::generator::{pick_target, SequenceSpec};
use crate::rules::Action;

use super::{now_millis, Algorithm, GameSession, StepOutcome, Timestamp};

/// Creates sessions from a config and an owned random source
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainerConfig,
    rng: StdRng,
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new(TrainerConfig::default())
    }
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generation for tests and replays
    pub fn with_seed(config: TrainerConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn new_session(&mut self, algorithm: Algorithm, size: usize) -> Result<GameSession> {
        self.new_session_at(algorithm, size, now_millis())
    }

    pub fn new_session_for(
        &mut self,
        algorithm: Algorithm,
        difficulty: Difficulty,
    ) -> Result<GameSession> {
        let size = self
            .config
            .sequences
            .profile(algorithm)
            .size_for(difficulty);
        self.new_session(algorithm, size)
    }

    /// Same as [`Trainer::new_session`] with an explicit start time
    pub fn new_session_at(
        &mut self,
        algorithm: Algorithm,
        size: usize,
        now: Timestamp,
    ) -> Result<GameSession> {
        let profile = self.config.sequences.profile(algorithm);
        let spec = SequenceSpec::for_algorithm(algorithm, size, profile);
        let values = spec.generate(&mut self.rng)?;
        let target = if algorithm.needs_sorted_input() {
            Some(pick_target(&mut self.rng, values.len())?)
        } else {
            None
        };
        debug!("generated {} values for {}", values.len(), algorithm);

        Ok(GameSession::from_sequence(algorithm, values, target, now)?
            .with_scoring(self.config.scoring))
    }
}

/// Outcome flags plus the advanced session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub accepted: bool,
    pub correct: bool,
    pub terminal: bool,
    pub outcome: StepOutcome,
    pub session: GameSession,
}

/// Value-passing form of [`GameSession::apply`]
pub fn apply_action(mut session: GameSession, action: Action, now: Timestamp) -> StepResult {
    let outcome = session.apply(action, now);
    StepResult {
        accepted: outcome.accepted(),
        correct: outcome.correct(),
        terminal: outcome.terminal(),
        outcome,
        session,
    }
}
