//! GameSession - the explicit state of one training game
//!
//! A session owns its working sequence and cursor and is mutated only through
//! [`GameSession::apply`]. Rejected actions leave it untouched; accepted ones
//! are scored, recorded and advance the cursor when correct.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{Rejection, Result, TrainerError};
use crate::rules::{is_ascending, Action, Cursor, Reason, StepRules, Validation};

use super::{Algorithm, ScoringPolicy, SessionClock, Status, Timestamp};

/// Working sequence; the largest default difficulty fits inline
pub type Sequence = SmallVec<[i64; 20]>;

// ============================================================================
// Outcome Types
// ============================================================================

/// Decision reported back to the host for one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "detail", rename_all = "camelCase")]
pub enum Verdict {
    Correct(Reason),
    Incorrect(Reason),
    Rejected(Rejection),
}

/// Result of applying one action to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub verdict: Verdict,
    /// Score after the action
    pub score: u32,
    pub score_delta: i64,
    pub status: Status,
}

impl StepOutcome {
    #[inline]
    pub fn accepted(&self) -> bool {
        !matches!(self.verdict, Verdict::Rejected(_))
    }

    #[inline]
    pub fn correct(&self) -> bool {
        matches!(self.verdict, Verdict::Correct(_))
    }

    #[inline]
    pub fn terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn reason(&self) -> Option<Reason> {
        match self.verdict {
            Verdict::Correct(r) | Verdict::Incorrect(r) => Some(r),
            Verdict::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match &self.verdict {
            Verdict::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

/// Counters of accepted actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub correct: u32,
    pub incorrect: u32,
}

impl SessionStats {
    #[inline]
    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Rounded share of correct actions, 0 when nothing was played
    pub fn accuracy_percent(&self) -> u32 {
        percent(self.correct.into(), self.total().into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    pub action: Action,
    pub correct: bool,
    pub score_after: u32,
}

/// End-of-game figures handed to the progress adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub algorithm: Algorithm,
    pub status: Status,
    pub score: u32,
    pub elapsed_seconds: u64,
    pub correct_actions: u32,
    pub incorrect_actions: u32,
    pub sequence_len: usize,
}

impl GameSummary {
    #[inline]
    pub fn total_actions(&self) -> u32 {
        self.correct_actions + self.incorrect_actions
    }

    pub fn accuracy_percent(&self) -> u32 {
        percent(self.correct_actions.into(), self.total_actions().into())
    }

    #[inline]
    pub fn is_won(&self) -> bool {
        self.status == Status::Won
    }
}

/// Rounded percentage, 0 for an empty total
pub(crate) fn percent(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 * 100.0 / total as f64).round() as u32
}

// ============================================================================
// GameSession
// ============================================================================

/// Restored snapshots are checked before they become sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SessionSnapshot")]
pub struct GameSession {
    algorithm: Algorithm,
    sequence: Sequence,
    cursor: Cursor,
    score: u32,
    status: Status,
    clock: SessionClock,
    stats: SessionStats,
    history: Vec<ActionRecord>,
    scoring: ScoringPolicy,
}

/// Wire form of a session before its invariants are checked
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionSnapshot {
    algorithm: Algorithm,
    sequence: Sequence,
    cursor: Cursor,
    score: u32,
    status: Status,
    clock: SessionClock,
    stats: SessionStats,
    history: Vec<ActionRecord>,
    scoring: ScoringPolicy,
}

impl TryFrom<SessionSnapshot> for GameSession {
    type Error = TrainerError;

    fn try_from(snapshot: SessionSnapshot) -> Result<Self> {
        let session = Self {
            algorithm: snapshot.algorithm,
            sequence: snapshot.sequence,
            cursor: snapshot.cursor,
            score: snapshot.score,
            status: snapshot.status,
            clock: snapshot.clock,
            stats: snapshot.stats,
            history: snapshot.history,
            scoring: snapshot.scoring,
        };
        session.check_snapshot()?;
        Ok(session)
    }
}

impl GameSession {
    /// Build a session over a given sequence.
    ///
    /// Binary search needs an ascending sequence and a target index; the
    /// target is ignored for the sorts.
    pub fn from_sequence(
        algorithm: Algorithm,
        values: Vec<i64>,
        target_index: Option<usize>,
        now: Timestamp,
    ) -> Result<Self> {
        if values.is_empty() {
            return Err(TrainerError::InvalidSize(0));
        }

        let target = if algorithm.needs_sorted_input() {
            if !is_ascending(&values) {
                return Err(TrainerError::UnsortedSequence);
            }
            let index = target_index.ok_or(TrainerError::MissingTarget)?;
            if index >= values.len() {
                return Err(TrainerError::TargetOutOfRange {
                    index,
                    len: values.len(),
                });
            }
            index
        } else {
            0
        };

        let sequence = Sequence::from_vec(values);
        let cursor = Cursor::start(algorithm, &sequence, target);
        let mut session = Self {
            algorithm,
            sequence,
            cursor,
            score: 0,
            status: Status::InProgress,
            clock: SessionClock::start(now),
            stats: SessionStats::default(),
            history: Vec::new(),
            scoring: ScoringPolicy::default(),
        };

        if let Some(status) = session.cursor.outcome(&session.sequence) {
            session.finish(status, now);
        }

        debug!(
            "new {} session: len={} status={}",
            algorithm,
            session.sequence.len(),
            session.status.as_str()
        );
        Ok(session)
    }

    pub fn with_scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = scoring;
        self
    }

    /// Apply one host action at time `now`
    pub fn apply(&mut self, action: Action, now: Timestamp) -> StepOutcome {
        let validation = match self.validate(action) {
            Ok(v) => v,
            Err(rejection) => {
                debug!("rejected {}: {}", action.name(), rejection);
                return StepOutcome {
                    verdict: Verdict::Rejected(rejection),
                    score: self.score,
                    score_delta: 0,
                    status: self.status,
                };
            }
        };

        let before = self.score;
        self.score = self.scoring.apply_outcome(before, validation.is_correct);

        let verdict = if validation.is_correct {
            self.stats.correct += 1;
            self.cursor.advance(&mut self.sequence, action);
            Verdict::Correct(validation.reason)
        } else {
            self.stats.incorrect += 1;
            Verdict::Incorrect(validation.reason)
        };

        self.history.push(ActionRecord {
            action,
            correct: validation.is_correct,
            score_after: self.score,
        });
        debug!(
            "{} {} ({}), score {} -> {}",
            action.name(),
            if validation.is_correct { "correct" } else { "incorrect" },
            validation.reason.as_str(),
            before,
            self.score
        );

        if let Some(status) = self.cursor.outcome(&self.sequence) {
            self.finish(status, now);
        }

        StepOutcome {
            verdict,
            score: self.score,
            score_delta: i64::from(self.score) - i64::from(before),
            status: self.status,
        }
    }

    /// Decide an action without applying it
    pub fn validate(&self, action: Action) -> std::result::Result<Validation, Rejection> {
        if self.status.is_terminal() {
            return Err(Rejection::SessionFinished);
        }
        self.cursor.validate(&self.sequence, action)
    }

    /// Canonical next action; None once the session is finished
    pub fn expected_action(&self) -> Option<Action> {
        if self.status.is_terminal() {
            return None;
        }
        self.cursor.expected_action(&self.sequence)
    }

    /// Reject states `apply` could never have produced
    pub fn check_snapshot(&self) -> Result<()> {
        let invalid = |msg: String| Err(TrainerError::InvalidSnapshot(msg));

        if self.sequence.is_empty() {
            return invalid("empty sequence".to_string());
        }
        if self.cursor.algorithm() != self.algorithm {
            return invalid(format!(
                "{} cursor in a {} session",
                self.cursor.algorithm(),
                self.algorithm
            ));
        }
        if self.algorithm.needs_sorted_input() && !is_ascending(&self.sequence) {
            return invalid("search sequence is not ascending".to_string());
        }
        if let Err(msg) = self.cursor.check_state(&self.sequence) {
            return invalid(msg);
        }

        let cursor_status = self.cursor.outcome(&self.sequence).unwrap_or_default();
        if cursor_status != self.status {
            return invalid(format!(
                "status {} does not match cursor status {}",
                self.status.as_str(),
                cursor_status.as_str()
            ));
        }
        let clock_ok = match self.clock.finished_at {
            Some(end) => self.status.is_terminal() && end >= self.clock.started_at,
            None => !self.status.is_terminal(),
        };
        if !clock_ok {
            return invalid("clock does not match status".to_string());
        }
        Ok(())
    }

    fn finish(&mut self, status: Status, now: Timestamp) {
        self.status = status;
        self.clock.freeze(now);
        info!(
            "{} session {} with score {} in {}s",
            self.algorithm,
            status.as_str(),
            self.score,
            self.clock.elapsed_seconds(now)
        );
    }

    pub fn elapsed_seconds(&self, now: Timestamp) -> u64 {
        self.clock.elapsed_seconds(now)
    }

    pub fn summary(&self, now: Timestamp) -> GameSummary {
        GameSummary {
            algorithm: self.algorithm,
            status: self.status,
            score: self.score,
            elapsed_seconds: self.elapsed_seconds(now),
            correct_actions: self.stats.correct,
            incorrect_actions: self.stats.incorrect,
            sequence_len: self.sequence.len(),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn sequence(&self) -> &[i64] {
        &self.sequence
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    pub fn scoring(&self) -> ScoringPolicy {
        self.scoring
    }

    /// Index of the searched value, binary search only
    pub fn target_index(&self) -> Option<usize> {
        match &self.cursor {
            Cursor::BinarySearch(c) => Some(c.target_index),
            _ => None,
        }
    }
}
