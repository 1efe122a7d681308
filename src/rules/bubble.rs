//! Bubble sort: compare adjacent pairs, swap when out of order

use serde::{Deserialize, Serialize};

use super::{sorted_outcome, Action, Reason, StepRules, Validation};
use crate::error::Rejection;
use crate::trainer::Status;

/// Position of the pair under comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BubbleCursor {
    /// 1-based pass counter
    pub pass_index: usize,
    /// Left index of the compared pair
    pub compare_index: usize,
}

impl Default for BubbleCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl BubbleCursor {
    pub fn new() -> Self {
        Self {
            pass_index: 1,
            compare_index: 0,
        }
    }

    /// Exclusive upper bound for `compare_index` during the current pass
    #[inline]
    pub fn boundary(&self, len: usize) -> usize {
        len.saturating_sub(self.pass_index)
    }

    fn pair(&self, sequence: &[i64]) -> Result<(i64, i64), Rejection> {
        let i = self.compare_index;
        match (sequence.get(i), sequence.get(i + 1)) {
            (Some(&a), Some(&b)) => Ok((a, b)),
            _ => Err(Rejection::OutOfRange {
                index: (i + 1) as isize,
                len: sequence.len(),
            }),
        }
    }
}

impl StepRules for BubbleCursor {
    fn validate(&self, sequence: &[i64], action: Action) -> Result<Validation, Rejection> {
        let (a, b) = self.pair(sequence)?;
        let out_of_order = a > b;
        let reason = if out_of_order {
            Reason::PairOutOfOrder
        } else {
            Reason::PairInOrder
        };

        match action {
            Action::Swap => Ok(Validation::new(out_of_order, reason)),
            Action::Skip => Ok(Validation::new(!out_of_order, reason)),
            other => Err(Rejection::WrongPhase {
                action: other.name(),
                phase: "comparing a pair",
            }),
        }
    }

    fn advance(&mut self, sequence: &mut [i64], action: Action) {
        if action == Action::Swap {
            sequence.swap(self.compare_index, self.compare_index + 1);
        }

        self.compare_index += 1;
        if self.compare_index >= self.boundary(sequence.len()) {
            self.compare_index = 0;
            self.pass_index += 1;
        }
    }

    fn outcome(&self, sequence: &[i64]) -> Option<Status> {
        (self.pass_index >= sequence.len()).then(|| sorted_outcome(sequence))
    }

    fn expected_action(&self, sequence: &[i64]) -> Option<Action> {
        if self.outcome(sequence).is_some() {
            return None;
        }
        let (a, b) = self.pair(sequence).ok()?;
        Some(if a > b { Action::Swap } else { Action::Skip })
    }

    fn check_state(&self, sequence: &[i64]) -> Result<(), String> {
        let len = sequence.len();
        if self.pass_index == 0 || self.pass_index > len {
            return Err(format!("pass {} outside 1..={}", self.pass_index, len));
        }
        if self.pass_index < len && self.compare_index >= self.boundary(len) {
            return Err(format!(
                "compare index {} past pass boundary {}",
                self.compare_index,
                self.boundary(len)
            ));
        }
        Ok(())
    }
}
