//! Binary search with the three-step bound confirmation
//!
//! After each correct comparison the host has to re-derive the new `left`,
//! `right` and `mid` in that order. Bounds are only committed once `mid` is
//! confirmed.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{Action, Reason, StepRules, Validation};
use crate::error::Rejection;
use crate::trainer::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchPhase {
    #[default]
    Compare,
    ConfirmLeft,
    ConfirmRight,
    ConfirmMid,
}

impl SearchPhase {
    pub fn describe(&self) -> &'static str {
        match self {
            SearchPhase::Compare => "comparing mid with the target",
            SearchPhase::ConfirmLeft => "confirming the left bound",
            SearchPhase::ConfirmRight => "confirming the right bound",
            SearchPhase::ConfirmMid => "confirming mid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryCursor {
    pub left: isize,
    pub right: isize,
    pub mid: isize,
    pub target_index: usize,
    pub phase: SearchPhase,
    /// Bounds derived from the last correct comparison, awaiting confirmation
    pub pending_left: isize,
    pub pending_right: isize,
    /// Correct comparisons made so far
    pub comparisons: u32,
    pub found: bool,
}

#[inline]
fn midpoint(left: isize, right: isize) -> isize {
    (left + right).div_euclid(2)
}

impl BinaryCursor {
    pub fn new(len: usize, target_index: usize) -> Self {
        let right = len as isize - 1;
        Self {
            left: 0,
            right,
            mid: midpoint(0, right),
            target_index,
            phase: SearchPhase::Compare,
            pending_left: 0,
            pending_right: right,
            comparisons: 0,
            found: false,
        }
    }

    /// Mid that the pending bounds imply
    #[inline]
    pub fn pending_mid(&self) -> isize {
        midpoint(self.pending_left, self.pending_right)
    }

    /// Position of mid relative to the target. Equal values are ordered by
    /// index so duplicates still leave exactly one correct move.
    fn relation(&self, sequence: &[i64]) -> Result<Ordering, Rejection> {
        let out_of_range = |index: isize| Rejection::OutOfRange {
            index,
            len: sequence.len(),
        };
        let mid_value = usize::try_from(self.mid)
            .ok()
            .and_then(|i| sequence.get(i))
            .copied()
            .ok_or_else(|| out_of_range(self.mid))?;
        let target = sequence
            .get(self.target_index)
            .copied()
            .ok_or_else(|| out_of_range(self.target_index as isize))?;

        Ok((mid_value, self.mid).cmp(&(target, self.target_index as isize)))
    }

    fn compare(&self, sequence: &[i64], action: Action) -> Result<Validation, Rejection> {
        let relation = self.relation(sequence)?;
        let reason = match relation {
            Ordering::Greater => Reason::MidAboveTarget,
            Ordering::Less => Reason::MidBelowTarget,
            Ordering::Equal => Reason::MidIsTarget,
        };
        let expected = match relation {
            Ordering::Greater => Action::GoLeft,
            Ordering::Less => Action::GoRight,
            Ordering::Equal => Action::Found,
        };
        Ok(Validation::new(action == expected, reason))
    }

    fn confirm(
        &self,
        len: usize,
        submitted: isize,
        expected: isize,
    ) -> Result<Validation, Rejection> {
        if submitted < -1 || submitted > len as isize {
            return Err(Rejection::OutOfRange {
                index: submitted,
                len,
            });
        }
        Ok(if submitted == expected {
            Validation::new(true, Reason::BoundMatches)
        } else {
            Validation::new(false, Reason::BoundMismatch)
        })
    }
}

impl StepRules for BinaryCursor {
    fn validate(&self, sequence: &[i64], action: Action) -> Result<Validation, Rejection> {
        let len = sequence.len();
        match (self.phase, action) {
            (SearchPhase::Compare, Action::GoLeft | Action::GoRight | Action::Found) => {
                self.compare(sequence, action)
            }
            (SearchPhase::ConfirmLeft, Action::ConfirmLeft(v)) => {
                self.confirm(len, v, self.pending_left)
            }
            (SearchPhase::ConfirmRight, Action::ConfirmRight(v)) => {
                self.confirm(len, v, self.pending_right)
            }
            (SearchPhase::ConfirmMid, Action::ConfirmMid(v)) => {
                self.confirm(len, v, self.pending_mid())
            }
            (phase, other) => Err(Rejection::WrongPhase {
                action: other.name(),
                phase: phase.describe(),
            }),
        }
    }

    fn advance(&mut self, _sequence: &mut [i64], action: Action) {
        match action {
            Action::GoLeft => {
                self.comparisons += 1;
                self.pending_left = self.left;
                self.pending_right = self.mid - 1;
                self.phase = SearchPhase::ConfirmLeft;
            }
            Action::GoRight => {
                self.comparisons += 1;
                self.pending_left = self.mid + 1;
                self.pending_right = self.right;
                self.phase = SearchPhase::ConfirmLeft;
            }
            Action::Found => {
                self.comparisons += 1;
                self.found = true;
            }
            Action::ConfirmLeft(_) => self.phase = SearchPhase::ConfirmRight,
            Action::ConfirmRight(_) => self.phase = SearchPhase::ConfirmMid,
            Action::ConfirmMid(_) => {
                self.left = self.pending_left;
                self.right = self.pending_right;
                self.mid = self.pending_mid();
                self.phase = SearchPhase::Compare;
            }
            _ => {}
        }
    }

    fn outcome(&self, _sequence: &[i64]) -> Option<Status> {
        if self.found {
            Some(Status::Won)
        } else if self.phase == SearchPhase::Compare && self.left > self.right {
            Some(Status::Lost)
        } else {
            None
        }
    }

    fn expected_action(&self, sequence: &[i64]) -> Option<Action> {
        if self.outcome(sequence).is_some() {
            return None;
        }
        match self.phase {
            SearchPhase::Compare => Some(match self.relation(sequence).ok()? {
                Ordering::Greater => Action::GoLeft,
                Ordering::Less => Action::GoRight,
                Ordering::Equal => Action::Found,
            }),
            SearchPhase::ConfirmLeft => Some(Action::ConfirmLeft(self.pending_left)),
            SearchPhase::ConfirmRight => Some(Action::ConfirmRight(self.pending_right)),
            SearchPhase::ConfirmMid => Some(Action::ConfirmMid(self.pending_mid())),
        }
    }

    fn check_state(&self, sequence: &[i64]) -> Result<(), String> {
        let len = sequence.len() as isize;
        let bounds_ok = |left: isize, right: isize| 0 <= left && left <= right + 1 && right < len;

        if self.target_index >= sequence.len() {
            return Err(format!("target index {} out of range", self.target_index));
        }
        if !bounds_ok(self.left, self.right) || self.mid != midpoint(self.left, self.right) {
            return Err(format!(
                "bounds left={} right={} mid={} invalid for length {}",
                self.left, self.right, self.mid, len
            ));
        }
        if self.phase != SearchPhase::Compare && !bounds_ok(self.pending_left, self.pending_right) {
            return Err(format!(
                "pending bounds left={} right={} invalid for length {}",
                self.pending_left, self.pending_right, len
            ));
        }
        if self.found && self.mid != self.target_index as isize {
            return Err("found without mid on the target".to_string());
        }
        Ok(())
    }
}
