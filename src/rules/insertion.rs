//! Insertion sort: shift the gap left until the key fits, then insert

use serde::{Deserialize, Serialize};

use super::{sorted_outcome, Action, Reason, StepRules, Validation};
use crate::error::Rejection;
use crate::trainer::Status;

/// Insertion sort pass state.
///
/// Shifting swaps the key one slot to the left, so the key always sits at
/// `gap_index` while a pass is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertionCursor {
    pub pass_number: usize,
    pub key_index: usize,
    pub gap_index: usize,
    /// Value taken at `key_index` when the pass began
    pub key: Option<i64>,
}

impl InsertionCursor {
    pub fn new(sequence: &[i64]) -> Self {
        Self::at_pass(1, sequence)
    }

    fn at_pass(pass_number: usize, sequence: &[i64]) -> Self {
        Self {
            pass_number,
            key_index: pass_number,
            gap_index: pass_number,
            key: sequence.get(pass_number).copied(),
        }
    }
}

impl StepRules for InsertionCursor {
    fn validate(&self, sequence: &[i64], action: Action) -> Result<Validation, Rejection> {
        let key = self.key.ok_or(Rejection::SessionFinished)?;
        if self.gap_index >= sequence.len() {
            return Err(Rejection::OutOfRange {
                index: self.gap_index as isize,
                len: sequence.len(),
            });
        }
        let left = match self.gap_index.checked_sub(1) {
            Some(i) => Some(*sequence.get(i).ok_or(Rejection::OutOfRange {
                index: i as isize,
                len: sequence.len(),
            })?),
            None => None,
        };

        match action {
            Action::Shift => match left {
                Some(value) if value > key => Ok(Validation::new(true, Reason::LeftAboveKey)),
                Some(_) => Ok(Validation::new(false, Reason::LeftNotAboveKey)),
                None => Err(Rejection::OutOfRange {
                    index: -1,
                    len: sequence.len(),
                }),
            },
            Action::Insert => match left {
                None => Ok(Validation::new(true, Reason::GapAtStart)),
                Some(value) if value <= key => Ok(Validation::new(true, Reason::LeftNotAboveKey)),
                Some(_) => Ok(Validation::new(false, Reason::LeftAboveKey)),
            },
            other => Err(Rejection::WrongPhase {
                action: other.name(),
                phase: "placing a key",
            }),
        }
    }

    fn advance(&mut self, sequence: &mut [i64], action: Action) {
        match action {
            Action::Shift => {
                sequence.swap(self.gap_index, self.gap_index - 1);
                self.gap_index -= 1;
            }
            Action::Insert => *self = Self::at_pass(self.pass_number + 1, sequence),
            _ => {}
        }
    }

    fn outcome(&self, sequence: &[i64]) -> Option<Status> {
        (self.pass_number >= sequence.len()).then(|| sorted_outcome(sequence))
    }

    fn expected_action(&self, sequence: &[i64]) -> Option<Action> {
        if self.outcome(sequence).is_some() {
            return None;
        }
        match self.validate(sequence, Action::Shift) {
            Ok(v) if v.is_correct => Some(Action::Shift),
            _ => Some(Action::Insert),
        }
    }

    fn check_state(&self, sequence: &[i64]) -> Result<(), String> {
        let len = sequence.len();
        if self.pass_number == 0 || self.pass_number > len {
            return Err(format!("pass {} outside 1..={}", self.pass_number, len));
        }
        if self.pass_number == len {
            return match self.key {
                None => Ok(()),
                Some(_) => Err("finished cursor still holds a key".to_string()),
            };
        }
        if self.key_index != self.pass_number || self.gap_index > self.key_index {
            return Err(format!(
                "gap {} and key index {} inconsistent with pass {}",
                self.gap_index, self.key_index, self.pass_number
            ));
        }
        if self.key != sequence.get(self.gap_index).copied() {
            return Err(format!("key is not at gap index {}", self.gap_index));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_then_insert_at_start() {
        let mut seq = [4, 2, 7];
        let mut cursor = InsertionCursor::new(&seq);
        assert_eq!(cursor.key, Some(2));

        let v = cursor.validate(&seq, Action::Shift).unwrap();
        assert!(v.is_correct);
        cursor.advance(&mut seq, Action::Shift);
        assert_eq!(seq, [2, 4, 7]);
        assert_eq!(cursor.gap_index, 0);

        let v = cursor.validate(&seq, Action::Insert).unwrap();
        assert_eq!(v, Validation::new(true, Reason::GapAtStart));
        cursor.advance(&mut seq, Action::Insert);
        assert_eq!(cursor.pass_number, 2);
        assert_eq!(cursor.key, Some(7));
    }

    #[test]
    fn test_shift_at_front_is_rejected() {
        let seq = [2, 4, 7];
        let cursor = InsertionCursor {
            pass_number: 1,
            key_index: 1,
            gap_index: 0,
            key: Some(2),
        };
        assert_eq!(
            cursor.validate(&seq, Action::Shift),
            Err(Rejection::OutOfRange { index: -1, len: 3 })
        );
    }

    #[test]
    fn test_insert_wrong_when_left_is_larger() {
        let seq = [9, 3];
        let cursor = InsertionCursor::new(&seq);
        let v = cursor.validate(&seq, Action::Insert).unwrap();
        assert!(!v.is_correct);
        assert_eq!(cursor.expected_action(&seq), Some(Action::Shift));
    }

    #[test]
    fn test_equal_values_insert() {
        let seq = [3, 3];
        let cursor = InsertionCursor::new(&seq);
        assert!(!cursor.validate(&seq, Action::Shift).unwrap().is_correct);
        assert!(cursor.validate(&seq, Action::Insert).unwrap().is_correct);
    }

    #[test]
    fn test_gap_past_end_is_rejected_not_swapped() {
        let mut seq = [5, 1, 3];
        let cursor = InsertionCursor {
            pass_number: 3,
            key_index: 3,
            gap_index: 3,
            key: Some(3),
        };
        assert_eq!(
            cursor.validate(&seq, Action::Shift),
            Err(Rejection::OutOfRange { index: 3, len: 3 })
        );
        assert!(cursor.check_state(&seq).is_err());
        assert_eq!(seq, [5, 1, 3]);

        let mut fresh = InsertionCursor::new(&seq);
        assert!(fresh.check_state(&seq).is_ok());
        fresh.advance(&mut seq, Action::Shift);
        assert!(fresh.check_state(&seq).is_ok());
    }

    #[test]
    fn test_last_insert_wins() {
        let mut seq = [1, 2];
        let mut cursor = InsertionCursor::new(&seq);
        cursor.advance(&mut seq, Action::Insert);
        assert_eq!(cursor.outcome(&seq), Some(Status::Won));
        assert_eq!(cursor.key, None);
        assert_eq!(
            cursor.validate(&seq, Action::Insert),
            Err(Rejection::SessionFinished)
        );
    }
}
