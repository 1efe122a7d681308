//! Step validation rules
//!
//! Each algorithm has a cursor type implementing [`StepRules`]: a pure
//! `validate` deciding whether an action is the canonical next step, and an
//! `advance` applying a step that was validated as correct. [`Cursor`] is the
//! tagged variant the engine drives without knowing which algorithm it runs.

mod binary;
mod bubble;
mod insertion;


pub use binary::*;
pub use bubble::*;
pub use insertion::*;

use serde::{Deserialize, Serialize};

use crate::error::Rejection;
use crate::trainer::{Algorithm, Status};

/// A discrete user action sent by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Action {
    // Bubble sort
    Swap,
    Skip,
    // Insertion sort
    Shift,
    Insert,
    // Binary search comparisons
    GoLeft,
    GoRight,
    Found,
    // Binary search bound confirmation
    ConfirmLeft(isize),
    ConfirmRight(isize),
    ConfirmMid(isize),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Swap => "swap",
            Action::Skip => "skip",
            Action::Shift => "shift",
            Action::Insert => "insert",
            Action::GoLeft => "goLeft",
            Action::GoRight => "goRight",
            Action::Found => "found",
            Action::ConfirmLeft(_) => "confirmLeft",
            Action::ConfirmRight(_) => "confirmRight",
            Action::ConfirmMid(_) => "confirmMid",
        }
    }

    /// Index carried by a confirmation
    pub fn value(&self) -> Option<isize> {
        match *self {
            Action::ConfirmLeft(v) | Action::ConfirmRight(v) | Action::ConfirmMid(v) => Some(v),
            _ => None,
        }
    }

    /// Parse an action name as sent by a host; confirmations need a value.
    pub fn parse(name: &str, value: Option<isize>) -> Option<Self> {
        let action = match name.to_lowercase().replace(['_', '-'], "").as_str() {
            "swap" => Action::Swap,
            "skip" => Action::Skip,
            "shift" => Action::Shift,
            "insert" => Action::Insert,
            "goleft" | "left" => Action::GoLeft,
            "goright" | "right" => Action::GoRight,
            "found" => Action::Found,
            "confirmleft" => Action::ConfirmLeft(value?),
            "confirmright" => Action::ConfirmRight(value?),
            "confirmmid" => Action::ConfirmMid(value?),
            _ => return None,
        };
        Some(action)
    }

    /// Algorithm this action belongs to
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Action::Swap | Action::Skip => Algorithm::BubbleSort,
            Action::Shift | Action::Insert => Algorithm::InsertionSort,
            _ => Algorithm::BinarySearch,
        }
    }
}

/// Why a validated action was judged correct or incorrect.
///
/// Hosts key their feedback strings on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Reason {
    /// Left element of the compared pair is greater than the right one
    PairOutOfOrder,
    /// Compared pair is already in order (ties included)
    PairInOrder,
    /// Element left of the gap is greater than the key
    LeftAboveKey,
    /// Element left of the gap is not greater than the key
    LeftNotAboveKey,
    /// Gap reached the front of the sequence
    GapAtStart,
    MidAboveTarget,
    MidBelowTarget,
    MidIsTarget,
    /// Submitted bound equals the expected one
    BoundMatches,
    BoundMismatch,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::PairOutOfOrder => "pairOutOfOrder",
            Reason::PairInOrder => "pairInOrder",
            Reason::LeftAboveKey => "leftAboveKey",
            Reason::LeftNotAboveKey => "leftNotAboveKey",
            Reason::GapAtStart => "gapAtStart",
            Reason::MidAboveTarget => "midAboveTarget",
            Reason::MidBelowTarget => "midBelowTarget",
            Reason::MidIsTarget => "midIsTarget",
            Reason::BoundMatches => "boundMatches",
            Reason::BoundMismatch => "boundMismatch",
        }
    }
}

/// Decision for a structurally valid action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub is_correct: bool,
    pub reason: Reason,
}

impl Validation {
    #[inline]
    pub fn new(is_correct: bool, reason: Reason) -> Self {
        Self { is_correct, reason }
    }
}

/// Algorithm-specific legality predicate and progression rule
pub trait StepRules {
    /// Decide whether `action` is the canonical next step. Never mutates.
    fn validate(&self, sequence: &[i64], action: Action) -> Result<Validation, Rejection>;

    /// Apply an action that `validate` judged correct.
    fn advance(&mut self, sequence: &mut [i64], action: Action);

    /// Terminal status once the cursor has run out of steps
    fn outcome(&self, sequence: &[i64]) -> Option<Status>;

    /// The canonical next action, if any
    fn expected_action(&self, sequence: &[i64]) -> Option<Action>;

    /// First broken invariant of a cursor restored from a snapshot
    fn check_state(&self, sequence: &[i64]) -> Result<(), String>;
}

/// Cursor state of a session, tagged by algorithm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "camelCase")]
pub enum Cursor {
    BubbleSort(BubbleCursor),
    InsertionSort(InsertionCursor),
    BinarySearch(BinaryCursor),
}

impl Cursor {
    /// Initial cursor for a fresh session
    pub fn start(algorithm: Algorithm, sequence: &[i64], target_index: usize) -> Self {
        match algorithm {
            Algorithm::BubbleSort => Cursor::BubbleSort(BubbleCursor::new()),
            Algorithm::InsertionSort => Cursor::InsertionSort(InsertionCursor::new(sequence)),
            Algorithm::BinarySearch => {
                Cursor::BinarySearch(BinaryCursor::new(sequence.len(), target_index))
            }
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Cursor::BubbleSort(_) => Algorithm::BubbleSort,
            Cursor::InsertionSort(_) => Algorithm::InsertionSort,
            Cursor::BinarySearch(_) => Algorithm::BinarySearch,
        }
    }

    fn rules(&self) -> &dyn StepRules {
        match self {
            Cursor::BubbleSort(c) => c,
            Cursor::InsertionSort(c) => c,
            Cursor::BinarySearch(c) => c,
        }
    }

    fn rules_mut(&mut self) -> &mut dyn StepRules {
        match self {
            Cursor::BubbleSort(c) => c,
            Cursor::InsertionSort(c) => c,
            Cursor::BinarySearch(c) => c,
        }
    }
}

impl StepRules for Cursor {
    fn validate(&self, sequence: &[i64], action: Action) -> Result<Validation, Rejection> {
        if action.algorithm() != self.algorithm() {
            return Err(Rejection::WrongAlgorithm {
                action: action.name(),
                algorithm: self.algorithm(),
            });
        }
        self.rules().validate(sequence, action)
    }

    fn advance(&mut self, sequence: &mut [i64], action: Action) {
        self.rules_mut().advance(sequence, action)
    }

    fn outcome(&self, sequence: &[i64]) -> Option<Status> {
        self.rules().outcome(sequence)
    }

    fn expected_action(&self, sequence: &[i64]) -> Option<Action> {
        self.rules().expected_action(sequence)
    }

    fn check_state(&self, sequence: &[i64]) -> Result<(), String> {
        self.rules().check_state(sequence)
    }
}

/// Non-decreasing order check
#[inline]
pub fn is_ascending(sequence: &[i64]) -> bool {
    sequence.windows(2).all(|w| w[0] <= w[1])
}

/// Status of a sort session whose passes are exhausted
#[inline]
pub(crate) fn sorted_outcome(sequence: &[i64]) -> Status {
    if is_ascending(sequence) {
        Status::Won
    } else {
        Status::Lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse() {
        assert_eq!(Action::parse("swap", None), Some(Action::Swap));
        assert_eq!(Action::parse("go_left", None), Some(Action::GoLeft));
        assert_eq!(Action::parse("confirmMid", Some(3)), Some(Action::ConfirmMid(3)));
        assert_eq!(Action::parse("confirmMid", None), None);
        assert_eq!(Action::parse("jump", None), None);
    }

    #[test]
    fn test_action_algorithm() {
        assert_eq!(Action::Skip.algorithm(), Algorithm::BubbleSort);
        assert_eq!(Action::Insert.algorithm(), Algorithm::InsertionSort);
        assert_eq!(Action::ConfirmLeft(0).algorithm(), Algorithm::BinarySearch);
    }

    #[test]
    fn test_cursor_rejects_foreign_action() {
        let sequence = [3, 1, 2];
        let cursor = Cursor::start(Algorithm::BubbleSort, &sequence, 0);
        let err = cursor.validate(&sequence, Action::Shift).unwrap_err();
        assert_eq!(
            err,
            Rejection::WrongAlgorithm {
                action: "shift",
                algorithm: Algorithm::BubbleSort,
            }
        );
    }

    #[test]
    fn test_action_serde_shape() {
        let json = serde_json::to_string(&Action::ConfirmLeft(4)).unwrap();
        assert_eq!(json, r#"{"type":"confirmLeft","value":4}"#);
        let back: Action = serde_json::from_str(r#"{"type":"swap"}"#).unwrap();
        assert_eq!(back, Action::Swap);
    }

    #[test]
    fn test_is_ascending() {
        assert!(is_ascending(&[]));
        assert!(is_ascending(&[1, 1, 2]));
        assert!(!is_ascending(&[2, 1]));
    }
}
