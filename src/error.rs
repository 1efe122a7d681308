//! Error types for the algorithm trainer core

use serde::Serialize;
use thiserror::Error;

use crate::trainer::Algorithm;

/// Why an action was refused before validation.
///
/// A rejected action leaves the session untouched and is never scored.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Rejection {
    #[error("Session already finished")]
    SessionFinished,

    #[error("Action {action} does not belong to {algorithm}")]
    WrongAlgorithm {
        action: &'static str,
        algorithm: Algorithm,
    },

    #[error("Action {action} not allowed while {phase}")]
    WrongPhase {
        action: &'static str,
        phase: &'static str,
    },

    #[error("Index {index} out of range for length {len}")]
    OutOfRange { index: isize, len: usize },
}

/// Main error type for the algorithm trainer core
#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("Invalid sequence size: {0}")]
    InvalidSize(usize),

    #[error("Invalid value range {min}..={max} for {size} values")]
    InvalidRange { min: i64, max: i64, size: usize },

    #[error("Sequence must be sorted ascending for binary search")]
    UnsortedSequence,

    #[error("Binary search session needs a target index")]
    MissingTarget,

    #[error("Target index {index} out of range for length {len}")]
    TargetOutOfRange { index: usize, len: usize },

    #[error("Invalid action: {0}")]
    InvalidAction(#[from] Rejection),

    #[error("Game not finished yet")]
    GameNotFinished,

    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Invalid session snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Unknown {kind}: {name}")]
    UnknownName { kind: &'static str, name: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(feature = "python")]
impl From<TrainerError> for pyo3::PyErr {
    fn from(err: TrainerError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyIOError, PyKeyError, PyValueError};

        match err {
            TrainerError::ProfileNotFound(uid) => {
                PyKeyError::new_err(format!("Profile not found: {}", uid))
            }
            TrainerError::Io(e) => PyIOError::new_err(format!("Storage error: {}", e)),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

/// Result type alias for the algorithm trainer core
pub type Result<T> = std::result::Result<T, TrainerError>;
