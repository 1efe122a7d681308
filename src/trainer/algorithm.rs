//! Algorithm and session status enums shared by the engine and the host layer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrainerError;

/// Algorithms a session can train
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Algorithm {
    BubbleSort,
    InsertionSort,
    BinarySearch,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::BubbleSort,
        Algorithm::InsertionSort,
        Algorithm::BinarySearch,
    ];

    /// Progress key used by the profile documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::BubbleSort => "bubbleSort",
            Algorithm::InsertionSort => "insertionSort",
            Algorithm::BinarySearch => "binarySearch",
        }
    }

    /// Numeric code exposed to achievement conditions as `ALG`
    pub fn code(&self) -> i64 {
        match self {
            Algorithm::BubbleSort => 1,
            Algorithm::InsertionSort => 2,
            Algorithm::BinarySearch => 3,
        }
    }

    /// Whether sessions of this algorithm work on a pre-sorted sequence
    pub fn needs_sorted_input(&self) -> bool {
        matches!(self, Algorithm::BinarySearch)
    }
}

impl FromStr for Algorithm {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "bubblesort" | "bubble" => Ok(Algorithm::BubbleSort),
            "insertionsort" | "insertion" => Ok(Algorithm::InsertionSort),
            "binarysearch" | "binary" => Ok(Algorithm::BinarySearch),
            _ => Err(TrainerError::UnknownName {
                kind: "algorithm",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::BubbleSort => "bubble sort",
            Algorithm::InsertionSort => "insertion sort",
            Algorithm::BinarySearch => "binary search",
        };
        f.write_str(name)
    }
}

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::InProgress => "inProgress",
            Status::Won => "won",
            Status::Lost => "lost",
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::InProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_str_variants() {
        assert_eq!("bubbleSort".parse::<Algorithm>().ok(), Some(Algorithm::BubbleSort));
        assert_eq!("insertion_sort".parse::<Algorithm>().ok(), Some(Algorithm::InsertionSort));
        assert_eq!("Binary Search".parse::<Algorithm>().ok(), Some(Algorithm::BinarySearch));
        let err = "quick".parse::<Algorithm>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown algorithm: quick");
    }

    #[test]
    fn test_algorithm_keys_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.as_str().parse::<Algorithm>().ok(), Some(algorithm));
            let json = serde_json::to_string(&algorithm).unwrap();
            assert_eq!(json, format!("\"{}\"", algorithm.as_str()));
        }
    }

    #[test]
    fn test_status_terminal() {
        assert!(!Status::InProgress.is_terminal());
        assert!(Status::Won.is_terminal());
        assert!(Status::Lost.is_terminal());
    }
}
