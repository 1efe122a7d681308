//! Difficulty levels and per-algorithm sequence settings

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TrainerError;
use crate::trainer::Algorithm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(TrainerError::UnknownName {
                kind: "difficulty",
                name: s.to_string(),
            }),
        }
    }
}

/// Sequence sizes per difficulty and the value range to draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceProfile {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    pub min_value: i64,
    pub max_value: i64,
}

impl SequenceProfile {
    pub fn size_for(&self, difficulty: Difficulty) -> usize {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    fn sorting() -> Self {
        Self {
            easy: 6,
            medium: 8,
            hard: 10,
            min_value: 1,
            max_value: 50,
        }
    }

    fn searching() -> Self {
        Self {
            easy: 7,
            medium: 12,
            hard: 20,
            min_value: 1,
            max_value: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SequenceTable {
    pub bubble_sort: SequenceProfile,
    pub insertion_sort: SequenceProfile,
    pub binary_search: SequenceProfile,
}

impl Default for SequenceTable {
    fn default() -> Self {
        Self {
            bubble_sort: SequenceProfile::sorting(),
            insertion_sort: SequenceProfile::sorting(),
            binary_search: SequenceProfile::searching(),
        }
    }
}

impl SequenceTable {
    pub fn profile(&self, algorithm: Algorithm) -> &SequenceProfile {
        match algorithm {
            Algorithm::BubbleSort => &self.bubble_sort,
            Algorithm::InsertionSort => &self.insertion_sort,
            Algorithm::BinarySearch => &self.binary_search,
        }
    }
}
