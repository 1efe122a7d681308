//! Mastery labels and the thresholds that award them

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Mastery {
    #[default]
    #[serde(rename = "None")]
    Unranked,
    Bronze,
    Silver,
    Gold,
}

impl Mastery {
    /// Numeric rank exposed to conditions as `MST`
    pub fn rank(&self) -> i64 {
        match self {
            Mastery::Unranked => 0,
            Mastery::Bronze => 1,
            Mastery::Silver => 2,
            Mastery::Gold => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mastery::Unranked => "None",
            Mastery::Bronze => "Bronze",
            Mastery::Silver => "Silver",
            Mastery::Gold => "Gold",
        }
    }
}

/// Minimum aggregate stats for a mastery label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryLevel {
    pub mastery: Mastery,
    #[serde(default)]
    pub min_wins: u32,
    /// Percent, 0..=100
    #[serde(default)]
    pub min_accuracy: u32,
    #[serde(default)]
    pub min_games: u32,
}

impl MasteryLevel {
    pub fn is_met(&self, wins: u32, accuracy: u32, games: u32) -> bool {
        wins >= self.min_wins && accuracy >= self.min_accuracy && games >= self.min_games
    }
}

pub fn default_mastery_levels() -> Vec<MasteryLevel> {
    vec![
        MasteryLevel {
            mastery: Mastery::Gold,
            min_wins: 5,
            min_accuracy: 90,
            min_games: 0,
        },
        MasteryLevel {
            mastery: Mastery::Silver,
            min_wins: 3,
            min_accuracy: 75,
            min_games: 0,
        },
        MasteryLevel {
            mastery: Mastery::Bronze,
            min_wins: 1,
            min_accuracy: 0,
            min_games: 0,
        },
    ]
}
