//! Persisted user profile documents

use log::debug;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::config::Mastery;
use crate::trainer::{percent, Algorithm};

pub const DEFAULT_AVATAR: &str = "https://via.placeholder.com/120x120?text=Avatar";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Aggregate stats for one algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlgorithmStats {
    /// Seconds across all recorded games
    pub time_spent: u64,
    /// Percent of correct actions across all recorded games
    pub accuracy: u32,
    pub games_played: u32,
    pub games_won: u32,
    pub best_score: u32,
    pub correct_actions: u64,
    pub total_actions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmProgress {
    pub mastery: Mastery,
    pub stats: AlgorithmStats,
}

impl AlgorithmProgress {
    /// Fold another entry for the same algorithm into this one
    pub fn merge(&mut self, other: &AlgorithmProgress) {
        let (a, b) = (self.stats, other.stats);
        let games_played = a.games_played.saturating_add(b.games_played);
        let correct_actions = a.correct_actions.saturating_add(b.correct_actions);
        let total_actions = a.total_actions.saturating_add(b.total_actions);

        // Older documents carry only a percentage, so weight it by games
        let accuracy = if total_actions > 0 {
            percent(correct_actions, total_actions)
        } else if games_played > 0 {
            let weighted = u64::from(a.accuracy) * u64::from(a.games_played)
                + u64::from(b.accuracy) * u64::from(b.games_played);
            percent(weighted, u64::from(games_played) * 100)
        } else {
            a.accuracy.max(b.accuracy)
        };

        self.mastery = self.mastery.max(other.mastery);
        self.stats = AlgorithmStats {
            time_spent: a.time_spent.saturating_add(b.time_spent),
            accuracy,
            games_played,
            games_won: a.games_won.saturating_add(b.games_won),
            best_score: a.best_score.max(b.best_score),
            correct_actions,
            total_actions,
        };
    }
}

/// Algorithm behind a progress key, including the split insertion keys of
/// older documents
fn progress_key(key: &str) -> Option<Algorithm> {
    match key {
        "insertionSort1" | "insertionSort2" => Some(Algorithm::InsertionSort),
        other => other.parse().ok(),
    }
}

fn deserialize_progress<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<Algorithm, AlgorithmProgress>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    let mut progress: BTreeMap<Algorithm, AlgorithmProgress> = BTreeMap::new();
    for (key, value) in raw {
        let Some(algorithm) = progress_key(&key) else {
            debug!("ignoring progress entry {:?}", key);
            continue;
        };
        let entry: AlgorithmProgress = serde_json::from_value(value).map_err(D::Error::custom)?;
        progress
            .entry(algorithm)
            .and_modify(|p| p.merge(&entry))
            .or_insert(entry);
    }
    Ok(progress)
}

/// Profile document keyed by an opaque user id in a store.
///
/// Missing fields fall back to defaults, so partial documents load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub avatar: String,
    pub language: String,
    #[serde(deserialize_with = "deserialize_progress")]
    pub progress: BTreeMap<Algorithm, AlgorithmProgress>,
    pub achievements: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            username: String::new(),
            avatar: DEFAULT_AVATAR.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            progress: Algorithm::ALL
                .iter()
                .map(|a| (*a, AlgorithmProgress::default()))
                .collect(),
            achievements: Vec::new(),
        }
    }
}

impl UserProfile {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn progress_for(&self, algorithm: Algorithm) -> AlgorithmProgress {
        self.progress.get(&algorithm).copied().unwrap_or_default()
    }

    pub fn progress_mut(&mut self, algorithm: Algorithm) -> &mut AlgorithmProgress {
        self.progress.entry(algorithm).or_default()
    }

    /// Games recorded across every algorithm
    pub fn total_games(&self) -> i64 {
        self.progress
            .values()
            .map(|p| i64::from(p.stats.games_played))
            .sum()
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = UserProfile::new("ada");
        assert_eq!(profile.avatar, DEFAULT_AVATAR);
        assert_eq!(profile.language, "en");
        assert_eq!(profile.progress.len(), 3);
        assert_eq!(
            profile.progress_for(Algorithm::BinarySearch).mastery,
            Mastery::Unranked
        );
    }

    #[test]
    fn test_document_shape() {
        let json = serde_json::to_value(UserProfile::new("ada")).unwrap();
        assert_eq!(json["progress"]["bubbleSort"]["mastery"], "None");
        assert_eq!(json["progress"]["bubbleSort"]["stats"]["gamesPlayed"], 0);
        assert!(json["achievements"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_partial_document_loads() {
        let json = r#"{
            "username": "grace",
            "progress": {
                "binarySearch": {
                    "mastery": "Silver",
                    "stats": {"timeSpent": 30, "accuracy": 80, "gamesPlayed": 2}
                }
            }
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.avatar, DEFAULT_AVATAR);
        let search = profile.progress_for(Algorithm::BinarySearch);
        assert_eq!(search.mastery, Mastery::Silver);
        assert_eq!(search.stats.games_played, 2);
        assert_eq!(search.stats.games_won, 0);
        assert_eq!(profile.total_games(), 2);
    }

    #[test]
    fn test_split_insertion_keys_merge() {
        let json = r#"{
            "uid": "u-42",
            "username": "ada",
            "avatar": "owl.png",
            "language": "en",
            "achievements": ["first_win"],
            "progress": {
                "bubbleSort": {
                    "mastery": "Bronze",
                    "stats": {"timeSpent": 10, "accuracy": 50, "gamesPlayed": 2}
                },
                "insertionSort1": {
                    "mastery": "None",
                    "stats": {"timeSpent": 20, "accuracy": 80, "gamesPlayed": 1}
                },
                "insertionSort2": {
                    "mastery": "Silver",
                    "stats": {"timeSpent": 30, "accuracy": 50, "gamesPlayed": 3}
                },
                "binarySearch": {
                    "mastery": "None",
                    "stats": {"timeSpent": 0, "accuracy": 0, "gamesPlayed": 0}
                },
                "quickSort": {"mastery": "Gold"}
            }
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.progress.len(), 3);
        assert_eq!(profile.avatar, "owl.png");
        assert!(profile.has_achievement("first_win"));

        let insertion = profile.progress_for(Algorithm::InsertionSort);
        assert_eq!(insertion.mastery, Mastery::Silver);
        assert_eq!(insertion.stats.time_spent, 50);
        assert_eq!(insertion.stats.games_played, 4);
        // (80 * 1 + 50 * 3) / 4 = 57.5
        assert_eq!(insertion.stats.accuracy, 58);
        assert_eq!(profile.total_games(), 6);

        let saved = serde_json::to_value(&profile).unwrap();
        assert_eq!(saved["progress"]["insertionSort"]["stats"]["gamesPlayed"], 4);
        assert!(saved["progress"].get("insertionSort1").is_none());
    }

    #[test]
    fn test_merge_prefers_action_counts() {
        let mut a = AlgorithmProgress::default();
        a.stats.games_played = 1;
        a.stats.correct_actions = 9;
        a.stats.total_actions = 10;
        a.stats.best_score = 90;
        let mut b = AlgorithmProgress {
            mastery: Mastery::Bronze,
            ..Default::default()
        };
        b.stats.games_played = 1;
        b.stats.correct_actions = 1;
        b.stats.total_actions = 10;
        b.stats.best_score = 10;

        a.merge(&b);
        assert_eq!(a.mastery, Mastery::Bronze);
        assert_eq!(a.stats.accuracy, 50);
        assert_eq!(a.stats.best_score, 90);
        assert_eq!(a.stats.total_actions, 20);
    }
}
