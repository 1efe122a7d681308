//! Trainer configuration
//!
//! Every section has defaults matching the classic games, so an empty JSON
//! object is a valid config. Hosts may override any part of it.

mod achievement;
mod difficulty;
mod mastery;

pub use achievement::*;
pub use difficulty::*;
pub use mastery::*;

use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::condition::validate_condition;
use crate::error::{Result, TrainerError};
use crate::trainer::{Algorithm, ScoringPolicy};

static ACHIEVEMENT_ID: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]{0,63}$").ok());

fn is_valid_achievement_id(id: &str) -> bool {
    ACHIEVEMENT_ID.as_ref().is_some_and(|re| re.is_match(id))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainerConfig {
    pub sequences: SequenceTable,
    pub scoring: ScoringPolicy,
    pub mastery: Vec<MasteryLevel>,
    pub achievements: Vec<AchievementConfig>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            sequences: SequenceTable::default(),
            scoring: ScoringPolicy::default(),
            mastery: default_mastery_levels(),
            achievements: default_achievements(),
        }
    }
}

impl TrainerConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TrainerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for algorithm in Algorithm::ALL {
            validate_profile(algorithm, self.sequences.profile(algorithm))?;
        }

        for level in &self.mastery {
            if level.min_accuracy > 100 {
                return Err(TrainerError::InvalidConfig(format!(
                    "{} accuracy threshold {} exceeds 100",
                    level.mastery.as_str(),
                    level.min_accuracy
                )));
            }
        }

        let mut seen = AHashSet::with_capacity(self.achievements.len());
        for achievement in &self.achievements {
            if !is_valid_achievement_id(&achievement.id) {
                return Err(TrainerError::InvalidConfig(format!(
                    "Invalid achievement id: {:?}",
                    achievement.id
                )));
            }
            if !seen.insert(achievement.id.as_str()) {
                return Err(TrainerError::InvalidConfig(format!(
                    "Duplicate achievement id: {}",
                    achievement.id
                )));
            }
            validate_condition(&achievement.condition).map_err(|e| {
                TrainerError::InvalidConfig(format!("Achievement {}: {}", achievement.id, e))
            })?;
        }

        Ok(())
    }

    pub fn achievement(&self, id: &str) -> Option<&AchievementConfig> {
        self.achievements.iter().find(|a| a.id == id)
    }
}

fn validate_profile(algorithm: Algorithm, profile: &SequenceProfile) -> Result<()> {
    let sizes = [profile.easy, profile.medium, profile.hard];
    if let Some(&bad) = sizes.iter().find(|&&s| s == 0) {
        return Err(TrainerError::InvalidSize(bad));
    }

    let largest = sizes.iter().copied().max().unwrap_or(0);
    let span = (profile.max_value as i128) - (profile.min_value as i128) + 1;
    let too_small = span < 1 || (algorithm.needs_sorted_input() && span < largest as i128);
    if too_small {
        return Err(TrainerError::InvalidRange {
            min: profile.min_value,
            max: profile.max_value,
            size: largest,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TrainerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.achievement("first_win").is_some());
        assert_eq!(config.scoring.reward, 10);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = TrainerConfig::from_json("{}").unwrap();
        assert_eq!(config, TrainerConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "scoring": {"reward": 5},
            "achievements": [
                {"id": "quick", "name": "Quick", "trigger": "win", "condition": "TIME < 30"}
            ]
        }"#;
        let config = TrainerConfig::from_json(json).unwrap();
        assert_eq!(config.scoring.reward, 5);
        assert_eq!(config.scoring.penalty, 10);
        assert_eq!(config.achievements.len(), 1);
        assert_eq!(config.achievements[0].trigger, Trigger::Win);
    }

    #[test]
    fn test_rejects_bad_achievements() {
        let bad_id = r#"{"achievements": [{"id": "Bad Id", "name": "x"}]}"#;
        assert!(matches!(
            TrainerConfig::from_json(bad_id),
            Err(TrainerError::InvalidConfig(_))
        ));

        let dup = r#"{"achievements": [{"id": "a", "name": "x"}, {"id": "a", "name": "y"}]}"#;
        assert!(TrainerConfig::from_json(dup).is_err());

        let unknown = r#"{"achievements": [{"id": "a", "name": "x", "condition": "CHR>1"}]}"#;
        assert!(TrainerConfig::from_json(unknown).is_err());
    }

    #[test]
    fn test_rejects_bad_sequences() {
        let mut config = TrainerConfig::default();
        config.sequences.binary_search.max_value = 10;
        assert!(matches!(
            config.validate(),
            Err(TrainerError::InvalidRange { size: 20, .. })
        ));

        let mut config = TrainerConfig::default();
        config.sequences.bubble_sort.easy = 0;
        assert!(matches!(config.validate(), Err(TrainerError::InvalidSize(0))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            TrainerConfig::from_json("{not json"),
            Err(TrainerError::Json(_))
        ));
    }
}
