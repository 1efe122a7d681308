//! Achievement configuration structures

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TrainerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub trigger: Trigger,
    /// Condition expression; empty always holds
    #[serde(default)]
    pub condition: String,
}

/// Which recorded games an achievement is checked on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trigger {
    /// Every finished game
    #[default]
    Finish,
    /// Only won games
    Win,
}

impl FromStr for Trigger {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "finish" => Ok(Trigger::Finish),
            "win" => Ok(Trigger::Win),
            _ => Err(TrainerError::UnknownName {
                kind: "trigger",
                name: s.to_string(),
            }),
        }
    }
}

impl Trigger {
    #[inline]
    pub fn fires_on(&self, won: bool) -> bool {
        match self {
            Trigger::Finish => true,
            Trigger::Win => won,
        }
    }
}

fn achievement(
    id: &str,
    name: &str,
    description: &str,
    trigger: Trigger,
    condition: &str,
) -> AchievementConfig {
    AchievementConfig {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        trigger,
        condition: condition.to_string(),
    }
}

/// Built-in achievement set
pub fn default_achievements() -> Vec<AchievementConfig> {
    vec![
        achievement(
            "first_steps",
            "First Steps",
            "Finish your first game",
            Trigger::Finish,
            "TOTAL>=1",
        ),
        achievement("first_win", "First Win", "Win a game", Trigger::Win, "WON=1"),
        achievement(
            "flawless",
            "Flawless",
            "Win without a single mistake",
            Trigger::Win,
            "BAD=0 & ACT>0",
        ),
        achievement(
            "high_scorer",
            "High Scorer",
            "Score 200 points in one game",
            Trigger::Finish,
            "SCR>=200",
        ),
        achievement(
            "speed_sorter",
            "Speed Sorter",
            "Sort 8 or more values in under a minute",
            Trigger::Win,
            "ALG?[1,2] & TIME<60 & SIZE>=8",
        ),
        achievement(
            "efficient_searcher",
            "Efficient Searcher",
            "Find the target in a hard search without mistakes",
            Trigger::Win,
            "ALG=3 & SIZE>=20 & BAD=0",
        ),
        achievement(
            "sharp_eye",
            "Sharp Eye",
            "Reach 95% accuracy after playing 10 games of one algorithm",
            Trigger::Finish,
            "GAMES>=10 & ACC>=95",
        ),
        achievement("dedicated", "Dedicated", "Play 25 games", Trigger::Finish, "TOTAL>=25"),
        achievement(
            "grandmaster",
            "Grandmaster",
            "Reach Gold mastery on every algorithm",
            Trigger::Finish,
            "GOLD?[1] & GOLD?[2] & GOLD?[3]",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_fires_on() {
        assert!(Trigger::Finish.fires_on(false));
        assert!(!Trigger::Win.fires_on(false));
        assert!(Trigger::Win.fires_on(true));
        assert_eq!("WIN".parse::<Trigger>().ok(), Some(Trigger::Win));
        assert!("lose".parse::<Trigger>().is_err());
    }

    #[test]
    fn test_defaults_from_json() {
        let json = r#"{"id": "x", "name": "X"}"#;
        let config: AchievementConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.trigger, Trigger::Finish);
        assert!(config.condition.is_empty());
    }
}
