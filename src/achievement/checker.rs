//! Achievement checking logic

use log::warn;
use serde::{Deserialize, Serialize};

use crate::condition::cache::check_condition;
use crate::config::AchievementConfig;
use crate::metrics::MetricState;

/// Achievement info for results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&AchievementConfig> for AchievementInfo {
    fn from(config: &AchievementConfig) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
        }
    }
}

/// Achievements newly satisfied by a recorded game, in config order.
///
/// A condition that fails to parse never unlocks.
pub fn check_achievements(
    won: bool,
    state: &MetricState,
    unlocked: &[String],
    achievements: &[AchievementConfig],
) -> Vec<AchievementInfo> {
    achievements
        .iter()
        .filter(|a| a.trigger.fires_on(won))
        .filter(|a| !is_unlocked(&a.id, unlocked))
        .filter(|a| match check_condition(&a.condition, state) {
            Ok(hit) => hit,
            Err(e) => {
                warn!("achievement {} skipped: {}", a.id, e);
                false
            }
        })
        .map(AchievementInfo::from)
        .collect()
}

#[inline]
pub fn is_unlocked(id: &str, unlocked: &[String]) -> bool {
    unlocked.iter().any(|u| u == id)
}

/// Add an id once; returns whether it was new
pub fn unlock_achievement(id: &str, unlocked: &mut Vec<String>) -> bool {
    if is_unlocked(id, unlocked) {
        return false;
    }
    unlocked.push(id.to_string());
    true
}
