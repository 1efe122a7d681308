//! Flat reward scoring

use serde::{Deserialize, Serialize};

pub const DEFAULT_REWARD: u32 = 10;
pub const DEFAULT_PENALTY: u32 = 10;

/// Points won for a correct action and lost for an incorrect one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub reward: u32,
    pub penalty: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            reward: DEFAULT_REWARD,
            penalty: DEFAULT_PENALTY,
        }
    }
}

impl ScoringPolicy {
    /// New score after an accepted action; never drops below 0.
    #[inline]
    pub fn apply_outcome(&self, score: u32, is_correct: bool) -> u32 {
        if is_correct {
            score.saturating_add(self.reward)
        } else {
            score.saturating_sub(self.penalty)
        }
    }
}

/// Score update with the default +10 / -10 policy
#[inline]
pub fn apply_outcome(score: u32, is_correct: bool) -> u32 {
    ScoringPolicy::default().apply_outcome(score, is_correct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        assert_eq!(apply_outcome(0, true), 10);
        assert_eq!(apply_outcome(30, false), 20);
    }

    #[test]
    fn test_floor_at_zero() {
        assert_eq!(apply_outcome(0, false), 0);
        assert_eq!(apply_outcome(5, false), 0);
    }

    #[test]
    fn test_custom_policy() {
        let policy = ScoringPolicy {
            reward: 5,
            penalty: 2,
        };
        assert_eq!(policy.apply_outcome(1, false), 0);
        assert_eq!(policy.apply_outcome(1, true), 6);
        assert_eq!(policy.apply_outcome(u32::MAX, true), u32::MAX);
    }
}
