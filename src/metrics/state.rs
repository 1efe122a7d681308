//! Metric state for condition evaluation

use crate::config::Mastery;
use crate::progress::UserProfile;
use crate::trainer::{Algorithm, GameSummary};

/// Property names understood by the condition evaluator
pub const KNOWN_PROPERTIES: [&str; 15] = [
    "ALG", "SCR", "TIME", "OK", "BAD", "ACT", "ACC", "WON", "SIZE", "GAMES", "WINS", "BEST",
    "MST", "TOTAL", "GOLD",
];

/// Flat view of one game plus the player's aggregate progress
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricState {
    // This game
    pub algorithm: i64,
    pub score: i64,
    pub time: i64,
    pub correct: i64,
    pub incorrect: i64,
    pub accuracy: i64,
    pub won: i64,
    pub size: i64,

    // Progress on this game's algorithm
    pub games: i64,
    pub wins: i64,
    pub best: i64,
    pub mastery: i64,

    // Across all algorithms
    pub total_games: i64,
    /// Algorithm codes at Gold mastery
    pub gold: Vec<i64>,
}

impl MetricState {
    /// Build from a summary and a profile that already includes that game
    pub fn from_game(summary: &GameSummary, profile: &UserProfile) -> Self {
        let progress = profile.progress_for(summary.algorithm);

        let gold = Algorithm::ALL
            .iter()
            .filter(|a| profile.progress_for(**a).mastery == Mastery::Gold)
            .map(Algorithm::code)
            .collect();

        Self {
            algorithm: summary.algorithm.code(),
            score: i64::from(summary.score),
            time: i64::try_from(summary.elapsed_seconds).unwrap_or(i64::MAX),
            correct: i64::from(summary.correct_actions),
            incorrect: i64::from(summary.incorrect_actions),
            accuracy: i64::from(summary.accuracy_percent()),
            won: i64::from(summary.is_won()),
            size: summary.sequence_len as i64,
            games: i64::from(progress.stats.games_played),
            wins: i64::from(progress.stats.games_won),
            best: i64::from(progress.stats.best_score),
            mastery: progress.mastery.rank(),
            total_games: profile.total_games(),
            gold,
        }
    }
}
