//! Folding finished games into a profile

use log::info;
use serde::Serialize;

use crate::achievement::{check_achievements, unlock_achievement, AchievementInfo};
use crate::config::{Mastery, MasteryLevel, TrainerConfig};
use crate::error::{Result, TrainerError};
use crate::metrics::MetricState;
use crate::trainer::{percent, Algorithm, GameSummary, Status};

use super::{AlgorithmStats, ProgressStore, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordOutcome {
    pub algorithm: Algorithm,
    pub mastery_before: Mastery,
    pub mastery_after: Mastery,
    pub new_achievements: Vec<AchievementInfo>,
}

impl RecordOutcome {
    pub fn mastery_changed(&self) -> bool {
        self.mastery_before != self.mastery_after
    }
}

/// Highest mastery whose thresholds the stats meet
pub fn derive_mastery(stats: &AlgorithmStats, levels: &[MasteryLevel]) -> Mastery {
    levels
        .iter()
        .filter(|l| l.is_met(stats.games_won, stats.accuracy, stats.games_played))
        .map(|l| l.mastery)
        .max()
        .unwrap_or_default()
}

/// Add a finished game to the profile.
///
/// Mastery never goes down. Achievements are checked after the stats are
/// updated and unlock at most once.
pub fn record_game(
    profile: &mut UserProfile,
    summary: &GameSummary,
    config: &TrainerConfig,
) -> Result<RecordOutcome> {
    if summary.status == Status::InProgress {
        return Err(TrainerError::GameNotFinished);
    }

    let progress = profile.progress_mut(summary.algorithm);
    let mastery_before = progress.mastery;

    let stats = &mut progress.stats;
    stats.time_spent = stats.time_spent.saturating_add(summary.elapsed_seconds);
    stats.games_played = stats.games_played.saturating_add(1);
    if summary.is_won() {
        stats.games_won = stats.games_won.saturating_add(1);
    }
    stats.best_score = stats.best_score.max(summary.score);
    stats.correct_actions += u64::from(summary.correct_actions);
    stats.total_actions += u64::from(summary.total_actions());
    stats.accuracy = percent(stats.correct_actions, stats.total_actions);

    let mastery_after = mastery_before.max(derive_mastery(stats, &config.mastery));
    progress.mastery = mastery_after;

    let state = MetricState::from_game(summary, profile);
    let new_achievements = check_achievements(
        summary.is_won(),
        &state,
        &profile.achievements,
        &config.achievements,
    );
    for achievement in &new_achievements {
        unlock_achievement(&achievement.id, &mut profile.achievements);
    }

    info!(
        "recorded {} game for {:?}: {} -> {}, {} new achievement(s)",
        summary.algorithm,
        profile.username,
        mastery_before.as_str(),
        mastery_after.as_str(),
        new_achievements.len()
    );

    Ok(RecordOutcome {
        algorithm: summary.algorithm,
        mastery_before,
        mastery_after,
        new_achievements,
    })
}

/// Load (or create), record and save as one store step
pub fn record_and_save<S: ProgressStore + ?Sized>(
    store: &S,
    uid: &str,
    summary: &GameSummary,
    config: &TrainerConfig,
) -> Result<(UserProfile, RecordOutcome)> {
    let mut outcome = None;
    let profile = store.modify(uid, &mut |profile: &mut UserProfile| {
        outcome = Some(record_game(profile, summary, config)?);
        Ok(())
    })?;
    let outcome = outcome.ok_or_else(|| TrainerError::ProfileNotFound(uid.to_string()))?;
    Ok((profile, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{JsonFileStore, MemoryStore};

    fn summary(algorithm: Algorithm, status: Status, correct: u32, incorrect: u32) -> GameSummary {
        GameSummary {
            algorithm,
            status,
            score: correct * 10,
            elapsed_seconds: 45,
            correct_actions: correct,
            incorrect_actions: incorrect,
            sequence_len: 8,
        }
    }

    #[test]
    fn test_in_progress_game_rejected() {
        let mut profile = UserProfile::new("ada");
        let result = record_game(
            &mut profile,
            &summary(Algorithm::BubbleSort, Status::InProgress, 1, 0),
            &TrainerConfig::default(),
        );
        assert!(matches!(result, Err(TrainerError::GameNotFinished)));
        assert_eq!(profile, UserProfile::new("ada"));
    }

    #[test]
    fn test_stats_accumulate() {
        let config = TrainerConfig::default();
        let mut profile = UserProfile::new("ada");

        let won = summary(Algorithm::BubbleSort, Status::Won, 9, 1);
        let lost = summary(Algorithm::BubbleSort, Status::Lost, 3, 7);
        record_game(&mut profile, &won, &config).unwrap();
        record_game(&mut profile, &lost, &config).unwrap();

        let stats = profile.progress_for(Algorithm::BubbleSort).stats;
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.games_won, 1);
        assert_eq!(stats.time_spent, 90);
        assert_eq!(stats.best_score, 90);
        // 12 of 20 actions correct
        assert_eq!(stats.accuracy, 60);
    }

    #[test]
    fn test_first_win_unlocks_once() {
        let config = TrainerConfig::default();
        let mut profile = UserProfile::new("ada");

        let game = summary(Algorithm::InsertionSort, Status::Won, 10, 0);
        let first = record_game(&mut profile, &game, &config).unwrap();
        let ids: Vec<_> = first.new_achievements.iter().map(|a| a.id.as_str()).collect();
        assert!(ids.contains(&"first_steps"));
        assert!(ids.contains(&"first_win"));
        assert!(ids.contains(&"flawless"));
        assert_eq!(first.mastery_after, Mastery::Bronze);
        assert!(first.mastery_changed());

        let second = record_game(&mut profile, &game, &config).unwrap();
        assert!(second.new_achievements.iter().all(|a| a.id != "first_win"));
        let count = profile.achievements.iter().filter(|a| *a == "first_win").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_mastery_never_drops() {
        let config = TrainerConfig::default();
        let mut profile = UserProfile::new("ada");
        profile.progress_mut(Algorithm::BinarySearch).mastery = Mastery::Gold;

        let game = summary(Algorithm::BinarySearch, Status::Lost, 0, 10);
        let outcome = record_game(&mut profile, &game, &config).unwrap();
        assert_eq!(outcome.mastery_after, Mastery::Gold);
        assert!(!outcome.mastery_changed());
    }

    #[test]
    fn test_gold_after_five_accurate_wins() {
        let config = TrainerConfig::default();
        let mut profile = UserProfile::new("ada");
        let game = summary(Algorithm::BubbleSort, Status::Won, 19, 1);
        let mut last = None;
        for _ in 0..5 {
            last = Some(record_game(&mut profile, &game, &config).unwrap());
        }
        assert_eq!(last.unwrap().mastery_after, Mastery::Gold);
    }

    #[test]
    fn test_derive_mastery_thresholds() {
        let levels = crate::config::default_mastery_levels();
        let stats = AlgorithmStats {
            games_won: 3,
            accuracy: 80,
            games_played: 4,
            ..Default::default()
        };
        assert_eq!(derive_mastery(&stats, &levels), Mastery::Silver);
        assert_eq!(derive_mastery(&AlgorithmStats::default(), &levels), Mastery::Unranked);
    }

    #[test]
    fn test_record_and_save() {
        let store = MemoryStore::new();
        let config = TrainerConfig::default();
        let game = summary(Algorithm::BubbleSort, Status::Won, 5, 0);
        let (profile, _) = record_and_save(&store, "u1", &game, &config).unwrap();
        assert_eq!(store.load("u1").unwrap(), Some(profile));
    }

    #[test]
    fn test_unfinished_game_is_not_saved() {
        let store = MemoryStore::new();
        let game = summary(Algorithm::BubbleSort, Status::InProgress, 1, 0);
        let result = record_and_save(&store, "u1", &game, &TrainerConfig::default());
        assert!(matches!(result, Err(TrainerError::GameNotFinished)));
        assert_eq!(store.load("u1").unwrap(), None);
    }

    #[test]
    fn test_concurrent_records_in_memory_all_count() {
        let store = MemoryStore::new();
        let config = TrainerConfig::default();
        let game = summary(Algorithm::BubbleSort, Status::Won, 5, 0);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| s.spawn(|| record_and_save(&store, "u1", &game, &config)))
                .collect();
            for handle in handles {
                assert!(handle.join().unwrap().is_ok());
            }
        });

        let stats = store.load("u1").unwrap().unwrap().progress_for(Algorithm::BubbleSort).stats;
        assert_eq!(stats.games_played, 16);
    }

    #[test]
    fn test_concurrent_records_on_disk_all_count() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainerConfig::default();
        let game = summary(Algorithm::BubbleSort, Status::Won, 5, 0);

        // A store per thread, as separate host workers would open them
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    s.spawn(|| {
                        let store = JsonFileStore::new(dir.path())?;
                        record_and_save(&store, "u1", &game, &config)
                    })
                })
                .collect();
            for handle in handles {
                assert!(handle.join().unwrap().is_ok());
            }
        });

        let store = JsonFileStore::new(dir.path()).unwrap();
        let stats = store.load("u1").unwrap().unwrap().progress_for(Algorithm::BubbleSort).stats;
        assert_eq!(stats.games_played, 16);
        assert_eq!(stats.games_won, 16);
    }
}
