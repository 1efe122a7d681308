//! Property tests for sessions and the trainer

use proptest::prelude::*;

use crate::config::TrainerConfig;
use crate::rules::Action;
use crate::trainer::{apply_action, Algorithm, GameSession, Status, Trainer};

// ═══════════════════════════════════════════════════════════════════════════
// Strategies
// ═══════════════════════════════════════════════════════════════════════════

fn algorithm_strategy() -> impl Strategy<Value = Algorithm> {
    prop_oneof![
        Just(Algorithm::BubbleSort),
        Just(Algorithm::InsertionSort),
        Just(Algorithm::BinarySearch),
    ]
}

/// Any action, including ones foreign to the session's algorithm
fn action_strategy() -> impl Strategy<Value = Action> {
    let value = -3isize..25;
    prop_oneof![
        Just(Action::Swap),
        Just(Action::Skip),
        Just(Action::Shift),
        Just(Action::Insert),
        Just(Action::GoLeft),
        Just(Action::GoRight),
        Just(Action::Found),
        value.clone().prop_map(Action::ConfirmLeft),
        value.clone().prop_map(Action::ConfirmRight),
        value.prop_map(Action::ConfirmMid),
    ]
}

fn session_strategy() -> impl Strategy<Value = GameSession> {
    (algorithm_strategy(), 1usize..=15, any::<u64>()).prop_map(|(algorithm, size, seed)| {
        let mut trainer = Trainer::with_seed(TrainerConfig::default(), seed);
        trainer.new_session_at(algorithm, size, 0).unwrap()
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Score never drops below zero, terminal states are final, and
    /// rejected actions leave the session exactly as it was
    #[test]
    fn prop_random_play_invariants(
        session in session_strategy(),
        actions in prop::collection::vec(action_strategy(), 0..120),
    ) {
        let mut session = session;
        let mut multiset: Vec<i64> = session.sequence().to_vec();
        multiset.sort_unstable();
        let mut was_terminal = session.is_terminal();
        let mut terminal_status = session.status();

        for (i, action) in actions.into_iter().enumerate() {
            let before = session.clone();
            let outcome = session.apply(action, i as u64 * 100);

            if !outcome.accepted() {
                prop_assert_eq!(&session, &before);
                prop_assert_eq!(outcome.score_delta, 0);
            }
            if was_terminal {
                prop_assert!(!outcome.accepted());
                prop_assert_eq!(session.status(), terminal_status);
            }
            prop_assert_eq!(outcome.score, session.score());
            prop_assert_eq!(session.stats().total() as usize, session.history().len());

            let mut current = session.sequence().to_vec();
            current.sort_unstable();
            prop_assert_eq!(&current, &multiset);

            was_terminal = session.is_terminal();
            terminal_status = session.status();
        }
    }

    /// Canonical play always wins with a perfect record
    #[test]
    fn prop_canonical_play_wins(session in session_strategy()) {
        let mut session = session;
        let mut now = 0;
        while let Some(action) = session.expected_action() {
            now += 250;
            let outcome = session.apply(action, now);
            prop_assert!(outcome.correct(), "{:?} judged incorrect", action);
            prop_assert!(now < 1_000_000);
        }

        prop_assert_eq!(session.status(), Status::Won);
        let summary = session.summary(now);
        prop_assert_eq!(summary.incorrect_actions, 0);
        prop_assert_eq!(summary.score, 10 * summary.correct_actions);
        if session.algorithm() != Algorithm::BinarySearch {
            prop_assert!(crate::rules::is_ascending(session.sequence()));
        }
    }

    /// Elapsed time stops at the finishing action
    #[test]
    fn prop_elapsed_frozen_after_finish(session in session_strategy(), later in 1u64..10_000_000) {
        let mut session = session;
        let mut now = 0;
        while let Some(action) = session.expected_action() {
            now += 1_000;
            session = apply_action(session, action, now).session;
        }

        let at_finish = session.elapsed_seconds(now);
        prop_assert_eq!(session.elapsed_seconds(now + later), at_finish);
        prop_assert_eq!(session.summary(now + later).elapsed_seconds, at_finish);
    }
}
