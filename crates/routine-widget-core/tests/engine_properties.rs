//! Property tests for the routine engine.

use proptest::prelude::*;
use routine_widget_core::{Command, Mood, PlayerState, RoutineDefinition, RoutineEngine};

fn routines(durations: &[i64]) -> Vec<RoutineDefinition> {
    durations
        .iter()
        .enumerate()
        .map(|(i, d)| RoutineDefinition::new(format!("r{i}"), *d, format!("e{i}")))
        .collect()
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        4 => Just(Command::Tick),
        1 => Just(Command::Start),
        1 => Just(Command::Pause),
        1 => Just(Command::Resume),
        1 => Just(Command::Skip),
        1 => Just(Command::CompleteCurrent),
        1 => (1u8..=5).prop_map(|n| Command::SelectMood(Mood::new(n).unwrap())),
        1 => Just(Command::ShowReport),
        1 => Just(Command::Restart),
    ]
}

proptest! {
    #[test]
    fn counts_stay_consistent(
        durations in prop::collection::vec(-2i64..3, 1..6),
        commands in prop::collection::vec(command(), 0..300),
    ) {
        let mut engine = RoutineEngine::new(routines(&durations));
        for command in commands {
            engine.apply(command);

            prop_assert_eq!(engine.completed_count(), engine.completed_routines().len());
            prop_assert!(engine.completed_count() <= durations.len());
            if matches!(engine.state(), PlayerState::Playing | PlayerState::Paused) {
                let current = engine.current_routine().unwrap();
                prop_assert!(engine.remaining_secs() >= 1);
                prop_assert!(engine.remaining_secs() <= current.duration_secs());
            }
            if engine.state() == PlayerState::Idle {
                prop_assert_eq!(engine.completed_count(), 0);
            }
        }
    }

    #[test]
    fn skipped_routines_never_complete(
        plan in prop::collection::vec(any::<bool>(), 1..8),
        paused in any::<bool>(),
    ) {
        let durations = vec![1; plan.len()];
        let mut engine = RoutineEngine::new(routines(&durations));
        engine.start();
        if paused {
            engine.pause();
        }

        for &complete in &plan {
            if complete {
                engine.complete_current();
            } else {
                engine.skip();
            }
        }

        prop_assert_eq!(engine.state(), PlayerState::Mood);
        let expected: Vec<String> = plan
            .iter()
            .enumerate()
            .filter(|(_, complete)| **complete)
            .map(|(i, _)| format!("r{i}"))
            .collect();
        let names: Vec<String> = engine.completed_routines().iter().map(|r| r.name.clone()).collect();
        prop_assert_eq!(names, expected);
    }

    #[test]
    fn ticking_through_every_routine_reaches_mood(durations in prop::collection::vec(-1i64..4, 1..5)) {
        let defs = routines(&durations);
        let total_ticks: u64 = defs.iter().map(RoutineDefinition::duration_secs).sum();
        let mut engine = RoutineEngine::new(defs);
        engine.start();

        for _ in 1..total_ticks {
            engine.tick();
        }
        prop_assert_eq!(engine.state(), PlayerState::Playing);
        engine.tick();

        prop_assert_eq!(engine.state(), PlayerState::Mood);
        prop_assert_eq!(engine.completed_count(), durations.len());
        prop_assert_eq!(engine.remaining_secs(), 0);
    }

    #[test]
    fn full_session_reports_every_completion(len in 1usize..8, rating in 1u8..=5) {
        let mut engine = RoutineEngine::new(routines(&vec![2; len]));
        engine.start();
        for _ in 0..len {
            prop_assert!(engine.complete_current().is_some());
        }
        prop_assert_eq!(engine.state(), PlayerState::Mood);
        prop_assert!(engine.select_mood(rating).is_some());
        prop_assert!(engine.select_mood(rating).is_none());
        prop_assert!(engine.show_report().is_some());
        prop_assert_eq!(engine.state(), PlayerState::Report);
        prop_assert_eq!(engine.completed_count(), len);
    }
}
