//! Routine progression engine.
//!
//! A tick-driven state machine. It does not own a timer and performs no I/O:
//! the host calls `tick()` once per second while the state is `Playing`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Playing <-> Paused -> Mood -> Report -> Idle
//! ```
//!
//! Every command is one row of the table in [`RoutineEngine::step`]. Rows that
//! are not in the table leave the state untouched and yield no event.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = RoutineEngine::new(routines);
//! engine.start();
//! // Once per second while playing:
//! engine.tick(); // Returns Some(Event) when a routine rolls over
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::definition::{CompletedRoutine, Mood, RoutineDefinition};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Idle,
    Playing,
    Paused,
    Mood,
    Report,
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlayerState::Idle => "idle",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
            PlayerState::Mood => "mood",
            PlayerState::Report => "report",
        };
        f.write_str(name)
    }
}

/// Inputs accepted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Tick,
    Pause,
    Resume,
    /// "Next": move on without recording the routine.
    Skip,
    /// "Done": record the routine and move on.
    CompleteCurrent,
    SelectMood(Mood),
    ShowReport,
    Restart,
}

/// State of one play-through. Only exists outside `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineSession {
    current_index: usize,
    /// Countdown for the current routine. 0 marks the routine boundary.
    remaining_secs: u64,
    completed: Vec<CompletedRoutine>,
    mood: Option<Mood>,
}

impl RoutineSession {
    fn new(first_duration_secs: u64) -> Self {
        Self {
            current_index: 0,
            remaining_secs: first_duration_secs,
            completed: Vec::new(),
            mood: None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Routines recorded as done. Always equal to `completed_routines().len()`.
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn completed_routines(&self) -> &[CompletedRoutine] {
        &self.completed
    }

    pub fn mood(&self) -> Option<Mood> {
        self.mood
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Playing(RoutineSession),
    Paused(RoutineSession),
    Mood(RoutineSession),
    Report(RoutineSession),
}

impl Phase {
    fn state(&self) -> PlayerState {
        match self {
            Phase::Idle => PlayerState::Idle,
            Phase::Playing(_) => PlayerState::Playing,
            Phase::Paused(_) => PlayerState::Paused,
            Phase::Mood(_) => PlayerState::Mood,
            Phase::Report(_) => PlayerState::Report,
        }
    }

    fn session(&self) -> Option<&RoutineSession> {
        match self {
            Phase::Idle => None,
            Phase::Playing(s) | Phase::Paused(s) | Phase::Mood(s) | Phase::Report(s) => Some(s),
        }
    }
}

/// Core routine engine.
///
/// The routine list is fixed for the engine's lifetime; sessions come and go.
#[derive(Debug, Clone)]
pub struct RoutineEngine {
    routines: Vec<RoutineDefinition>,
    phase: Phase,
}

impl RoutineEngine {
    /// Create an engine in `Idle`. An empty list is allowed; `start()` is then a no-op.
    pub fn new(routines: Vec<RoutineDefinition>) -> Self {
        Self {
            routines,
            phase: Phase::Idle,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> PlayerState {
        self.phase.state()
    }

    pub fn routines(&self) -> &[RoutineDefinition] {
        &self.routines
    }

    pub fn session(&self) -> Option<&RoutineSession> {
        self.phase.session()
    }

    pub fn current_index(&self) -> usize {
        self.session().map(|s| s.current_index).unwrap_or(0)
    }

    pub fn remaining_secs(&self) -> u64 {
        self.session().map(|s| s.remaining_secs).unwrap_or(0)
    }

    pub fn completed_count(&self) -> usize {
        self.session().map(|s| s.completed_count()).unwrap_or(0)
    }

    pub fn completed_routines(&self) -> &[CompletedRoutine] {
        self.session().map(|s| s.completed_routines()).unwrap_or(&[])
    }

    pub fn mood(&self) -> Option<Mood> {
        self.session().and_then(|s| s.mood)
    }

    pub fn current_routine(&self) -> Option<&RoutineDefinition> {
        self.routines.get(self.current_index())
    }

    /// Duration of the current routine in seconds (floor applied).
    pub fn total_secs(&self) -> u64 {
        match self.session() {
            Some(_) => self.current_routine().map(|r| r.duration_secs()).unwrap_or(0),
            None => 0,
        }
    }

    /// 0.0 .. 100.0 progress within the current routine.
    pub fn routine_progress_pct(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_secs());
        (elapsed as f64 / total as f64 * 100.0).min(100.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let routine = self.current_routine();
        Event::StateSnapshot {
            state: self.state(),
            routine_index: self.current_index(),
            routine_name: routine.map(|r| r.name.clone()).unwrap_or_default(),
            emoji: routine.map(|r| r.emoji.clone()).unwrap_or_default(),
            remaining_secs: self.remaining_secs(),
            total_secs: self.total_secs(),
            routine_progress_pct: self.routine_progress_pct(),
            completed_count: self.completed_count(),
            total_count: self.routines.len(),
            mood: self.mood(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.apply(Command::Start)
    }

    /// Call once per second. Returns `Some(Event::RoutineCompleted)` at a routine boundary.
    pub fn tick(&mut self) -> Option<Event> {
        self.apply(Command::Tick)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.apply(Command::Pause)
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.apply(Command::Resume)
    }

    pub fn skip(&mut self) -> Option<Event> {
        self.apply(Command::Skip)
    }

    pub fn complete_current(&mut self) -> Option<Event> {
        self.apply(Command::CompleteCurrent)
    }

    /// Record the rating (1..=5). Out-of-range ratings are ignored.
    pub fn select_mood(&mut self, rating: u8) -> Option<Event> {
        match Mood::new(rating) {
            Some(mood) => self.apply(Command::SelectMood(mood)),
            None => {
                tracing::debug!(rating, "mood rating out of range; ignored");
                None
            }
        }
    }

    pub fn show_report(&mut self) -> Option<Event> {
        self.apply(Command::ShowReport)
    }

    pub fn restart(&mut self) -> Option<Event> {
        self.apply(Command::Restart)
    }

    /// Run one command through the transition table.
    pub fn apply(&mut self, command: Command) -> Option<Event> {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        let (next, event) = self.step(phase, command);
        self.phase = next;
        event
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn step(&self, phase: Phase, command: Command) -> (Phase, Option<Event>) {
        match (phase, command) {
            (Phase::Idle, Command::Start) => match self.routines.first() {
                Some(first) => {
                    let duration_secs = first.duration_secs();
                    tracing::info!(routines = self.routines.len(), "routine session started");
                    let event = Event::SessionStarted {
                        routine_index: 0,
                        routine_name: first.name.clone(),
                        duration_secs,
                        total_routines: self.routines.len(),
                        at: Utc::now(),
                    };
                    (Phase::Playing(RoutineSession::new(duration_secs)), Some(event))
                }
                None => {
                    tracing::warn!("no routines configured; start ignored");
                    (Phase::Idle, None)
                }
            },
            (Phase::Playing(mut session), Command::Tick) => {
                session.remaining_secs = session.remaining_secs.saturating_sub(1);
                if session.remaining_secs > 0 {
                    return (Phase::Playing(session), None);
                }
                self.finish_current(session, false)
            }
            (Phase::Playing(session), Command::Pause) => {
                let event = Event::SessionPaused {
                    remaining_secs: session.remaining_secs,
                    at: Utc::now(),
                };
                (Phase::Paused(session), Some(event))
            }
            (Phase::Paused(session), Command::Resume) => {
                let event = Event::SessionResumed {
                    remaining_secs: session.remaining_secs,
                    at: Utc::now(),
                };
                (Phase::Playing(session), Some(event))
            }
            (Phase::Playing(session), Command::Skip) => {
                let (session, next_index, event) = self.skip_current(session);
                match next_index {
                    Some(_) => (Phase::Playing(session), Some(event)),
                    None => (Phase::Mood(session), Some(event)),
                }
            }
            (Phase::Paused(session), Command::Skip) => {
                let (session, next_index, event) = self.skip_current(session);
                match next_index {
                    Some(_) => (Phase::Paused(session), Some(event)),
                    None => (Phase::Mood(session), Some(event)),
                }
            }
            (Phase::Playing(session) | Phase::Paused(session), Command::CompleteCurrent) => {
                self.finish_current(session, true)
            }
            (Phase::Mood(mut session), Command::SelectMood(mood)) if session.mood.is_none() => {
                session.mood = Some(mood);
                (Phase::Mood(session), Some(Event::MoodSelected { mood, at: Utc::now() }))
            }
            (Phase::Mood(session), Command::ShowReport) if session.mood.is_some() => {
                let event = Event::ReportShown {
                    completed_count: session.completed_count(),
                    total_count: self.routines.len(),
                    at: Utc::now(),
                };
                (Phase::Report(session), Some(event))
            }
            (Phase::Report(_), Command::Restart) => {
                (Phase::Idle, Some(Event::SessionReset { at: Utc::now() }))
            }
            (phase, command) => {
                tracing::debug!(state = %phase.state(), ?command, "transition ignored");
                (phase, None)
            }
        }
    }

    /// Record the current routine and move past it.
    fn finish_current(&self, mut session: RoutineSession, manual: bool) -> (Phase, Option<Event>) {
        let routine_index = session.current_index;
        let routine = &self.routines[routine_index];
        session.completed.push(CompletedRoutine::from(routine));
        let next_index = self.advance(&mut session);

        let event = Event::RoutineCompleted {
            routine_index,
            routine_name: routine.name.clone(),
            emoji: routine.emoji.clone(),
            manual,
            next_index,
            at: Utc::now(),
        };
        match next_index {
            Some(_) => (Phase::Playing(session), Some(event)),
            None => {
                tracing::info!(
                    completed = session.completed_count(),
                    total = self.routines.len(),
                    "all routines finished"
                );
                (Phase::Mood(session), Some(event))
            }
        }
    }

    fn skip_current(&self, mut session: RoutineSession) -> (RoutineSession, Option<usize>, Event) {
        let routine_index = session.current_index;
        let next_index = self.advance(&mut session);
        let event = Event::RoutineSkipped {
            routine_index,
            next_index,
            at: Utc::now(),
        };
        (session, next_index, event)
    }

    /// Move to the next routine. Returns its index, or `None` after the last one.
    fn advance(&self, session: &mut RoutineSession) -> Option<usize> {
        let next = session.current_index + 1;
        match self.routines.get(next) {
            Some(routine) => {
                session.current_index = next;
                session.remaining_secs = routine.duration_secs();
                Some(next)
            }
            None => {
                session.remaining_secs = 0;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_routines() -> Vec<RoutineDefinition> {
        vec![
            RoutineDefinition::new("Stretch", 1, "🧘"),
            RoutineDefinition::new("Water", 1, "💧"),
        ]
    }

    fn tick_n(engine: &mut RoutineEngine, n: usize) {
        for _ in 0..n {
            engine.tick();
        }
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = RoutineEngine::new(two_routines());
        assert_eq!(engine.state(), PlayerState::Idle);

        assert!(engine.start().is_some());
        assert_eq!(engine.state(), PlayerState::Playing);

        assert!(engine.pause().is_some());
        assert_eq!(engine.state(), PlayerState::Paused);

        assert!(engine.resume().is_some());
        assert_eq!(engine.state(), PlayerState::Playing);
    }

    #[test]
    fn start_with_no_routines_stays_idle() {
        let mut engine = RoutineEngine::new(Vec::new());
        assert!(engine.start().is_none());
        assert_eq!(engine.state(), PlayerState::Idle);
        assert!(engine.session().is_none());
    }

    #[test]
    fn two_routine_scenario_runs_to_mood() {
        let mut engine = RoutineEngine::new(two_routines());
        engine.start();
        assert_eq!(engine.remaining_secs(), 60);
        assert_eq!(engine.current_index(), 0);

        tick_n(&mut engine, 60);
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.remaining_secs(), 60);
        assert_eq!(engine.completed_count(), 1);
        assert_eq!(engine.state(), PlayerState::Playing);

        tick_n(&mut engine, 60);
        assert_eq!(engine.state(), PlayerState::Mood);
        assert_eq!(engine.completed_count(), 2);
        assert_eq!(
            engine.completed_routines(),
            &[
                CompletedRoutine { name: "Stretch".into(), emoji: "🧘".into() },
                CompletedRoutine { name: "Water".into(), emoji: "💧".into() },
            ]
        );
    }

    #[test]
    fn rollover_happens_on_the_sixtieth_tick() {
        let mut engine = RoutineEngine::new(two_routines());
        engine.start();
        tick_n(&mut engine, 59);
        assert_eq!(engine.current_index(), 0);
        assert_eq!(engine.remaining_secs(), 1);
        match engine.tick() {
            Some(Event::RoutineCompleted { routine_index, manual, next_index, .. }) => {
                assert_eq!(routine_index, 0);
                assert!(!manual);
                assert_eq!(next_index, Some(1));
            }
            other => panic!("Expected RoutineCompleted, got {other:?}"),
        }
    }

    #[test]
    fn zero_duration_behaves_like_one_minute() {
        let mut zero = RoutineEngine::new(vec![RoutineDefinition::new("a", 0, "")]);
        let mut one = RoutineEngine::new(vec![RoutineDefinition::new("a", 1, "")]);
        zero.start();
        one.start();
        assert_eq!(zero.remaining_secs(), one.remaining_secs());
        tick_n(&mut zero, 59);
        assert_eq!(zero.state(), PlayerState::Playing);
        zero.tick();
        assert_eq!(zero.state(), PlayerState::Mood);
    }

    #[test]
    fn skip_on_last_routine_goes_to_mood_without_credit() {
        let mut engine = RoutineEngine::new(two_routines());
        engine.start();
        engine.skip();
        assert_eq!(engine.current_index(), 1);
        engine.skip();
        assert_eq!(engine.state(), PlayerState::Mood);
        assert_eq!(engine.completed_count(), 0);
        assert!(engine.completed_routines().is_empty());
    }

    #[test]
    fn skip_while_paused_stays_paused() {
        let mut engine = RoutineEngine::new(two_routines());
        engine.start();
        engine.pause();
        engine.skip();
        assert_eq!(engine.state(), PlayerState::Paused);
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.remaining_secs(), 60);
    }

    #[test]
    fn done_while_paused_resumes_on_next_routine() {
        let mut engine = RoutineEngine::new(two_routines());
        engine.start();
        engine.pause();
        engine.complete_current();
        assert_eq!(engine.state(), PlayerState::Playing);
        assert_eq!(engine.completed_count(), 1);
    }

    #[test]
    fn pause_is_idempotent() {
        let mut engine = RoutineEngine::new(two_routines());
        engine.start();
        engine.tick();
        assert!(engine.pause().is_some());
        let before = engine.session().cloned();
        assert!(engine.pause().is_none());
        assert_eq!(engine.state(), PlayerState::Paused);
        assert_eq!(engine.session().cloned(), before);
    }

    #[test]
    fn ticks_are_ignored_while_paused() {
        let mut engine = RoutineEngine::new(two_routines());
        engine.start();
        engine.pause();
        tick_n(&mut engine, 120);
        assert_eq!(engine.remaining_secs(), 60);
        assert_eq!(engine.state(), PlayerState::Paused);
    }

    #[test]
    fn illegal_transitions_are_noops() {
        let mut engine = RoutineEngine::new(two_routines());
        assert!(engine.pause().is_none());
        assert!(engine.resume().is_none());
        assert!(engine.skip().is_none());
        assert!(engine.complete_current().is_none());
        assert!(engine.select_mood(3).is_none());
        assert!(engine.show_report().is_none());
        assert!(engine.restart().is_none());
        assert_eq!(engine.state(), PlayerState::Idle);

        engine.start();
        assert!(engine.start().is_none());
        assert_eq!(engine.current_index(), 0);
    }

    #[test]
    fn mood_then_report_then_restart() {
        let mut engine = RoutineEngine::new(two_routines());
        engine.start();
        engine.complete_current();
        engine.complete_current();
        assert_eq!(engine.state(), PlayerState::Mood);

        assert!(engine.show_report().is_none(), "report needs a mood first");
        assert!(engine.select_mood(9).is_none());
        assert!(engine.select_mood(4).is_some());
        assert!(engine.select_mood(2).is_none(), "mood is set once");
        assert_eq!(engine.mood().map(|m| m.to_string()), Some("4점".to_string()));

        assert!(engine.show_report().is_some());
        assert_eq!(engine.state(), PlayerState::Report);
        assert_eq!(engine.completed_count(), 2);

        assert!(engine.restart().is_some());
        assert_eq!(engine.state(), PlayerState::Idle);
        assert!(engine.session().is_none());
        assert!(engine.mood().is_none());

        engine.start();
        assert_eq!(engine.completed_count(), 0);
        assert!(engine.mood().is_none());
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let mut engine = RoutineEngine::new(two_routines());
        engine.start();
        tick_n(&mut engine, 15);
        match engine.snapshot() {
            Event::StateSnapshot {
                state,
                routine_index,
                remaining_secs,
                total_secs,
                routine_progress_pct,
                ..
            } => {
                assert_eq!(state, PlayerState::Playing);
                assert_eq!(routine_index, 0);
                assert_eq!(remaining_secs, 45);
                assert_eq!(total_secs, 60);
                assert!((routine_progress_pct - 25.0).abs() < f64::EPSILON);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
