use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::routine::{Mood, PlayerState};

/// Every accepted engine transition produces an Event.
/// The host renders from them; rejected transitions produce none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        routine_index: usize,
        routine_name: String,
        duration_secs: u64,
        total_routines: usize,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A routine was recorded as done, either by its countdown running out
    /// or by an explicit "Done". `next_index` is `None` when the session
    /// moved on to the mood screen.
    RoutineCompleted {
        routine_index: usize,
        routine_name: String,
        emoji: String,
        manual: bool,
        next_index: Option<usize>,
        at: DateTime<Utc>,
    },
    /// A routine was passed over with "Next". It is not recorded.
    RoutineSkipped {
        routine_index: usize,
        next_index: Option<usize>,
        at: DateTime<Utc>,
    },
    MoodSelected {
        mood: Mood,
        at: DateTime<Utc>,
    },
    ReportShown {
        completed_count: usize,
        total_count: usize,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: PlayerState,
        routine_index: usize,
        routine_name: String,
        emoji: String,
        remaining_secs: u64,
        total_secs: u64,
        routine_progress_pct: f64,
        completed_count: usize,
        total_count: usize,
        mood: Option<Mood>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, matches the serde tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "session_started",
            Event::SessionPaused { .. } => "session_paused",
            Event::SessionResumed { .. } => "session_resumed",
            Event::RoutineCompleted { .. } => "routine_completed",
            Event::RoutineSkipped { .. } => "routine_skipped",
            Event::MoodSelected { .. } => "mood_selected",
            Event::ReportShown { .. } => "report_shown",
            Event::SessionReset { .. } => "session_reset",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_tag_matches_kind() {
        let event = Event::SessionReset { at: Utc::now() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.kind());
    }
}
