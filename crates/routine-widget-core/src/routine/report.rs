//! Session report: what gets shown on the report screen and handed to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::definition::{CompletedRoutine, Mood};
use super::engine::{PlayerState, RoutineEngine};

/// Number of slots on the report's item grid.
pub const REPORT_GRID_SLOTS: usize = 6;

/// Which of the two daily routine slots a report is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineVariant {
    /// Morning routine.
    #[default]
    Primary,
    /// Night routine.
    Secondary,
}

impl RoutineVariant {
    pub fn toggled(self) -> Self {
        match self {
            RoutineVariant::Primary => RoutineVariant::Secondary,
            RoutineVariant::Secondary => RoutineVariant::Primary,
        }
    }

    /// Page property receiving the completed emojis.
    pub fn emoji_property(self) -> &'static str {
        match self {
            RoutineVariant::Primary => "ROUTINE",
            RoutineVariant::Secondary => "ROUTINE (2)",
        }
    }

    /// Text identifying this variant's report heading.
    pub fn report_marker(self) -> &'static str {
        match self {
            RoutineVariant::Primary => "MORNING ROUTINE REPORT",
            RoutineVariant::Secondary => "NIGHT ROUTINE REPORT",
        }
    }

    pub fn report_title(self) -> &'static str {
        match self {
            RoutineVariant::Primary => "☀️ MORNING ROUTINE REPORT",
            RoutineVariant::Secondary => "🌙 NIGHT ROUTINE REPORT",
        }
    }
}

impl std::str::FromStr for RoutineVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "morning" => Ok(RoutineVariant::Primary),
            "secondary" | "night" => Ok(RoutineVariant::Secondary),
            other => Err(format!("unknown routine variant: {other}")),
        }
    }
}

/// What a finished session persists.
///
/// `total_count` covers every configured routine, skipped ones included;
/// `completed_count` covers only the routines marked done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub completed_count: usize,
    pub total_count: usize,
    pub mood: Mood,
    pub timestamp: DateTime<Utc>,
    /// Emojis of completed routines joined by single spaces.
    pub completed_emojis: String,
    pub variant: RoutineVariant,
}

impl RoutineEngine {
    /// Summary of the finished session. Only available on the report screen.
    pub fn summary(&self, variant: RoutineVariant, at: DateTime<Utc>) -> Option<SessionSummary> {
        if self.state() != PlayerState::Report {
            return None;
        }
        let session = self.session()?;
        Some(SessionSummary {
            completed_count: session.completed_count(),
            total_count: self.routines().len(),
            mood: session.mood()?,
            timestamp: at,
            completed_emojis: join_emojis(session.completed_routines()),
            variant,
        })
    }

    /// Completed routines followed by empty slots, at least `slots` long.
    pub fn report_grid(&self, slots: usize) -> Vec<Option<&CompletedRoutine>> {
        let completed = self.completed_routines();
        let empty = slots.saturating_sub(completed.len());
        completed
            .iter()
            .map(Some)
            .chain(std::iter::repeat(None).take(empty))
            .collect()
    }
}

fn join_emojis(routines: &[CompletedRoutine]) -> String {
    routines
        .iter()
        .map(|r| r.emoji.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
