mod definition;
mod engine;
mod player;
mod report;
mod ticker;

pub use definition::{CompletedRoutine, Mood, RoutineDefinition, FALLBACK_DURATION_MIN};
pub use engine::{Command, PlayerState, RoutineEngine, RoutineSession};
pub use player::{RoutinePlayer, SaveOutcome, MOOD_REVEAL_DELAY};
pub use report::{RoutineVariant, SessionSummary, REPORT_GRID_SLOTS};
pub use ticker::{Ticker, TICK_PERIOD};
