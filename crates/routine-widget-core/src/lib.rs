//! # Routine Widget Core Library
//!
//! This library provides the core logic behind the routine widgets: a guided
//! routine player, a month calendar fed by Notion, and a Notion-backed profile
//! card. The CLI binary is a thin front end over the same library.
//!
//! ## Architecture
//!
//! - **Routine Engine**: A tick-driven state machine stepping through an ordered
//!   list of routines, ending in a mood rating and a session report
//! - **Player**: Owns the engine and its one-second ticker, and files the
//!   report through a [`RoutineStore`]
//! - **Calendar**: Sunday-first month grid joined with events from an
//!   [`EventSource`]
//! - **Config**: Base64 widget blobs and the TOML application config
//! - **Integrations**: Notion implementations of the store and event source
//!
//! ## Key Components
//!
//! - [`RoutineEngine`]: Core routine state machine
//! - [`RoutinePlayer`]: Engine plus ticker plus persistence guard
//! - [`CalendarView`]: Month navigation and event grouping
//! - [`DayBoundary`]: Which day a moment belongs to
//! - [`AppConfig`]: Application configuration management

pub mod calendar;
pub mod config;
pub mod day_boundary;
pub mod error;
pub mod events;
pub mod integrations;
pub mod routine;

pub use calendar::{CalendarDay, CalendarEvent, CalendarView, MonthCursor};
pub use config::{AppConfig, Theme, WidgetConfig};
pub use day_boundary::DayBoundary;
pub use error::{ConfigError, CoreError, NotionError, PlayerError};
pub use events::Event;
pub use integrations::{EventSource, RoutineStore};
pub use routine::{
    Command, CompletedRoutine, Mood, PlayerState, RoutineDefinition, RoutineEngine, RoutinePlayer,
    RoutineVariant, SessionSummary,
};
