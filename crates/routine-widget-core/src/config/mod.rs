mod app;
mod theme;
mod widget;

pub use app::{AppConfig, CalendarConfig, DayBoundaryConfig, NotionConfig, PlayerConfig, TOKEN_ENV};
pub use theme::{Palette, Theme};
pub use widget::WidgetConfig;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/routine-widget[-dev]/` based on ROUTINE_WIDGET_ENV.
///
/// Set ROUTINE_WIDGET_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ROUTINE_WIDGET_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("routine-widget-dev")
    } else {
        base_dir.join("routine-widget")
    };

    std::fs::create_dir_all(&dir).map_err(ConfigError::DirUnavailable)?;
    Ok(dir)
}
