//! TOML-based application configuration.
//!
//! Stores:
//! - Notion credentials and database ids
//! - Calendar property names
//! - Day boundary settings
//! - Player preferences (theme, report variant, mood reveal delay)
//!
//! Configuration is stored at `~/.config/routine-widget/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use super::theme::Theme;
use crate::day_boundary::{DayBoundary, DEFAULT_CUTOFF_HOUR, DEFAULT_UTC_OFFSET_SECS};
use crate::error::ConfigError;
use crate::routine::RoutineVariant;

/// Environment variable that overrides the stored Notion token.
pub const TOKEN_ENV: &str = "NOTION_TOKEN";

/// Notion credentials and database ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotionConfig {
    #[serde(default)]
    pub token: String,
    /// Daily pages receiving routine reports.
    #[serde(default)]
    pub routine_database_id: String,
    /// Events shown by the calendar widget.
    #[serde(default)]
    pub calendar_database_id: String,
    /// Pages read by the profile widget.
    #[serde(default)]
    pub profile_database_id: String,
}

/// Property names of the calendar database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_date_property")]
    pub date_property: String,
    #[serde(default = "default_title_property")]
    pub title_property: String,
    /// Checkbox marking important events. Empty disables it.
    #[serde(default = "default_important_property")]
    pub important_property: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayBoundaryConfig {
    /// Minutes east of UTC.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_cutoff_hour")]
    pub cutoff_hour: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub variant: RoutineVariant,
    #[serde(default = "default_mood_reveal_delay_ms")]
    pub mood_reveal_delay_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/routine-widget/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub notion: NotionConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub day_boundary: DayBoundaryConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

// Default functions
fn default_date_property() -> String {
    "Date".into()
}
fn default_title_property() -> String {
    "Name".into()
}
fn default_important_property() -> String {
    "Important".into()
}
fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_SECS / 60
}
fn default_cutoff_hour() -> u32 {
    DEFAULT_CUTOFF_HOUR
}
fn default_mood_reveal_delay_ms() -> u64 {
    300
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            date_property: default_date_property(),
            title_property: default_title_property(),
            important_property: default_important_property(),
        }
    }
}

impl Default for DayBoundaryConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset_minutes(),
            cutoff_hour: default_cutoff_hour(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            variant: RoutineVariant::default(),
            mood_reveal_delay_ms: default_mood_reveal_delay_ms(),
        }
    }
}

impl AppConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<i64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?;
                serde_json::Value::Number(n.into())
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("not a leaf value".into()));
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first use.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or if the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Call [`AppConfig::save`] to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: AppConfig = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.day_boundary()?;
        *self = updated;
        Ok(())
    }

    /// Notion token, preferring the `NOTION_TOKEN` environment variable.
    pub fn notion_token(&self) -> String {
        std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.notion.token.clone())
    }

    pub fn day_boundary(&self) -> Result<DayBoundary, ConfigError> {
        DayBoundary::from_offset_minutes(
            self.day_boundary.utc_offset_minutes,
            self.day_boundary.cutoff_hour,
        )
        .ok_or_else(|| ConfigError::InvalidValue {
            key: "day_boundary.utc_offset_minutes".into(),
            message: format!("{} is not a valid UTC offset", self.day_boundary.utc_offset_minutes),
        })
    }

    pub fn mood_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.player.mood_reveal_delay_ms)
    }
}
