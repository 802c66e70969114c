//! Core error types for routine-widget-core.
//!
//! Transitions invoked in the wrong state are not errors: the engine returns
//! `None` for them. Everything here is recoverable by user action.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for routine-widget-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Notion API errors
    #[error("Notion error: {0}")]
    Notion(#[from] NotionError),

    /// Player host errors
    #[error("Player error: {0}")]
    Player(#[from] PlayerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The widget configuration blob is not valid base64
    #[error("Failed to decode widget configuration: {0}")]
    DecodeFailed(#[from] base64::DecodeError),

    /// The decoded widget configuration is not valid JSON for the expected shape
    #[error("Failed to parse widget configuration: {0}")]
    ParseFailed(#[from] serde_json::Error),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The home/config directory cannot be used
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(#[source] std::io::Error),
}

/// Errors returned by the Notion collaborators.
#[derive(Error, Debug)]
pub enum NotionError {
    /// Token or database id missing
    #[error("Missing required Notion {0}")]
    MissingCredentials(&'static str),

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status with the Notion error body
    #[error("Notion API error (HTTP {status}): {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// No page exists for the attributed day
    #[error("No page found for {date}; create the day's page in Notion first")]
    PageNotFound { date: chrono::NaiveDate },

    /// The response did not have the expected shape
    #[error("Unexpected Notion response: {0}")]
    UnexpectedResponse(String),

    /// Bad base URL or path
    #[error("Invalid Notion URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors raised by the player host.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlayerError {
    /// Saving is only possible from the report screen
    #[error("Nothing to save: the session has not reached the report")]
    SaveUnavailable,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_not_found_names_the_date() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let err = CoreError::from(NotionError::PageNotFound { date });
        assert!(err.to_string().contains("2024-02-10"));
    }

    #[test]
    fn unknown_key_message() {
        let err = ConfigError::UnknownKey("player.nope".into());
        assert_eq!(err.to_string(), "unknown config key: player.nope");
    }
}
