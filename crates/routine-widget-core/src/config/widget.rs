//! Widget launch configuration.
//!
//! The widget is opened with a `config` parameter holding base64url-encoded
//! JSON. Padding is optional and the standard alphabet is accepted too.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::theme::Theme;
use crate::error::ConfigError;
use crate::routine::RoutineDefinition;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default)]
    pub routines: Vec<RoutineDefinition>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub database_id: String,
}

impl WidgetConfig {
    /// Decode a `config` parameter.
    pub fn decode(encoded: &str) -> Result<Self, ConfigError> {
        let normalized: String = encoded
            .trim()
            .trim_end_matches('=')
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                other => other,
            })
            .collect();
        let bytes = URL_SAFE_NO_PAD.decode(normalized.as_bytes())?;
        let config = serde_json::from_slice(&bytes)?;
        Ok(config)
    }

    /// Encode as an unpadded base64url `config` parameter.
    pub fn encode(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Whether a session can be started from this configuration.
    pub fn is_playable(&self) -> bool {
        !self.routines.is_empty()
    }

    pub fn has_credentials(&self) -> bool {
        !self.token.is_empty() && !self.database_id.is_empty()
    }
}
