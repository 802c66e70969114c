use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Minutes used when a routine's configured duration is missing or not positive.
pub const FALLBACK_DURATION_MIN: u64 = 1;

/// One routine as configured by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineDefinition {
    #[serde(default)]
    pub name: String,
    /// Configured length in whole seconds, read from the `duration` minutes
    /// field. Zero when the field is absent, null or unreadable.
    #[serde(
        default,
        rename = "duration",
        deserialize_with = "deserialize_minutes",
        serialize_with = "serialize_minutes"
    )]
    pub configured_secs: i64,
    #[serde(default)]
    pub emoji: String,
}

impl RoutineDefinition {
    pub fn new(name: impl Into<String>, duration_min: i64, emoji: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            configured_secs: duration_min.saturating_mul(60),
            emoji: emoji.into(),
        }
    }

    /// Get routine duration in seconds.
    ///
    /// Non-positive configured lengths fall back to one minute.
    pub fn duration_secs(&self) -> u64 {
        u64::try_from(self.configured_secs)
            .ok()
            .filter(|s| *s > 0)
            .unwrap_or(FALLBACK_DURATION_MIN * 60)
    }
}

fn minutes_to_secs(minutes: f64) -> i64 {
    if minutes.is_finite() && minutes > 0.0 {
        // `as` saturates at i64::MAX
        (minutes * 60.0).round() as i64
    } else {
        0
    }
}

/// Accepts integers, floats, numeric strings and null. Anything unreadable
/// becomes zero so one bad entry cannot reject a whole widget configuration.
fn deserialize_minutes<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct MinutesVisitor;

    impl<'de> Visitor<'de> for MinutesVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a duration in minutes")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(if value > 0 { value.saturating_mul(60) } else { 0 })
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(i64::try_from(value).unwrap_or(i64::MAX).saturating_mul(60))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(minutes_to_secs(value))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(value.trim().parse::<f64>().map(minutes_to_secs).unwrap_or(0))
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
            Ok(0)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(0)
        }

        fn visit_some<D2: Deserializer<'de>>(self, deserializer: D2) -> Result<Self::Value, D2::Error> {
            deserializer.deserialize_any(MinutesVisitor)
        }
    }

    deserializer.deserialize_any(MinutesVisitor)
}

/// Whole minutes stay integers; anything else is written as fractional minutes.
fn serialize_minutes<S>(secs: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if secs % 60 == 0 {
        serializer.serialize_i64(secs / 60)
    } else {
        serializer.serialize_f64(*secs as f64 / 60.0)
    }
}

/// A routine that made it into the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedRoutine {
    pub name: String,
    pub emoji: String,
}

impl From<&RoutineDefinition> for CompletedRoutine {
    fn from(def: &RoutineDefinition) -> Self {
        Self {
            name: def.name.clone(),
            emoji: def.emoji.clone(),
        }
    }
}

/// Satisfaction rating picked on the mood screen.
///
/// Serialized the way the widget shows it, e.g. `"4점"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mood(u8);

impl Mood {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(rating: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&rating).then_some(Self(rating))
    }

    pub fn score(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}점", self.0)
    }
}

impl From<Mood> for String {
    fn from(mood: Mood) -> Self {
        mood.to_string()
    }
}

impl TryFrom<String> for Mood {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .trim()
            .trim_end_matches('점')
            .parse::<u8>()
            .ok()
            .and_then(Mood::new)
            .ok_or_else(|| format!("invalid mood rating: {value}"))
    }
}
