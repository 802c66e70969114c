use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::properties::{first_file_url, formula_text, number, plain_text};
use super::{require, results, NotionClient, DAY_PROPERTY};
use crate::day_boundary::DayBoundary;
use crate::error::{NotionError, Result};

const RECENT_PAGES: u32 = 10;

pub const DEFAULT_NAME: &str = "Anonymous";
pub const DEFAULT_MAIN_TEXT: &str = "오늘도 좋은 하루!";
pub const DEFAULT_PRAISE: &str = "오늘도 화이팅!";
pub const DEFAULT_SLEEP: &str = "기록하기";

mod prop {
    pub const PROFILE_IMAGE: &str = "profile image";
    pub const SLEEP: &str = "sleep";
    pub const ENERGY: &str = "energy";
    pub const NAME: &str = "name";
    pub const MAIN_TEXT: &str = "main text";
    pub const PRAISE: &str = "칭찬";
}

/// What the profile widget shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetProfile {
    pub profile_image: Option<String>,
    pub sleep: String,
    pub energy: f64,
    pub name: String,
    pub main_text: String,
    /// Absent for databases without a `Date` property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub praise: Option<String>,
}

impl Default for WidgetProfile {
    fn default() -> Self {
        Self {
            profile_image: None,
            sleep: DEFAULT_SLEEP.to_string(),
            energy: 0.0,
            name: DEFAULT_NAME.to_string(),
            main_text: DEFAULT_MAIN_TEXT.to_string(),
            praise: None,
        }
    }
}

/// Fields collected across pages, first found wins.
#[derive(Debug, Default)]
struct Collected {
    profile_image: Option<String>,
    sleep: Option<String>,
    energy: Option<f64>,
    name: Option<String>,
    main_text: Option<String>,
    praise: Option<String>,
}

impl Collected {
    fn daily(&mut self, props: &Value) {
        if self.sleep.is_none() {
            self.sleep = formula_text(&props[prop::SLEEP]);
        }
        if self.energy.is_none() {
            self.energy = number(&props[prop::ENERGY]);
        }
    }

    fn profile(&mut self, props: &Value) {
        if self.profile_image.is_none() {
            self.profile_image = first_file_url(&props[prop::PROFILE_IMAGE]);
        }
        if self.name.is_none() {
            self.name = plain_text(&props[prop::NAME]);
        }
        if self.main_text.is_none() {
            self.main_text = plain_text(&props[prop::MAIN_TEXT]);
        }
        if self.praise.is_none() {
            self.praise = plain_text(&props[prop::PRAISE]);
        }
    }

    fn is_complete(&self) -> bool {
        self.profile_image.is_some()
            && self.sleep.is_some()
            && self.energy.is_some()
            && self.name.is_some()
            && self.main_text.is_some()
            && self.praise.is_some()
    }

    fn finish(self, with_praise: bool) -> WidgetProfile {
        let defaults = WidgetProfile::default();
        WidgetProfile {
            profile_image: self.profile_image,
            sleep: self.sleep.unwrap_or(defaults.sleep),
            energy: self.energy.unwrap_or(defaults.energy),
            name: self.name.unwrap_or(defaults.name),
            main_text: self.main_text.unwrap_or(defaults.main_text),
            praise: with_praise.then(|| self.praise.unwrap_or_else(|| DEFAULT_PRAISE.to_string())),
        }
    }
}

/// Reads the profile widget's data from a daily-page database.
#[derive(Debug, Clone)]
pub struct NotionProfileSource {
    client: NotionClient,
    database_id: String,
    boundary: DayBoundary,
}

impl NotionProfileSource {
    pub fn new(client: NotionClient, database_id: &str, boundary: DayBoundary) -> Result<Self, NotionError> {
        require(database_id, "database id")?;
        Ok(Self {
            client,
            database_id: database_id.to_string(),
            boundary,
        })
    }

    /// Profile as of `now`.
    ///
    /// Sleep and energy prefer the page of the current day; the other fields
    /// come from the most recent pages that have them.
    pub async fn fetch_profile<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<WidgetProfile> {
        let database = self.client.retrieve_database(&self.database_id).await?;
        if database["properties"].get(DAY_PROPERTY).is_none() {
            return self.fetch_latest().await;
        }

        let (today, tomorrow) = self.boundary.day_range(now);
        let today_query = json!({
            "filter": {
                "and": [
                    { "property": DAY_PROPERTY, "date": { "on_or_after": today.to_string() } },
                    { "property": DAY_PROPERTY, "date": { "before": tomorrow.to_string() } }
                ]
            },
            "page_size": 1
        });
        let recent_query = json!({
            "sorts": [{ "property": DAY_PROPERTY, "direction": "descending" }],
            "page_size": RECENT_PAGES
        });

        let today_page = self.client.query_database(&self.database_id, &today_query).await?;
        let recent = self.client.query_database(&self.database_id, &recent_query).await?;

        let mut collected = Collected::default();
        if let Some(page) = results(&today_page).first() {
            collected.daily(&page["properties"]);
        }
        for page in results(&recent) {
            let props = &page["properties"];
            collected.profile(props);
            collected.daily(props);
            if collected.is_complete() {
                break;
            }
        }

        tracing::debug!(%today, "profile loaded");
        Ok(collected.finish(true))
    }

    /// Undated databases: only the most recent page counts.
    async fn fetch_latest(&self) -> Result<WidgetProfile> {
        let response = self
            .client
            .query_database(&self.database_id, &json!({ "page_size": 1 }))
            .await?;
        let mut collected = Collected::default();
        if let Some(page) = results(&response).first() {
            let props = &page["properties"];
            collected.profile(props);
            collected.daily(props);
        }
        Ok(collected.finish(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(name: Option<&str>, sleep: Option<Value>, energy: Option<f64>) -> Value {
        json!({
            "name": { "rich_text": name.map(|n| vec![json!({ "plain_text": n })]).unwrap_or_default() },
            "sleep": { "formula": sleep.unwrap_or(Value::Null) },
            "energy": { "number": energy },
        })
    }

    #[test]
    fn first_non_empty_value_wins() {
        let mut c = Collected::default();
        c.daily(&props(None, Some(json!({ "number": 7 })), None));
        c.profile(&props(None, None, None));
        c.profile(&props(Some("Mina"), None, None));
        c.daily(&props(Some("Old"), Some(json!({ "string": "5H" })), Some(0.0)));
        c.profile(&props(Some("Old"), None, None));

        let profile = c.finish(true);
        assert_eq!(profile.name, "Mina");
        assert_eq!(profile.sleep, "7H");
        assert_eq!(profile.energy, 0.0);
        assert_eq!(profile.main_text, DEFAULT_MAIN_TEXT);
        assert_eq!(profile.praise.as_deref(), Some(DEFAULT_PRAISE));
    }

    #[test]
    fn defaults_without_praise() {
        let profile = Collected::default().finish(false);
        assert_eq!(profile, WidgetProfile::default());
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("praise").is_none());
        assert_eq!(json["mainText"], DEFAULT_MAIN_TEXT);
    }
}
