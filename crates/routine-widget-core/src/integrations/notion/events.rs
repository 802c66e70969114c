use chrono::NaiveDate;
use serde_json::{json, Value};

use super::properties::{checkbox, date_start, plain_text};
use super::{require, results, NotionClient};
use crate::calendar::CalendarEvent;
use crate::config::CalendarConfig;
use crate::error::{NotionError, Result};
use crate::integrations::traits::EventSource;

const QUERY_PAGE_SIZE: u32 = 100;
const UNTITLED: &str = "Untitled";

/// Calendar events from a Notion database.
///
/// Property names come from [`CalendarConfig`]; an empty `important_property`
/// marks every event as not important.
#[derive(Debug, Clone)]
pub struct NotionEventSource {
    client: NotionClient,
    database_id: String,
    properties: CalendarConfig,
}

impl NotionEventSource {
    pub fn new(client: NotionClient, database_id: &str, properties: CalendarConfig) -> Result<Self, NotionError> {
        require(database_id, "database id")?;
        Ok(Self {
            client,
            database_id: database_id.to_string(),
            properties,
        })
    }

    fn query(&self, start: NaiveDate, end: NaiveDate, cursor: Option<&str>) -> Value {
        let date_property = &self.properties.date_property;
        let mut query = json!({
            "filter": {
                "and": [
                    { "property": date_property, "date": { "on_or_after": start.to_string() } },
                    { "property": date_property, "date": { "on_or_before": end.to_string() } }
                ]
            },
            "sorts": [{ "property": date_property, "direction": "ascending" }],
            "page_size": QUERY_PAGE_SIZE
        });
        if let Some(cursor) = cursor {
            query["start_cursor"] = json!(cursor);
        }
        query
    }

    /// `None` for pages without a date.
    fn to_event(&self, page: &Value) -> Option<CalendarEvent> {
        let properties = &page["properties"];
        let date = date_start(&properties[self.properties.date_property.as_str()])?;
        let title = plain_text(&properties[self.properties.title_property.as_str()])
            .unwrap_or_else(|| UNTITLED.to_string());
        let important = &self.properties.important_property;
        let is_important = !important.is_empty() && checkbox(&properties[important.as_str()]);

        Some(CalendarEvent {
            id: page["id"].as_str().unwrap_or_default().to_string(),
            date,
            title,
            is_important,
            page_url: page["url"].as_str().unwrap_or_default().to_string(),
        })
    }
}

impl EventSource for NotionEventSource {
    fn name(&self) -> &str {
        "notion"
    }

    async fn fetch_events(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEvent>> {
        let mut events = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let query = self.query(start, end, cursor.as_deref());
            let response = self.client.query_database(&self.database_id, &query).await?;
            if !response["results"].is_array() {
                return Err(NotionError::UnexpectedResponse("query response has no results".into()).into());
            }
            events.extend(results(&response).iter().filter_map(|page| self.to_event(page)));

            cursor = match (response["has_more"].as_bool(), response["next_cursor"].as_str()) {
                (Some(true), Some(next)) => Some(next.to_string()),
                _ => break,
            };
        }

        tracing::debug!(count = events.len(), %start, %end, "fetched calendar events");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(important: &str) -> NotionEventSource {
        let properties = CalendarConfig {
            important_property: important.to_string(),
            ..CalendarConfig::default()
        };
        NotionEventSource::new(NotionClient::new("secret").unwrap(), "db", properties).unwrap()
    }

    fn page(date: Option<&str>) -> Value {
        json!({
            "id": "page-1",
            "url": "https://www.notion.so/page-1",
            "properties": {
                "Date": { "date": date.map(|d| json!({ "start": d })) },
                "Name": { "title": [{ "plain_text": "Dentist" }] },
                "Important": { "checkbox": true }
            }
        })
    }

    #[test]
    fn maps_page_to_event() {
        let event = source("Important").to_event(&page(Some("2024-02-10T10:00:00.000+09:00"))).unwrap();
        assert_eq!(event.id, "page-1");
        assert_eq!(event.date, "2024-02-10");
        assert_eq!(event.title, "Dentist");
        assert!(event.is_important);
        assert_eq!(event.page_url, "https://www.notion.so/page-1");
    }

    #[test]
    fn undated_pages_are_skipped() {
        assert!(source("Important").to_event(&page(None)).is_none());
    }

    #[test]
    fn importance_needs_a_property_name() {
        let event = source("").to_event(&page(Some("2024-02-10"))).unwrap();
        assert!(!event.is_important);
    }

    #[test]
    fn query_carries_cursor_only_when_paging() {
        let s = source("Important");
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let first = s.query(start, end, None);
        assert!(first.get("start_cursor").is_none());
        assert_eq!(first["filter"]["and"][1]["date"]["on_or_before"], "2024-02-29");
        assert_eq!(s.query(start, end, Some("abc"))["start_cursor"], "abc");
    }
}
