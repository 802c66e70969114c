use chrono::NaiveDate;
use serde_json::{json, Value};

use super::properties::{heading_3, heading_3_text, paragraph, rich_text};
use super::{require, results, NotionClient, DAY_PROPERTY};
use crate::day_boundary::DayBoundary;
use crate::error::{NotionError, Result};
use crate::integrations::traits::RoutineStore;
use crate::routine::{RoutineVariant, SessionSummary};

/// Blocks written per report: heading, spacer, count line, mood line.
const REPORT_BLOCKS: usize = 4;
const CHILD_PAGE_SIZE: u32 = 100;

/// Files session reports into a daily-page database.
///
/// Each day has one page with a `Date` property. A report replaces the
/// previous report of the same variant on that page.
#[derive(Debug, Clone)]
pub struct NotionRoutineStore {
    client: NotionClient,
    database_id: String,
    boundary: DayBoundary,
}

impl NotionRoutineStore {
    pub fn new(client: NotionClient, database_id: &str, boundary: DayBoundary) -> Result<Self, NotionError> {
        require(database_id, "database id")?;
        Ok(Self {
            client,
            database_id: database_id.to_string(),
            boundary,
        })
    }

    async fn find_day_page(&self, date: NaiveDate) -> Result<String, NotionError> {
        let next = date.succ_opt().unwrap_or(date);
        let query = json!({
            "filter": {
                "and": [
                    { "property": DAY_PROPERTY, "date": { "on_or_after": date.to_string() } },
                    { "property": DAY_PROPERTY, "date": { "before": next.to_string() } }
                ]
            },
            "page_size": 1
        });
        let response = self.client.query_database(&self.database_id, &query).await?;
        results(&response)
            .first()
            .and_then(|page| page["id"].as_str())
            .map(str::to_string)
            .ok_or(NotionError::PageNotFound { date })
    }

    /// Delete the previous report of `variant`: its heading and the blocks after it.
    async fn remove_previous_report(&self, page_id: &str, variant: RoutineVariant) -> Result<(), NotionError> {
        let children = self.client.list_block_children(page_id, CHILD_PAGE_SIZE).await?;
        let blocks = results(&children);
        let marker = variant.report_marker();

        let Some(start) = blocks
            .iter()
            .position(|b| heading_3_text(b).is_some_and(|t| t.contains(marker)))
        else {
            return Ok(());
        };

        for block in blocks.iter().skip(start).take(REPORT_BLOCKS) {
            let Some(id) = block["id"].as_str() else {
                continue;
            };
            if let Err(e) = self.client.delete_block(id).await {
                tracing::warn!(block = id, error = %e, "failed to delete previous report block");
            }
        }
        Ok(())
    }
}

fn report_blocks(summary: &SessionSummary) -> Value {
    json!([
        heading_3(summary.variant.report_title()),
        paragraph(""),
        paragraph(&format!("🎉 총 {}개의 루틴을 완료했어요!", summary.completed_count)),
        paragraph(&format!("💕 오늘의 루틴 만족도 : {}점", summary.mood.score())),
    ])
}

impl RoutineStore for NotionRoutineStore {
    fn name(&self) -> &str {
        "notion"
    }

    async fn save(&self, summary: &SessionSummary) -> Result<()> {
        let date = self.boundary.effective_date(&summary.timestamp);
        let page_id = self.find_day_page(date).await?;
        tracing::debug!(%date, page = %page_id, "found day page");

        if !summary.completed_emojis.is_empty() {
            let mut properties = json!({});
            properties[summary.variant.emoji_property()] = json!({ "rich_text": rich_text(&summary.completed_emojis) });
            self.client.update_page_properties(&page_id, properties).await?;
        }

        self.remove_previous_report(&page_id, summary.variant).await?;
        self.client
            .append_block_children(&page_id, report_blocks(summary))
            .await?;

        tracing::info!(%date, page = %page_id, "report written to day page");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routine::Mood;
    use chrono::Utc;

    fn summary(variant: RoutineVariant) -> SessionSummary {
        SessionSummary {
            completed_count: 3,
            total_count: 4,
            mood: Mood::new(5).unwrap(),
            timestamp: Utc::now(),
            completed_emojis: "🧘💧📖".into(),
            variant,
        }
    }

    #[test]
    fn report_blocks_follow_layout() {
        let blocks = report_blocks(&summary(RoutineVariant::Secondary));
        let blocks = blocks.as_array().unwrap();
        assert_eq!(blocks.len(), REPORT_BLOCKS);
        assert_eq!(blocks[0]["type"], "heading_3");
        assert_eq!(
            blocks[0]["heading_3"]["rich_text"][0]["text"]["content"],
            "🌙 NIGHT ROUTINE REPORT"
        );
        assert_eq!(blocks[1]["paragraph"]["rich_text"][0]["text"]["content"], "");
        assert_eq!(
            blocks[2]["paragraph"]["rich_text"][0]["text"]["content"],
            "🎉 총 3개의 루틴을 완료했어요!"
        );
        assert_eq!(
            blocks[3]["paragraph"]["rich_text"][0]["text"]["content"],
            "💕 오늘의 루틴 만족도 : 5점"
        );
    }

    #[test]
    fn missing_database_id_is_rejected() {
        let client = NotionClient::new("secret").unwrap();
        assert!(matches!(
            NotionRoutineStore::new(client, "", DayBoundary::default()),
            Err(NotionError::MissingCredentials("database id"))
        ));
    }
}
