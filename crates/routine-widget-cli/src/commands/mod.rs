pub mod calendar;
pub mod config;
pub mod play;
pub mod profile;
pub mod today;
pub mod widget;

use routine_widget_core::integrations::notion::NotionClient;
use routine_widget_core::AppConfig;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Notion client from the stored token or `NOTION_TOKEN`.
pub fn notion_client(config: &AppConfig) -> Result<NotionClient, Box<dyn std::error::Error>> {
    Ok(NotionClient::new(&config.notion_token())?)
}
