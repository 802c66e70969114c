use chrono::Utc;
use clap::Args;
use routine_widget_core::integrations::notion::NotionProfileSource;
use routine_widget_core::AppConfig;

use super::{notion_client, CliResult};

#[derive(Args)]
pub struct ProfileArgs {
    /// Profile database id (defaults to notion.profile_database_id)
    #[arg(long)]
    database: Option<String>,
}

pub async fn run(args: ProfileArgs) -> CliResult {
    let config = AppConfig::load()?;
    let database_id = args
        .database
        .unwrap_or_else(|| config.notion.profile_database_id.clone());

    let source = NotionProfileSource::new(notion_client(&config)?, &database_id, config.day_boundary()?)?;
    let profile = source.fetch_profile(&Utc::now()).await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}
