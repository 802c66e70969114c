use chrono::{DateTime, FixedOffset, Utc};
use clap::Args;
use routine_widget_core::AppConfig;

use super::CliResult;

#[derive(Args)]
pub struct TodayArgs {
    /// Moment to resolve, RFC 3339 (defaults to now)
    #[arg(long, value_parser = parse_rfc3339)]
    at: Option<DateTime<FixedOffset>>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

fn parse_rfc3339(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("invalid RFC 3339 timestamp: {e}"))
}

pub fn run(args: TodayArgs) -> CliResult {
    let config = AppConfig::load()?;
    let boundary = config.day_boundary()?;
    let at = args.at.unwrap_or_else(|| Utc::now().fixed_offset());
    let date = boundary.effective_date(&at);

    if args.json {
        let out = serde_json::json!({
            "date": date.to_string(),
            "at": at.to_rfc3339(),
            "utc_offset_minutes": boundary.utc_offset().local_minus_utc() / 60,
            "cutoff_hour": boundary.cutoff_hour(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{date}");
    }
    Ok(())
}
