use std::path::PathBuf;

use clap::Subcommand;
use routine_widget_core::WidgetConfig;

use super::CliResult;

#[derive(Subcommand)]
pub enum WidgetAction {
    /// Encode a JSON widget configuration file
    Encode {
        /// JSON file with routines, theme, token and databaseId
        file: PathBuf,
        /// Widget page URL to append the encoded `config` parameter to
        #[arg(long)]
        url: Option<String>,
    },
    /// Decode a `config` parameter and print it as JSON
    Decode {
        /// Base64url blob (padding optional)
        blob: String,
    },
}

pub fn run(action: WidgetAction) -> CliResult {
    match action {
        WidgetAction::Encode { file, url } => {
            let content = std::fs::read_to_string(&file)?;
            let config: WidgetConfig = serde_json::from_str(&content)?;
            let blob = config.encode()?;
            match url {
                Some(url) => println!("{url}?config={blob}"),
                None => println!("{blob}"),
            }
        }
        WidgetAction::Decode { blob } => {
            let config = WidgetConfig::decode(&blob)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
