use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "routine-widget", version, about = "Routine, calendar and profile widgets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play through a routine session interactively
    Play(commands::play::PlayArgs),
    /// Show a month calendar with Notion events
    Calendar(commands::calendar::CalendarArgs),
    /// Print the day a moment belongs to
    Today(commands::today::TodayArgs),
    /// Fetch the profile card from Notion
    Profile(commands::profile::ProfileArgs),
    /// Encode or decode widget configuration blobs
    Widget {
        #[command(subcommand)]
        action: commands::widget::WidgetAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Play(args) => commands::play::run(args).await,
        Commands::Calendar(args) => commands::calendar::run(args).await,
        Commands::Today(args) => commands::today::run(args),
        Commands::Profile(args) => commands::profile::run(args).await,
        Commands::Widget { action } => commands::widget::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
