use chrono::Utc;
use clap::Args;
use routine_widget_core::integrations::notion::{NotionClient, NotionRoutineStore};
use routine_widget_core::routine::{SaveOutcome, REPORT_GRID_SLOTS};
use routine_widget_core::{
    AppConfig, Command, Event, PlayerState, RoutineDefinition, RoutinePlayer, RoutineVariant, Theme,
    WidgetConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::CliResult;

#[derive(Args)]
pub struct PlayArgs {
    /// Base64url widget configuration (routines, theme, token, databaseId)
    #[arg(long)]
    config: Option<String>,
    /// Routine to play, repeatable
    #[arg(long = "routine", value_name = "NAME:MINUTES[:EMOJI]")]
    routines: Vec<String>,
    /// Theme: pink, blue, purple or mono
    #[arg(long)]
    theme: Option<Theme>,
    /// Report variant: morning or night
    #[arg(long)]
    variant: Option<RoutineVariant>,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

const KEYS: &str = "\
keys: g start | p pause/resume | n next | d done | 1-5 mood
      s save | h home | t theme | v morning/night | ? status | q quit";

fn parse_routine(raw: &str) -> Result<RoutineDefinition, String> {
    let mut parts = raw.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(format!("routine needs a name: {raw:?}"));
    }
    let minutes = match parts.next() {
        Some(m) => m
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("bad minutes in {raw:?}: {e}"))?,
        None => 0,
    };
    let emoji = parts.next().unwrap_or_default().trim();
    Ok(RoutineDefinition::new(name, minutes, emoji))
}

/// Routine store from the widget blob's credentials, else from the app config.
fn routine_store(
    widget: Option<&WidgetConfig>,
    config: &AppConfig,
) -> Result<Option<NotionRoutineStore>, Box<dyn std::error::Error>> {
    let (token, database_id) = match widget.filter(|w| w.has_credentials()) {
        Some(w) => (w.token.clone(), w.database_id.clone()),
        None => (config.notion_token(), config.notion.routine_database_id.clone()),
    };
    if token.is_empty() || database_id.is_empty() {
        return Ok(None);
    }
    let store = NotionRoutineStore::new(NotionClient::new(&token)?, &database_id, config.day_boundary()?)?;
    Ok(Some(store))
}

pub async fn run(args: PlayArgs) -> CliResult {
    let config = AppConfig::load_or_default();
    let widget = args.config.as_deref().map(WidgetConfig::decode).transpose()?;

    let mut routines = widget.as_ref().map(|w| w.routines.clone()).unwrap_or_default();
    for raw in &args.routines {
        routines.push(parse_routine(raw)?);
    }
    if routines.is_empty() {
        return Err("no routines configured; pass --config or --routine".into());
    }

    let theme = args
        .theme
        .or(widget.as_ref().map(|w| w.theme))
        .unwrap_or(config.player.theme);
    let store = routine_store(widget.as_ref(), &config)?;

    let mut player = RoutinePlayer::new(routines, theme);
    player.set_variant(args.variant.unwrap_or(config.player.variant));
    let screen = Screen { json: args.json };

    if !screen.json {
        println!("{} routines, theme {}", player.engine().routines().len(), player.theme());
        println!("{KEYS}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = player.wait_tick() => {
                if let Some(event) = player.tick() {
                    screen.event(&player, &event);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let keep_going = handle_key(line.trim(), &mut player, store.as_ref(), &config, &screen).await?;
                if !keep_going {
                    break;
                }
            }
        }
    }

    player.shutdown();
    Ok(())
}

/// Returns `false` to quit.
async fn handle_key(
    key: &str,
    player: &mut RoutinePlayer,
    store: Option<&NotionRoutineStore>,
    config: &AppConfig,
    screen: &Screen,
) -> Result<bool, Box<dyn std::error::Error>> {
    let command = match key {
        "" => return Ok(true),
        "q" => return Ok(false),
        "g" => Some(Command::Start),
        "p" => match player.state() {
            PlayerState::Paused => Some(Command::Resume),
            _ => Some(Command::Pause),
        },
        "n" => Some(Command::Skip),
        "d" => Some(Command::CompleteCurrent),
        "h" => Some(Command::Restart),
        "t" => {
            let theme = player.toggle_theme();
            screen.note(&format!("theme: {theme}"));
            None
        }
        "v" => {
            player.set_variant(player.variant().toggled());
            screen.note(&format!("report: {}", player.variant().report_title()));
            None
        }
        "?" => {
            screen.event(player, &player.engine().snapshot());
            None
        }
        "s" => {
            save(player, store, screen).await;
            None
        }
        mood if mood.len() == 1 && mood.chars().all(|c| c.is_ascii_digit()) => {
            let rating: u8 = mood.parse()?;
            let events = player.rate(rating, config.mood_reveal_delay()).await;
            if events.is_empty() {
                screen.note("mood is picked once, with 1-5, after the last routine");
            }
            for event in &events {
                screen.event(player, event);
            }
            None
        }
        other => {
            screen.note(&format!("unknown key {other:?}"));
            screen.note(KEYS);
            None
        }
    };

    if let Some(command) = command {
        match player.apply(command) {
            Some(event) => screen.event(player, &event),
            None => screen.note(&format!("ignored while {}", player.state())),
        }
    }
    Ok(true)
}

async fn save(player: &mut RoutinePlayer, store: Option<&NotionRoutineStore>, screen: &Screen) {
    let Some(store) = store else {
        screen.note("saving needs a Notion token and routine database id");
        return;
    };
    match player.save(store, Utc::now()).await {
        Ok(SaveOutcome::Saved) => screen.note("saved to Notion"),
        Ok(SaveOutcome::AlreadySaved) => screen.note("already saved"),
        Err(e) => screen.note(&format!("error: {e}")),
    }
}

struct Screen {
    json: bool,
}

impl Screen {
    fn note(&self, message: &str) {
        if self.json {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
    }

    fn event(&self, player: &RoutinePlayer, event: &Event) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to serialize event"),
            }
            return;
        }

        let engine = player.engine();
        match event {
            Event::SessionStarted { routine_name, duration_secs, .. } => {
                println!("▶ {routine_name} ({})", clock(*duration_secs));
            }
            Event::SessionPaused { remaining_secs, .. } => println!("⏸ paused at {}", clock(*remaining_secs)),
            Event::SessionResumed { remaining_secs, .. } => println!("▶ resumed at {}", clock(*remaining_secs)),
            Event::RoutineCompleted { routine_name, emoji, next_index, .. } => {
                println!("✓ {emoji} {routine_name}");
                if next_index.is_some() {
                    self.upcoming(player);
                }
            }
            Event::RoutineSkipped { next_index, .. } => {
                println!("→ skipped");
                if next_index.is_some() {
                    self.upcoming(player);
                }
            }
            Event::MoodSelected { mood, .. } => println!("mood: {mood}"),
            Event::ReportShown { completed_count, total_count, .. } => {
                println!("{}", player.variant().report_title());
                let grid: Vec<&str> = engine
                    .report_grid(REPORT_GRID_SLOTS)
                    .into_iter()
                    .map(|slot| slot.map(|r| r.emoji.as_str()).unwrap_or("·"))
                    .collect();
                println!("{}", grid.join(" "));
                println!("🎉 {completed_count}/{total_count} routines done");
                println!("s to save, h for home");
            }
            Event::SessionReset { .. } => println!("home, g to start again"),
            Event::StateSnapshot {
                state,
                routine_name,
                remaining_secs,
                routine_progress_pct,
                completed_count,
                total_count,
                ..
            } => {
                println!(
                    "{state}: {routine_name} {} ({routine_progress_pct:.0}%), {completed_count}/{total_count} done",
                    clock(*remaining_secs)
                );
            }
        }

        if engine.state() == PlayerState::Mood && engine.mood().is_none() {
            println!("how did it go? 1-5");
        }
    }

    fn upcoming(&self, player: &RoutinePlayer) {
        let engine = player.engine();
        if let Some(routine) = engine.current_routine() {
            println!("▶ {} {} ({})", routine.emoji, routine.name, clock(engine.remaining_secs()));
        }
    }
}

fn clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_routine_arguments() {
        let r = parse_routine("Stretch:5:🧘").unwrap();
        assert_eq!((r.name.as_str(), r.duration_secs(), r.emoji.as_str()), ("Stretch", 300, "🧘"));

        let r = parse_routine("Water").unwrap();
        assert_eq!(r.configured_secs, 0);
        assert_eq!(r.duration_secs(), 60);

        assert!(parse_routine(":3").is_err());
        assert!(parse_routine("Read:ten").is_err());
    }

    #[test]
    fn clock_pads() {
        assert_eq!(clock(65), "01:05");
        assert_eq!(clock(0), "00:00");
    }
}
