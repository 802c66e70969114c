use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use routine_widget_core::calendar::{preview_events, weekday_names, CalendarCell, DAYS_PER_WEEK};
use routine_widget_core::integrations::notion::NotionEventSource;
use routine_widget_core::{AppConfig, CalendarView, MonthCursor};
use serde_json::json;

use super::{notion_client, CliResult};

#[derive(Args)]
pub struct CalendarArgs {
    /// Year to show (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,
    /// Month to show, 1-12 (defaults to the current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
    /// Use sample events instead of Notion
    #[arg(long)]
    preview: bool,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: CalendarArgs) -> CliResult {
    let today = Local::now().date_naive();
    let current = MonthCursor::containing(today);
    let cursor = MonthCursor::new(
        args.year.unwrap_or(current.year),
        args.month.map(|m| m - 1).unwrap_or(current.month),
    )
    .ok_or("month out of range")?;

    let mut view = CalendarView::new(cursor);
    if args.preview {
        let anchor = if cursor == current {
            today
        } else {
            cursor.first_day().unwrap_or(today)
        };
        view.apply_fetch::<String>(Ok(preview_events(anchor)));
    } else {
        let config = AppConfig::load()?;
        let source = NotionEventSource::new(
            notion_client(&config)?,
            &config.notion.calendar_database_id,
            config.calendar.clone(),
        )?;
        view.refresh(&source).await;
    }

    let cells = view.cells(today);
    if args.json {
        print_json(&view, &cells)?;
    } else {
        print_grid(&view, &cells, today);
    }
    Ok(())
}

fn print_json(view: &CalendarView, cells: &[CalendarCell<'_>]) -> CliResult {
    let cursor = view.cursor();
    let days: Vec<_> = cells
        .iter()
        .map(|cell| -> Result<serde_json::Value, serde_json::Error> {
            let mut day = serde_json::to_value(&cell.day)?;
            day["events"] = serde_json::to_value(cell.events)?;
            Ok(day)
        })
        .collect::<Result<_, _>>()?;

    let out = json!({
        "year": cursor.year,
        "month": cursor.month + 1,
        "label": cursor.label(),
        "error": view.error(),
        "days": days,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// `[d]` is today and `(d)` lies outside the month. `*` marks events, `!` an important one.
fn print_grid(view: &CalendarView, cells: &[CalendarCell<'_>], today: NaiveDate) {
    println!("{}", view.cursor().label());
    let header: Vec<String> = weekday_names(true).iter().map(|d| format!("{d:>5}")).collect();
    println!("{}", header.join(""));

    for week in cells.chunks(DAYS_PER_WEEK) {
        let row: Vec<String> = week.iter().map(cell_label).collect();
        println!("{}", row.join(""));
    }

    if let Some(error) = view.error() {
        println!();
        println!("{error}");
        return;
    }

    let listed: Vec<_> = cells
        .iter()
        .filter(|c| c.day.is_current_month && !c.events.is_empty())
        .collect();
    if listed.is_empty() {
        return;
    }
    println!();
    for cell in listed {
        let marker = if cell.day.date == today { " (today)" } else { "" };
        println!("{}{marker}", cell.day.date_string);
        for event in cell.events {
            let star = if event.is_important { "!" } else { " " };
            println!("  {star} {}", event.title);
        }
    }
}

fn cell_label(cell: &CalendarCell<'_>) -> String {
    let day = cell.day.date.day();
    let mark = if cell.has_important() {
        "!"
    } else if !cell.events.is_empty() {
        "*"
    } else {
        " "
    };
    let text = if cell.day.is_today {
        format!("[{day}]")
    } else if cell.day.is_current_month {
        format!("{day}")
    } else {
        format!("({day})")
    };
    format!("{text:>4}{mark}")
}
