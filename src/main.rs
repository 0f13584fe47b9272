//! calgrid - Entry Point

use calgrid::config::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
    parse_timezone,
};
use calgrid::host::{Calendar, CommandLog, LayoutBody, MonthRow, RecordSet, ViewLayout};
use calgrid::layout::{SpanContent, TimeLabel};
use calgrid::model::{AppError, Event, InputError, SourceRecord};
use calgrid::views::View;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[allow(missing_docs)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// calgrid - lay out calendar records for a view
#[derive(Parser, Debug)]
#[command(name = "calgrid")]
#[command(version)]
#[command(about = "Lay out calendar records as month rows, day columns or an agenda")]
pub struct Args {
    /// Path to a JSON array of records (reads from stdin if not provided)
    pub records: Option<PathBuf>,

    /// View to lay out (month, week, work-week, day, agenda, year)
    #[arg(short, long)]
    pub view: Option<View>,

    /// Anchor date, YYYY-MM-DD (defaults to today in the calendar time zone)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// IANA time zone the calendar is displayed in
    #[arg(short, long)]
    pub timezone: Option<String>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run(Args::parse())?;
    Ok(())
}

fn run(args: Args) -> Result<(), AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = load_config_with_precedence(args.config.clone())?;
        let merged = merge_config(config_file)?;
        let with_env = apply_env_overrides(merged)?;
        let timezone = args.timezone.as_deref().map(parse_timezone).transpose()?;
        apply_cli_overrides(with_env, args.view, timezone)
    };

    calgrid::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let records = read_records(args.records.as_deref())?;
    info!(records = records.len(), "Records loaded");

    let date = args
        .date
        .unwrap_or_else(|| chrono::Utc::now().with_timezone(&config.timezone).date_naive());
    let view = config.view;

    let mut calendar = Calendar::new(RecordSet::new(records), CommandLog::default(), config);
    let layout = calendar.layout(view, date);

    let output = match args.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&layout).map_err(|e| AppError::Output(e.to_string()))?
        }
        OutputFormat::Text => render_text(&layout),
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output).map_err(|e| AppError::Output(e.to_string()))?;
    Ok(())
}

/// Read a JSON array of records from `path`, or from stdin.
fn read_records(path: Option<&Path>) -> Result<Vec<SourceRecord>, InputError> {
    let text = match path {
        Some(path) => {
            if !path.exists() {
                return Err(InputError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            std::fs::read_to_string(path)?
        }
        None => std::io::read_to_string(std::io::stdin())?,
    };
    parse_records(&text)
}

fn parse_records(text: &str) -> Result<Vec<SourceRecord>, InputError> {
    serde_json::from_str(text).map_err(|e| InputError::InvalidJson(e.to_string()))
}

/// Plain-text rendering for terminals.
fn render_text(layout: &ViewLayout) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", layout.title);
    let events = &layout.events;
    match &layout.body {
        LayoutBody::Rows { rows } => {
            for row in rows {
                render_row(&mut out, row, events, "");
            }
        }
        LayoutBody::TimeGrid(grid) => {
            render_row(&mut out, &grid.header, events, "");
            for column in &grid.columns {
                let _ = writeln!(out, "{}", column.date.format("%a %b %d"));
                for placed in &column.events {
                    let title = title_of(events, placed.event);
                    let _ = writeln!(
                        out,
                        "  {:<24} top {:>5.1}%  height {:>5.1}%  x {:>5.1}%  width {:>5.1}%",
                        title, placed.top, placed.height, placed.x_offset, placed.width
                    );
                }
            }
        }
        LayoutBody::Agenda { days } => {
            for day in days {
                let _ = writeln!(out, "{}", day.date.format("%a %b %d"));
                for item in &day.items {
                    let when = match &item.label {
                        TimeLabel::AllDay => "all day".to_string(),
                        TimeLabel::Range { start, end } => {
                            format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"))
                        }
                        TimeLabel::Starts { start } => format!("{} -", start.format("%H:%M")),
                        TimeLabel::Ends { end } => format!("- {}", end.format("%H:%M")),
                    };
                    let _ = writeln!(out, "  {:<13} {}", when, title_of(events, item.event));
                }
            }
        }
        LayoutBody::Year { months } => {
            for month in months {
                let _ = writeln!(out, "{}", month.month.format("%B"));
                for row in &month.rows {
                    render_row(&mut out, row, events, "  ");
                }
            }
        }
    }
    out
}

fn render_row(out: &mut String, row: &MonthRow, events: &[Event], indent: &str) {
    let Some(first) = row.days.first() else {
        return;
    };
    let _ = writeln!(out, "{}Week of {}", indent, first.format("%b %d"));
    for lane in row.levels.iter().chain(std::iter::once(&row.overflow)) {
        for span in lane {
            match span.content {
                SpanContent::Gap => {}
                SpanContent::Event { segment } => {
                    let _ = writeln!(
                        out,
                        "{}  [{}-{}] {}",
                        indent,
                        segment.left,
                        segment.right,
                        title_of(events, segment.event)
                    );
                }
                SpanContent::ShowMore { slot, count } => {
                    let _ = writeln!(out, "{}  [{}] +{} more", indent, slot, count);
                }
            }
        }
    }
}

fn title_of(events: &[Event], index: usize) -> &str {
    events.get(index).map(|e| e.title.as_str()).unwrap_or("")
}
