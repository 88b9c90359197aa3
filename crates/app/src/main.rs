//! LeadDesk - CRM dashboard for the sales desk
//!
//! Terminal front end over the in-memory LeadDesk core: lead table with
//! filters, lead details, and the upcoming schedule.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use leaddesk_core::{
    all_tags, next_available_hour, resolve_event_span, resolve_event_times, unique_sources,
    Error, EventDraft, EventKind, EventPatch, LeadRow, SourceFilter, StatusFilter, TimeOfDay,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod seed;
mod state;
mod views;

use state::AppState;

#[derive(Parser)]
#[command(name = "leaddesk")]
#[command(about = "LeadDesk CRM dashboard", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print views as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the lead table
    Leads {
        /// Case-insensitive search over name, phone, SKU, source, intention, vehicle
        #[arg(long)]
        search: Option<String>,
        /// all, stale or fresh
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Exact source, or "all"
        #[arg(long, default_value = "all")]
        source: String,
        /// Required tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Only leads not updated in more than this many days
        #[arg(long)]
        stale_days: Option<i64>,
        /// Toggle the hot flag on these lead ids first (repeatable)
        #[arg(long = "toggle-hot")]
        toggle_hot: Vec<String>,
    },
    /// List the tags available for filtering
    Tags,
    /// List lead sources
    Sources,
    /// Show upcoming events grouped by day
    Schedule,
    /// Show one lead and its events
    Lead { id: String },
    /// Book an event for a lead, then show the schedule
    Book {
        lead_id: String,
        #[arg(long)]
        title: String,
        /// YYYY-MM-DD (defaults to the next free hour)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// HH:MM (defaults to the next free hour)
        #[arg(long)]
        time: Option<TimeOfDay>,
        /// End date for an explicit end (defaults to the start date)
        #[arg(long, requires = "end_time")]
        end_date: Option<NaiveDate>,
        /// End time; without it the event lasts the configured default
        #[arg(long)]
        end_time: Option<TimeOfDay>,
        #[arg(long, default_value = "other")]
        kind: EventKind,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Move or rename a lead's next upcoming event
    Reschedule {
        lead_id: String,
        #[arg(long)]
        title: Option<String>,
        /// New start date, YYYY-MM-DD (keeps the current date when omitted)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// New start time, HH:MM (keeps the current time when omitted)
        #[arg(long)]
        time: Option<TimeOfDay>,
        #[arg(long)]
        kind: Option<EventKind>,
        /// Replacement notes; an empty value clears them
        #[arg(long)]
        notes: Option<String>,
    },
    /// Cancel a lead's next upcoming event
    Cancel { lead_id: String },
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Cli::parse()) {
        tracing::error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut app = AppState::new(cli.config.as_deref()).context("Failed to initialize LeadDesk")?;
    let now = app.now();

    match cli.command {
        Commands::Leads {
            search,
            status,
            source,
            tags,
            stale_days,
            toggle_hot,
        } => {
            for lead_id in &toggle_hot {
                app.workspace.toggle_hot_tag(lead_id);
            }

            let mut filter = app
                .base_filter()
                .with_status(status)
                .with_source(SourceFilter::from(source.as_str()));
            if let Some(search) = search {
                filter = filter.with_search(search);
            }
            for tag in tags {
                filter = filter.with_tag(tag);
            }
            if let Some(days) = stale_days {
                filter = filter.with_untouched_days(days);
            }

            let rows = app.workspace.lead_rows(&filter, &now);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", views::lead_table(&rows, app.config.stale_threshold_days));
            }
        }
        Commands::Tags => {
            let tags = all_tags(app.workspace.leads());
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tags)?);
            } else {
                print!("{}", views::name_list("Tags", &tags));
            }
        }
        Commands::Sources => {
            let sources = unique_sources(app.workspace.leads());
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&sources)?);
            } else {
                print!("{}", views::name_list("Sources", &sources));
            }
        }
        Commands::Schedule => print_schedule(&app, cli.json)?,
        Commands::Lead { id } => {
            let lead = app
                .workspace
                .find_lead(&id)
                .ok_or_else(|| Error::NotFound(format!("lead {}", id)))?;
            let row = LeadRow::resolve(lead, &now, app.config.stale_threshold_days);
            let events = app.workspace.events_for_lead(&id);
            if cli.json {
                let detail = serde_json::json!({ "lead": row, "events": events });
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print!("{}", views::lead_detail(&row, &events, &app.offset));
            }
        }
        Commands::Book {
            lead_id,
            title,
            date,
            time,
            end_date,
            end_time,
            kind,
            notes,
        } => {
            let lead = app
                .workspace
                .find_lead(&lead_id)
                .ok_or_else(|| Error::NotFound(format!("lead {}", lead_id)))?;

            let default_start = next_available_hour(&now);
            let start_date = date.unwrap_or_else(|| default_start.date_naive());
            let start_time = time.unwrap_or_else(|| TimeOfDay::of(&default_start));
            let times = match end_time {
                Some(end_time) => resolve_event_span(
                    start_date,
                    start_time,
                    end_date.unwrap_or(start_date),
                    end_time,
                    &app.offset,
                )?,
                None => resolve_event_times(
                    start_date,
                    start_time,
                    app.config.default_event_minutes,
                    &app.offset,
                )?,
            };

            let mut draft = EventDraft::new(title, lead, times)
                .with_kind(kind)
                .with_reminder_offset(app.config.reminder_offset_minutes);
            if let Some(notes) = notes {
                draft = draft.with_notes(notes);
            }

            let event = app.workspace.add_event(draft).context("Could not book event")?;
            if !cli.json {
                println!("Booked: {}\n", views::event_line(&event, &app.offset));
            }
            print_schedule(&app, cli.json)?;
        }
        Commands::Reschedule {
            lead_id,
            title,
            date,
            time,
            kind,
            notes,
        } => {
            let event = app
                .next_event_for(&lead_id)
                .ok_or_else(|| Error::NotFound(format!("upcoming event for lead {}", lead_id)))?;

            let mut patch = EventPatch::new();
            if date.is_some() || time.is_some() {
                let local_start = event.start_time.with_timezone(&app.offset);
                let minutes = event.duration().num_minutes();
                patch = patch.times(resolve_event_times(
                    date.unwrap_or_else(|| local_start.date_naive()),
                    time.unwrap_or_else(|| TimeOfDay::of(&local_start)),
                    minutes,
                    &app.offset,
                )?);
            }
            if let Some(title) = title {
                patch = patch.title(title);
            }
            if let Some(kind) = kind {
                patch = patch.kind(kind);
            }
            if let Some(notes) = notes {
                patch = patch.notes(notes);
            }

            app.workspace
                .update_event(event.id, &patch)
                .context("Could not reschedule event")?;
            print_schedule(&app, cli.json)?;
        }
        Commands::Cancel { lead_id } => {
            let event = app
                .next_event_for(&lead_id)
                .ok_or_else(|| Error::NotFound(format!("upcoming event for lead {}", lead_id)))?;
            app.workspace.delete_event(event.id);
            if !cli.json {
                println!("Cancelled: {}\n", views::event_line(&event, &app.offset));
            }
            print_schedule(&app, cli.json)?;
        }
    }

    Ok(())
}

fn print_schedule(app: &AppState, json: bool) -> Result<()> {
    let buckets = app.workspace.upcoming(&app.now());
    if json {
        println!("{}", serde_json::to_string_pretty(&buckets)?);
    } else {
        print!("{}", views::schedule(&buckets, &app.offset));
    }
    Ok(())
}
