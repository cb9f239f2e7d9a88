//! `slots` CLI — check trainer availability and booking rules from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Bookable slots for trainer T1 on a date (studio data on stdin)
//! cat studio.json | slots --config studio-config.json available --trainer T1 \
//!     --date 2024-06-10 --service pilates
//!
//! # Only the afternoon, holiday timetable, JSON output
//! slots -c studio-config.json available -d studio.json --trainer T1 --date 2024-12-27 \
//!     --service pilates --season holiday --range 13:00-18:00 --json
//!
//! # Validate a single booking the way the booking form does
//! slots -c studio-config.json check -d studio.json --trainer T1 --date 2024-06-10 \
//!     --time 11:30 --service pilates --member m42
//!
//! # Weekly grid for the week containing a date
//! slots -c studio-config.json week -d studio.json --trainer T1 --date 2024-06-12
//!
//! # Normalize a time string
//! slots normalize 14:30:00
//! ```
//!
//! The config path may also come from `SLOTS_CONFIG`. Logging goes to stderr;
//! raise it with `-v` or `RUST_LOG`.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{ArgAction, Parser, Subcommand};
use slot_engine::booking::{validate_booking, BookingContext, BookingDraft};
use slot_engine::calendar::{week_grid, DayColumn};
use slot_engine::window::{is_closed_day, WindowRejection};
use slot_engine::{
    available_slots, AppointmentScan, AvailabilityRequest, SchedulingConfig, Season, SlotIndex,
    SlotTime, StudioSnapshot, TimeRange,
};
use tracing_subscriber::EnvFilter;

/// Exit status for `check` when the booking would be rejected.
const EXIT_REJECTED: i32 = 2;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Fitness-studio slot availability and booking checks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Scheduling config JSON (slot lists, opening hours, capacity)
    #[arg(short, long, global = true, env = "SLOTS_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookable slots for a trainer, date and service
    Available {
        /// Studio data JSON (reads from stdin if omitted)
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(long)]
        trainer: String,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// Service (package) id being booked
        #[arg(long)]
        service: String,
        /// Timetable to use: normal or holiday
        #[arg(long, default_value = "normal")]
        season: Season,
        /// Only slots in HH:MM-HH:MM (end exclusive); HH:MM- for open-ended
        #[arg(long)]
        range: Option<TimeRange>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Validate one booking; exits with status 2 if it would be rejected
    Check {
        /// Studio data JSON (reads from stdin if omitted)
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(long)]
        trainer: String,
        #[arg(long)]
        date: NaiveDate,
        /// Start time as HH:MM or HH:MM:SS
        #[arg(long)]
        time: SlotTime,
        #[arg(long)]
        service: String,
        #[arg(long, default_value = "walk-in")]
        member: String,
        #[arg(long)]
        json: bool,
    },
    /// Show the week grid for the week containing a date
    Week {
        /// Studio data JSON (reads from stdin if omitted)
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(long)]
        trainer: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, default_value = "normal")]
        season: Season,
        #[arg(long)]
        json: bool,
    },
    /// Normalize HH:MM or HH:MM:SS to HH:MM
    Normalize { time: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Normalize { time } => {
            println!("{}", slot_engine::normalize_time(&time)?);
        }
        Commands::Available {
            data,
            trainer,
            date,
            service,
            season,
            range,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let studio = load_studio(data.as_deref())?;
            let catalog = studio.catalog();
            let candidate = catalog
                .get(&service)
                .with_context(|| format!("Unknown service: {}", service))?;

            let request = AvailabilityRequest {
                trainer_id: &trainer,
                date,
                candidate,
                season,
                range: range.unwrap_or_default(),
            };
            let slots = available_slots(
                &AppointmentScan::new(&studio.appointments, &catalog),
                &config,
                &request,
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                if is_closed_day(date, &config.business_hours) {
                    let closed = WindowRejection::ClosedDay {
                        weekday: date.weekday(),
                    };
                    println!("Note: {}", closed);
                }
                if slots.is_empty() {
                    println!("No available slots for {} on {}", trainer, date);
                } else {
                    println!("Available slots for {} on {} ({}):", trainer, date, candidate.name);
                    for slot in &slots {
                        println!("  {}  {}", slot.time, places(slot.remaining));
                    }
                }
            }
        }
        Commands::Check {
            data,
            trainer,
            date,
            time,
            service,
            member,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let studio = load_studio(data.as_deref())?;
            let catalog = studio.catalog();
            let ctx = BookingContext {
                appointments: &studio.appointments,
                catalog: &catalog,
                trainers: &studio.trainers,
                config: &config,
            };
            let draft = BookingDraft {
                member_id: member,
                trainer_id: trainer,
                service_id: service,
                date,
                time,
            };
            let messages = validate_booking(&draft, &ctx).messages();

            if json {
                println!("{}", serde_json::to_string_pretty(&messages)?);
            } else if messages.submittable {
                let left = messages.remaining.map(places).unwrap_or_default();
                println!("Bookable: {} {} at {} ({})", draft.trainer_id, draft.date, draft.time, left);
            } else {
                for (field, message) in [
                    ("date", &messages.date),
                    ("time", &messages.time),
                    ("trainer", &messages.trainer),
                    ("service", &messages.service),
                ] {
                    if let Some(message) = message {
                        println!("{}: {}", field, message);
                    }
                }
            }

            if !messages.submittable {
                process::exit(EXIT_REJECTED);
            }
        }
        Commands::Week {
            data,
            trainer,
            date,
            season,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let studio = load_studio(data.as_deref())?;
            let catalog = studio.catalog();
            let index = SlotIndex::build(&studio.appointments, &catalog);
            let week = week_grid(&index, &trainer, date, season, &config);

            if json {
                println!("{}", serde_json::to_string_pretty(&week)?);
            } else {
                print!("{}", render_week(&week));
            }
        }
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn places(n: u32) -> String {
    match n {
        1 => "1 place left".to_string(),
        n => format!("{} places left", n),
    }
}

/// One row per slot time, one column per day. Cells show places left,
/// `VIP` for a reserved slot, `full`, or `-` when the studio is closed.
fn render_week(week: &[DayColumn]) -> String {
    let mut out = String::from("      ");
    for day in week {
        out.push_str(&format!(" {:<9}", day.date.format("%a %d")));
    }
    out.push('\n');

    let rows = week.first().map_or(0, |d| d.cells.len());
    for row in 0..rows {
        out.push_str(&format!("{} ", week[0].cells[row].time));
        for day in week {
            let cell = &day.cells[row];
            let text = if day.closed || (!cell.open && !cell.vip_blocked && cell.remaining > 0) {
                "-".to_string()
            } else if cell.vip_blocked {
                "VIP".to_string()
            } else if cell.remaining == 0 {
                "full".to_string()
            } else {
                cell.remaining.to_string()
            };
            out.push_str(&format!(" {:<9}", text));
        }
        out.push('\n');
    }
    out
}

fn load_config(path: Option<&Path>) -> Result<SchedulingConfig> {
    let Some(path) = path else {
        bail!("A scheduling config is required: pass --config or set SLOTS_CONFIG");
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = SchedulingConfig::from_json_str(&json)
        .with_context(|| format!("Invalid config: {}", path.display()))?;
    tracing::info!(path = %path.display(), capacity = ?config.capacity, "loaded scheduling config");
    Ok(config)
}

fn load_studio(path: Option<&Path>) -> Result<StudioSnapshot> {
    let json = read_input(path)?;
    let studio = StudioSnapshot::from_json_str(&json).context("Failed to parse studio data")?;
    tracing::info!(
        appointments = studio.appointments.len(),
        services = studio.services.len(),
        trainers = studio.trainers.len(),
        "loaded studio data"
    );
    Ok(studio)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
