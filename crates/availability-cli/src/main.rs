//! `availability` CLI — inspect schedule definitions and the slots they
//! resolve to, without touching any store.
//!
//! ## Usage
//!
//! ```sh
//! # Show the effective day plans for a week
//! availability plan -s schedule.json --from 2026-03-02 --to 2026-03-08
//!
//! # Resolve concrete 30-minute UTC slots
//! availability resolve -s schedule.json --from 2026-03-02 --to 2026-03-08 --duration 30
//!
//! # Same, as JSON (reads the schedule from stdin if -s is omitted)
//! cat schedule.json | availability resolve --from 2026-03-02 --to 2026-03-08 --duration 30 --json
//! ```

use anyhow::{Context, Result};
use availability_engine::{
    resolve_day, resolve_range, DateRange, DstPolicy, LocalTimeConverter, Schedule,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::Read;

/// Hard ceiling mirroring the regeneration default; the CLI has no config.
const MAX_RANGE_DAYS: i64 = 366;

#[derive(Parser)]
#[command(
    name = "availability",
    version,
    about = "Inspect schedules and the availability slots they resolve to"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective day plan for each date in the range
    Plan {
        /// Schedule definition JSON (reads from stdin if omitted)
        #[arg(short, long)]
        schedule: Option<String>,
        /// First date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },
    /// Resolve the range into concrete UTC candidate slots
    Resolve {
        /// Schedule definition JSON (reads from stdin if omitted)
        #[arg(short, long)]
        schedule: Option<String>,
        /// First date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
        /// Slot duration in minutes
        #[arg(short, long)]
        duration: u32,
        /// Emit JSON instead of one line per slot
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { schedule, from, to } => {
            let schedule = load_schedule(schedule.as_deref())?;
            let range = DateRange::new(from, to);
            range.validate(MAX_RANGE_DAYS)?;
            for date in range.iter() {
                let plan = resolve_day(&schedule, date);
                match plan.working {
                    Some(window) => {
                        let breaks: Vec<String> = plan
                            .breaks
                            .iter()
                            .map(|b| format!("{}-{}", b.start(), b.end()))
                            .collect();
                        if breaks.is_empty() {
                            println!("{date}  {}-{}", window.start(), window.end());
                        } else {
                            println!(
                                "{date}  {}-{}  breaks: {}",
                                window.start(),
                                window.end(),
                                breaks.join(", ")
                            );
                        }
                    }
                    None => println!("{date}  off"),
                }
            }
        }
        Commands::Resolve {
            schedule,
            from,
            to,
            duration,
            json,
        } => {
            let schedule = load_schedule(schedule.as_deref())?;
            let converter = LocalTimeConverter::new(&schedule.timezone, DstPolicy::Skip)
                .with_context(|| format!("schedule '{}'", schedule.name))?;
            let range = DateRange::new(from, to);
            let slots = resolve_range(&schedule, &converter, range, duration, MAX_RANGE_DAYS)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                for slot in &slots {
                    println!("{}  {}", slot.start.to_rfc3339(), slot.end.to_rfc3339());
                }
                eprintln!("{} slots", slots.len());
            }
        }
    }

    Ok(())
}

/// Load and validate the schedule from a file, or stdin when no path is given.
fn load_schedule(path: Option<&str>) -> Result<Schedule> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read schedule file '{path}'"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read schedule from stdin")?;
            buf
        }
    };
    let schedule: Schedule =
        serde_json::from_str(&raw).context("schedule JSON did not parse")?;
    schedule
        .validate()
        .context("schedule violates a structural invariant")?;
    Ok(schedule)
}
