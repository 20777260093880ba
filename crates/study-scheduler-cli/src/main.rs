//! `studysched` CLI: run availability queries over busy-time JSON.
//!
//! Busy intervals are a JSON array of `{"start": ..., "end": ...}` objects with
//! RFC 3339 timestamps, read from `--input` or stdin. Every command prints its
//! result as pretty JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Merge overlapping busy intervals
//! studysched merge -i busy.json
//!
//! # Does 10:00-10:30 clash with anything?
//! studysched conflicts -i busy.json --start 2026-03-02T10:00:00Z --end 2026-03-02T10:30:00Z
//!
//! # 50-minute sessions with 10-minute breaks between 08:00 and 18:00
//! studysched slots -i busy.json --from 2026-03-02T08:00:00Z --to 2026-03-02T18:00:00Z \
//!     --duration 50 --break 10
//!
//! # Accept a request or get alternatives, using a policy file
//! studysched plan -i busy.json --config policy.toml \
//!     --start 2026-03-02T10:00:00Z --end 2026-03-02T10:30:00Z
//! ```

mod config;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use study_scheduler::{
    BusyEvent, BusyTimeSet, FreeGap, SchedulingPolicy, SlotQuery, TimeInterval,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "studysched",
    version,
    about = "Study-session availability and scheduling over calendar busy time"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Busy intervals JSON file (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Scheduling policy TOML file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge busy intervals into a sorted, non-overlapping set
    Merge,
    /// Check a candidate interval for conflicts
    Conflicts(IntervalArgs),
    /// List free gaps inside a window
    Gaps(WindowArgs),
    /// List every available slot inside a window
    Slots(SlotArgs),
    /// Find the earliest available slot inside a window
    Next(SlotArgs),
    /// Suggest conflict-free alternatives near a requested interval
    Alternatives {
        #[command(flatten)]
        requested: IntervalArgs,
        /// Maximum number of suggestions (defaults to the policy's max_alternatives)
        #[arg(long)]
        max: Option<usize>,
        /// Search horizon in minutes each way (defaults to the policy's search_horizon_minutes)
        #[arg(long)]
        horizon: Option<i64>,
    },
    /// Accept a requested session, or report conflicts with alternatives
    Plan(IntervalArgs),
}

#[derive(Args)]
struct IntervalArgs {
    /// Start of the requested interval (RFC 3339)
    #[arg(long)]
    start: DateTime<Utc>,
    /// End of the requested interval (RFC 3339)
    #[arg(long)]
    end: DateTime<Utc>,
}

impl IntervalArgs {
    fn interval(&self) -> Result<TimeInterval> {
        TimeInterval::new(self.start, self.end).context("Invalid --start/--end")
    }
}

#[derive(Args)]
struct WindowArgs {
    /// Start of the search window (RFC 3339)
    #[arg(long)]
    from: DateTime<Utc>,
    /// End of the search window (RFC 3339)
    #[arg(long)]
    to: DateTime<Utc>,
}

#[derive(Args)]
struct SlotArgs {
    #[command(flatten)]
    window: WindowArgs,
    /// Session length in minutes
    #[arg(long)]
    duration: i64,
    /// Break to keep between a session and busy time, in minutes
    #[arg(long = "break", default_value_t = 0)]
    break_minutes: i64,
}

impl SlotArgs {
    fn query(&self) -> Result<SlotQuery> {
        SlotQuery::new(
            self.window.from,
            self.window.to,
            self.duration,
            self.break_minutes,
        )
        .context("Invalid slot query")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let policy = config::load_policy(cli.config.as_deref())?;
    let busy = read_busy(cli.input.as_deref())?;
    let json = run(&cli.command, &busy, &policy)?;

    write_output(cli.output.as_deref(), &json)
}

fn run(command: &Commands, busy: &BusyTimeSet, policy: &SchedulingPolicy) -> Result<String> {
    match command {
        Commands::Merge => to_pretty(busy),
        Commands::Conflicts(args) => {
            let candidate = args.interval()?;
            to_pretty(&study_scheduler::check_conflicts(&candidate, busy))
        }
        Commands::Gaps(args) => {
            let window = TimeInterval::new(args.from, args.to).context("Invalid --from/--to")?;
            let gaps: Vec<FreeGap> = study_scheduler::find_gaps(&window, busy).collect();
            to_pretty(&gaps)
        }
        Commands::Slots(args) => {
            let query = args.query()?;
            to_pretty(&study_scheduler::find_available_slots(busy, &query, policy))
        }
        Commands::Next(args) => {
            let query = args.query()?;
            to_pretty(&study_scheduler::find_next_free_slot(busy, &query, policy))
        }
        Commands::Alternatives {
            requested,
            max,
            horizon,
        } => {
            let requested = requested.interval()?;
            let alternatives = study_scheduler::suggest_alternatives(
                &requested,
                busy,
                max.unwrap_or(policy.max_alternatives),
                horizon.unwrap_or(policy.search_horizon_minutes),
                policy,
            );
            to_pretty(&alternatives)
        }
        Commands::Plan(args) => {
            let requested = args.interval()?;
            let plan = study_scheduler::plan_session(&requested, busy, policy)?;
            to_pretty(&plan)
        }
    }
}

/// Logs go to stderr so stdout stays valid JSON. `-v` overrides `RUST_LOG`.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Read and merge busy intervals. Blank input is an empty calendar.
fn read_busy(path: Option<&str>) -> Result<BusyTimeSet> {
    let raw = read_input(path)?;
    if raw.trim().is_empty() {
        return Ok(BusyTimeSet::default());
    }

    let events: Vec<BusyEvent> =
        serde_json::from_str(&raw).context("Failed to parse busy intervals JSON")?;
    Ok(study_scheduler::merge(&events))
}

fn to_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize result")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, format!("{}\n", content))
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
