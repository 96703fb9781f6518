//! `tempus` command-line tool.
//!
//! ```text
//! tempus parse "2023-06-19T09:56:34+02:00"
//! tempus --now 2023-06-10T17:46:45Z parse NOW-1h30m
//! tempus unix 1687161394
//! tempus duration 90m
//! tempus range quarter 2023-06-15
//! tempus time-of-day "02:30 Europe/Berlin" --date 2024-03-31
//! ```
//!
//! `--json` prints one JSON object per invocation instead of plain text.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tempus::{
    parse_duration, parse_time, parse_time_of_day_with, AsInstant, CurrentTime, DateTime,
    DateTimeRange, Duration, Layout, Period, UnixTime, Weekday,
};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "tempus", version, about = "Parse times, durations and calendar ranges")]
struct Cli {
    /// Pin "now" for NOW-relative input; accepts anything `parse` accepts
    #[arg(long, env = "TEMPUS_NOW", global = true)]
    now: Option<String>,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a time and print it as RFC 3339 with nanoseconds
    Parse {
        value: String,

        /// Parse with this layout only (rfc3339, rfc3339nano, rfc3339short, date, second, milli, micro, nano)
        #[arg(long)]
        layout: Option<Layout>,
    },

    /// Parse a time or a count of Unix seconds and print Unix seconds
    Unix { value: String },

    /// Parse a duration such as 1h30m or -1.5h
    Duration { text: String },

    /// Print the calendar period containing a time
    Range { period: Period, value: String },

    /// Resolve a wall-clock time onto a calendar date
    TimeOfDay {
        value: String,

        /// Calendar date, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
    },
}

#[derive(Serialize)]
struct TimeOutput {
    time: DateTime,
    unix: i64,
    weekday: Weekday,
}

impl TimeOutput {
    fn new(time: DateTime) -> Self {
        Self {
            time,
            unix: time.unix(),
            weekday: time.weekday(),
        }
    }
}

#[derive(Serialize)]
struct UnixOutput {
    unix: UnixTime,
    time: DateTime,
}

#[derive(Serialize)]
struct DurationOutput {
    duration: Duration,
    nanos: i64,
}

#[derive(Serialize)]
struct RangeOutput {
    period: String,
    #[serde(flatten)]
    range: DateTimeRange,
}

#[derive(Serialize)]
struct TimeOfDayOutput {
    time_of_day: String,
    time: DateTime,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_stderr_init(verbosity(cli.verbose));

    let clock = match &cli.now {
        Some(now) => {
            let now = parse_time(now.as_str())
                .with_context(|| format!("invalid --now value '{now}'"))?;
            tracing::debug!(%now, "clock pinned");
            CurrentTime::fixed(now)
        }
        None => CurrentTime::new(),
    };

    match cli.command {
        Command::Parse { value, layout } => {
            let time = match layout {
                Some(layout) => layout.parse(value.as_str()).map(DateTime::from),
                None => DateTime::parse_with(value.as_str(), &clock),
            }
            .with_context(|| format!("cannot parse '{value}'"))?;
            emit(cli.json, &TimeOutput::new(time), || time.to_string())
        }
        Command::Unix { value } => {
            let unix = UnixTime::parse_with(value.as_str(), &clock)
                .with_context(|| format!("cannot parse '{value}' as a time or unix seconds"))?;
            let output = UnixOutput {
                unix,
                time: DateTime::from(unix.as_instant()),
            };
            emit(cli.json, &output, || unix.unix().to_string())
        }
        Command::Duration { text } => {
            let duration =
                parse_duration(&text).with_context(|| format!("cannot parse duration '{text}'"))?;
            let output = DurationOutput {
                duration,
                nanos: duration.as_nanos(),
            };
            emit(cli.json, &output, || duration.to_string())
        }
        Command::Range { period, value } => {
            let time = DateTime::parse_with(value.as_str(), &clock)
                .with_context(|| format!("cannot parse '{value}'"))?;
            let range = DateTimeRange::period(period, &time);
            let output = RangeOutput {
                period: period.to_string(),
                range,
            };
            emit(cli.json, &output, || format!("{}\n{}", range.from, range.until))
        }
        Command::TimeOfDay { value, date } => {
            let time_of_day = parse_time_of_day_with(value.as_str(), &clock)
                .with_context(|| format!("cannot parse time of day '{value}'"))?;
            let time = time_of_day
                .date(date.year(), date.month(), date.day())
                .with_context(|| format!("cannot place '{time_of_day}' on {date}"))?;
            let output = TimeOfDayOutput {
                time_of_day: time_of_day.to_string(),
                time,
            };
            emit(cli.json, &output, || time.to_string())
        }
    }
}

fn emit<T: Serialize>(json: bool, output: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(output).context("cannot encode output")?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn verbosity(count: u8) -> LevelFilter {
    match count {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn tracing_stderr_init(filter: LevelFilter) {
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("Logging initialized");
}
