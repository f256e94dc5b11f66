mod config;
mod dataset;
mod date;
mod empire;
mod error;
#[cfg(test)]
mod fixtures;
mod geography;
mod location;
mod logging;
mod projector;
mod session;
mod timeline;
mod types;
mod validate;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use config::AtlasConfig;
use error::{AtlasError, Result};
use geography::Geography;
use session::{Session, Startup};

#[derive(Parser)]
#[command(
    name = "event_atlas",
    about = "Validate a historical event table and build its timeline and map payloads"
)]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the input tables
    #[arg(long, global = true, default_value = ".")]
    data: PathBuf,

    /// Event table to use, by file stem
    #[arg(long, global = true, default_value = dataset::DEFAULT_EVENTS)]
    events: String,

    /// Display settings file (default: atlas.json in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the event table and print the report
    Validate,
    /// Print the timeline document
    Timeline,
    /// Print the info panel and map payload of one event
    Show {
        /// Event id, or its title
        event: String,
    },
    /// Print the code → colour map of the period covering a year
    Empires {
        /// Omit for the open-ended last period
        year: Option<i32>,
    },
    /// Walk every event in order, like the slideshow
    Play {
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
    /// List the input tables found in the data directory
    Files,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let ok = run(&cli).unwrap_or_else(|e| {
        tracing::error!("{e}");
        false
    });
    if !ok {
        std::process::exit(1);
    }
}

/// `Ok(false)` when the data failed validation.
fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Command::Validate => run_validate(cli),
        Command::Files => {
            print_json(&dataset::discover(&cli.data))?;
            Ok(true)
        }
        Command::Empires { year } => {
            let inputs = dataset::load(&cli.data, &cli.events)?;
            print_json(&empire::resolve(*year, &inputs.periods))?;
            Ok(true)
        }
        Command::Timeline => with_session(cli, |session| print_json(&session.timeline())),
        Command::Show { event } => with_session(cli, |session| {
            let selection = session.select_query(event)?;
            print_json(&selection)
        }),
        Command::Play { interval_ms } => {
            with_session(cli, |session| play(session, Duration::from_millis(*interval_ms)))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  OUTPUT
// ═══════════════════════════════════════════════════════════════════════

/// Payloads go to stdout; logs go to stderr.
fn print_json<T: serde::Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).map_err(AtlasError::Output)?;
    println!("{json}");
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  VALIDATE MODE
// ═══════════════════════════════════════════════════════════════════════

fn run_validate(cli: &Cli) -> Result<bool> {
    let mut inputs = dataset::load(&cli.data, &cli.events)?;
    let geography = Geography::from_features(&inputs.geography);
    let report = validate::validate_records(&mut inputs.events, &geography);
    print_json(&report)?;
    Ok(report.is_valid)
}

// ═══════════════════════════════════════════════════════════════════════
//  SESSION MODES: timeline, show, play
// ═══════════════════════════════════════════════════════════════════════

/// Load, validate and populate, then hand the session to `f`.
/// A rejected table has its messages printed to stderr.
fn with_session(cli: &Cli, f: impl FnOnce(&mut Session) -> Result<()>) -> Result<bool> {
    let config = AtlasConfig::resolve(cli.config.as_deref(), &cli.data)?;
    let inputs = dataset::load(&cli.data, &cli.events)?;

    match Session::start(inputs, config) {
        Startup::Ready(mut session) => {
            f(&mut session)?;
            Ok(true)
        }
        Startup::Rejected(report) => {
            for message in &report.messages {
                eprintln!("{message}");
            }
            Ok(false)
        }
    }
}

fn play(session: &mut Session, interval: Duration) -> Result<()> {
    if session.population().is_empty() {
        tracing::warn!("no events to play");
        return Ok(());
    }
    tracing::info!(events = session.population().len(), "starting slideshow");

    while let Some(id) = session.next_id(session.selected()) {
        if id > 0 {
            std::thread::sleep(interval);
        }
        let selection = session.select(id)?;
        print_json(&selection)?;
    }
    Ok(())
}
