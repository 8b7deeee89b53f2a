//! Crewrota CLI - duty reports and roster listings from the command line.
//!
//! Stands in for the messaging/UI layer: it loads the configuration and
//! the persisted roster, asks the engine who is on duty, and prints the
//! answer. The current date and time are read here, at the outermost edge,
//! and injected into the engine.

use std::io;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crewrota_core::{
    parse_date, DutyComposer, RosterConfig, RosterStore, RotationResolver,
};

/// Roster snapshot file name inside the data directory
const ROSTER_FILE: &str = "roster.json";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: crewrota [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --date YYYY-MM-DD   report for a specific date (default: today)");
    eprintln!("  --time HH:MM        clock time for the report (default: now)");
    eprintln!("  --roster            print the full roster instead of the duty report");
    eprintln!("  --member ID         print the squads a member sits in");
    eprintln!("  --help              show this help");
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("crewrota starting");

    let now = Local::now();
    let mut date = now.date_naive();
    let mut time = now.time();
    let mut show_roster = false;
    let mut member_id: Option<i64> = None;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--date" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--date requires a value"))?;
                date = parse_date(value)?;
            }
            "--time" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--time requires a value"))?;
                time = NaiveTime::parse_from_str(value, "%H:%M")
                    .map_err(|_| anyhow::anyhow!("Invalid time: {}", value))?;
            }
            "--roster" => show_roster = true,
            "--member" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--member requires a value"))?;
                member_id = Some(value.parse()?);
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                std::process::exit(2);
            }
        }
    }

    let config = RosterConfig::load()?;
    let (store, registry, calendar) = config.bootstrap()?;

    // A persisted roster snapshot takes precedence over the bare config
    // seed: it carries members and memberships too.
    let snapshot = RosterConfig::data_dir()?.join(ROSTER_FILE);
    let store = if snapshot.exists() {
        RosterStore::load_from(&snapshot)?
    } else {
        store
    };

    if show_roster {
        print_roster(&store);
        return Ok(());
    }

    if let Some(id) = member_id {
        let member = store.member(id)?;
        println!("{} ({}, {})", member.display_name(), member.rank, member.driver_class);
        for (squad_type, squad) in store.squads_of_member(id)? {
            println!("  {} / {}", squad_type, squad.name);
        }
        return Ok(());
    }

    let resolver = RotationResolver::new(&store, &registry);
    let composer = DutyComposer::new(resolver, &calendar, &config.policy);

    print_report(&store, &composer, date, time)?;
    Ok(())
}

fn print_report(
    store: &RosterStore,
    composer: &DutyComposer<'_>,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<()> {
    println!("Duty report for {} ({})", date, date.format("%A"));
    let report = composer.duty_report(date, time)?;
    if report.is_empty() {
        println!("  No duty scheduled.");
        return Ok(());
    }
    for entry in report {
        println!("  {}: squad {}", entry.label, entry.squad.name);
        for member in store.members_of(&entry.squad_type, &entry.squad.name)? {
            println!(
                "    - {} ({}, {})",
                member.display_name(),
                member.rank,
                member.driver_class
            );
        }
    }
    Ok(())
}

fn print_roster(store: &RosterStore) {
    for squad_type in store.squad_types() {
        println!("{} ({})", squad_type.name, squad_type.description);
        for squad in store.squads_of(&squad_type.name) {
            println!("  [{}] {}", squad.ordinal, squad.name);
            match store.members_of(&squad_type.name, &squad.name) {
                Ok(members) if members.is_empty() => println!("      (no members)"),
                Ok(members) => {
                    for member in members {
                        println!(
                            "      {} ({}, {})",
                            member.display_name(),
                            member.rank,
                            member.driver_class
                        );
                    }
                }
                Err(e) => eprintln!("      error: {}", e),
            }
        }
    }
}
