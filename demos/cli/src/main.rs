use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use clinic_core::{
    open_slots, partition_bookings, search_directory, Booking, DirectoryConfig, DirectorySource,
    GeoPoint, RecordKind,
};
use clinic_json::{parse_directory_str, Directory};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "clinic-cli",
    about = "Query a clinic directory snapshot: nearby pharmacies and doctors, open slots, agenda."
)]
struct Args {
    /// Path to the directory JSON snapshot.
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Optional JSON file overriding the default settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter the directory and rank it by distance.
    Search {
        /// Free-text query on name and city (or specialty for doctors).
        #[arg(short, long, default_value = "")]
        query: String,
        /// Reference latitude in degrees.
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Reference longitude in degrees.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        /// Restrict to one kind of record.
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// List the open slots of a provider on a date.
    Slots {
        /// Provider identifier.
        #[arg(long)]
        provider: String,
        /// Date as YYYY-MM-DD.
        #[arg(long)]
        date: NaiveDate,
    },
    /// Show upcoming, past and cancelled appointments.
    Agenda {
        /// Reference day, defaults to today.
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Only show this provider's appointments.
        #[arg(long)]
        provider: Option<String>,
    },
    /// List the days offered by the booking form.
    Dates {
        /// First day, defaults to today.
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Pharmacy,
    Doctor,
    Facility,
}

impl From<KindArg> for RecordKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Pharmacy => RecordKind::Pharmacy,
            KindArg::Doctor => RecordKind::Doctor,
            KindArg::Facility => RecordKind::Facility,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clinic=info,clinic_json=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Search {
            query,
            lat,
            lng,
            kind,
        } => {
            let directory = load_directory(args.input.as_deref())?;
            let reference = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
                _ => None,
            };
            if reference.is_some_and(|point| !point.is_valid()) {
                bail!("Reference point is outside valid latitude/longitude ranges");
            }

            let ranked =
                search_directory(directory.records(), &query, reference, kind.map(Into::into));
            tracing::info!(matches = ranked.len(), "directory search done");

            if ranked.is_empty() {
                println!("No matching records.");
            }
            for row in ranked {
                let place = row.record.city.as_deref().unwrap_or("-");
                match row.distance_label(config.distance_decimals) {
                    Some(distance) => println!(
                        "{:>10}  {:?} {}: {} ({place})",
                        distance, row.record.kind, row.record.id, row.record.name
                    ),
                    None => println!(
                        "{:?} {}: {} ({place})",
                        row.record.kind, row.record.id, row.record.name
                    ),
                }
            }
        }
        Command::Slots { provider, date } => {
            let directory = load_directory(args.input.as_deref())?;
            let slots = open_slots(&directory, &provider, date);
            let weekday = config.weekday_locale.name(date.weekday());

            if slots.is_empty() {
                println!("No open slot for provider {provider} on {weekday} {date}.");
            } else {
                println!("{weekday} {date}: {}", slots.join(", "));
            }
        }
        Command::Agenda { today, provider } => {
            let directory = load_directory(args.input.as_deref())?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let buckets = partition_bookings(directory.bookings(), today, provider.as_deref());

            print_bucket("Upcoming", &buckets.upcoming);
            print_bucket("Past", &buckets.past);
            print_bucket("Cancelled", &buckets.cancelled);
        }
        Command::Dates { today } => {
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            for date in clinic_core::bookable_dates(today, config.booking_horizon_days) {
                println!("{date} {}", config.weekday_locale.name(date.weekday()));
            }
        }
    }

    Ok(())
}

fn load_directory(input: Option<&Path>) -> anyhow::Result<Directory> {
    let Some(path) = input else {
        bail!("--input is required for this command");
    };
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read file {path:?}"))?;
    let directory = parse_directory_str(&data)
        .with_context(|| format!("Could not parse directory {path:?}"))?;
    Ok(directory)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DirectoryConfig> {
    let Some(path) = path else {
        return Ok(DirectoryConfig::default());
    };
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read config {path:?}"))?;
    serde_json::from_str(&data).with_context(|| format!("Invalid config {path:?}"))
}

fn print_bucket(title: &str, bookings: &[Booking]) {
    println!("{title} ({})", bookings.len());
    for booking in bookings {
        println!(
            "  {} {} provider {} [{:?}]",
            booking.date, booking.time, booking.provider_id, booking.status
        );
    }
}
