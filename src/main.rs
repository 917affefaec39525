use std::error::Error;

use chrono::{Days, FixedOffset, NaiveDate};
use clap::{Args, Parser, Subcommand};
use graha_core::config::parse_utc_offset;
use graha_core::{
    get_or_create_prediction, AstrologyError, AstrologyResult, DailyPrediction, Engine, EngineConfig, Location,
    MemoryStore, Planet, PredictionStore,
};
use log::debug;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "graha", version, about = "Daily ruling-planet engine")]
struct Cli {
    /// Civil UTC offset (+HH:MM) at the place, overrides the city table and GRAHA_UTC_OFFSET
    #[arg(long, global = true, allow_hyphen_values = true)]
    offset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct PlaceArgs {
    /// Free-text place name, matched against the city table
    #[arg(long)]
    place: Option<String>,
    /// Latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true, requires = "lng", conflicts_with = "place")]
    lat: Option<f64>,
    /// Longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true, requires = "lat", conflicts_with = "place")]
    lng: Option<f64>,
}

impl PlaceArgs {
    /// Coordinates plus the city's UTC offset when the place matched the table.
    fn resolve(&self, default: Location) -> (Location, Option<FixedOffset>) {
        match (self.lat, self.lng, &self.place) {
            (Some(lat), Some(lng), _) => (Location::new(lat, lng), None),
            (_, _, Some(place)) => resolve_place(place, default),
            _ => (default, None),
        }
    }
}

fn resolve_place(place: &str, default: Location) -> (Location, Option<FixedOffset>) {
    match Location::lookup_with_offset(place) {
        Some((location, offset)) => (location, Some(offset)),
        None => (default, None),
    }
}

fn nth_day(start: NaiveDate, day: u32) -> AstrologyResult<NaiveDate> {
    start
        .checked_add_days(Days::new(u64::from(day)))
        .ok_or_else(|| AstrologyError::MalformedInput(format!("{} plus {} days is past the calendar", start, day)))
}

#[derive(Subcommand)]
enum Commands {
    /// Natal chart for a birth date, time and place
    Natal {
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Birth time (HH:MM, 24-hour)
        #[arg(long)]
        time: String,
        #[command(flatten)]
        place: PlaceArgs,
    },
    /// Daily panchang for a date and place
    Panchang {
        /// Calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        #[command(flatten)]
        place: PlaceArgs,
    },
    /// Daily predictions for a person, one per day starting at --date
    Predict {
        #[arg(long)]
        birth_date: NaiveDate,
        #[arg(long)]
        birth_time: String,
        /// Birth place, matched against the city table
        #[arg(long)]
        birth_place: Option<String>,
        /// Civil UTC offset at the birth place, overrides the city table
        #[arg(long, allow_hyphen_values = true)]
        birth_offset: Option<String>,
        /// First day to predict (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Number of consecutive days
        #[arg(long, default_value = "1")]
        days: u32,
        /// Ruling planet of the day before --date
        #[arg(long)]
        yesterday: Option<Planet>,
        #[arg(long, default_value = "cli")]
        person_id: String,
        #[command(flatten)]
        place: PlaceArgs,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = EngineConfig::from_env()?;
    let cli_offset = cli.offset.as_deref().map(parse_utc_offset).transpose()?;
    if let Some(offset) = cli_offset {
        config.utc_offset = offset;
    }
    let default_location = config.default_location;
    debug!("engine config: {:?}", config);
    let engine = Engine::new(config);

    match cli.command {
        Commands::Natal { date, time, place } => {
            let (location, city_offset) = place.resolve(default_location);
            let chart = engine.compute_natal_chart(date, &time, location, cli_offset.or(city_offset))?;
            print_json(&chart)
        }
        Commands::Panchang { date, place } => {
            let (location, city_offset) = place.resolve(default_location);
            let panchang = engine.compute_daily_panchang(date, location, cli_offset.or(city_offset))?;
            print_json(&panchang)
        }
        Commands::Predict {
            birth_date,
            birth_time,
            birth_place,
            birth_offset,
            date,
            days,
            yesterday,
            person_id,
            place,
        } => {
            let (birth_location, birth_city_offset) = birth_place
                .as_deref()
                .map_or((default_location, None), |text| resolve_place(text, default_location));
            let birth_offset = birth_offset.as_deref().map(parse_utc_offset).transpose()?;
            let natal =
                engine.compute_natal_chart(birth_date, &birth_time, birth_location, birth_offset.or(birth_city_offset))?;
            let (location, city_offset) = place.resolve(default_location);
            let offset = cli_offset.or(city_offset);
            let store = MemoryStore::new();

            if let Some(planet) = yesterday {
                // Only the first day can see the supplied planet; later days
                // chain from what the store already holds.
                let panchang = engine.compute_daily_panchang(date, location, offset)?;
                store.insert_if_absent(DailyPrediction {
                    person_id: person_id.clone(),
                    date,
                    result: engine.generate_daily_prediction(&natal, &panchang, Some(planet)),
                });
            }

            let mut predictions = Vec::new();
            for day in 0..days {
                let target = nth_day(date, day)?;
                predictions.push(get_or_create_prediction(
                    &engine, &store, &person_id, &natal, target, location, offset,
                )?);
            }
            print_json(&predictions)
        }
    }
}

fn main() {
    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("fatal: {}", e);
        std::process::exit(1);
    }
}
