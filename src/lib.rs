//! Daily ruling-planet engine.
//!
//! Builds a natal chart and a daily panchang from a simplified closed-form
//! ephemeris, scores the day's candidate planets and packages the winner's
//! lucky attributes together with its planetary hours.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

pub mod chart;
pub mod config;
pub mod ephemeris;
pub mod hora;
pub mod panchang;
pub mod prediction;
pub mod selector;
pub mod store;
pub mod tables;

pub use config::EngineConfig;
pub use selector::Selection;
pub use store::{get_or_create_prediction, MemoryStore, PredictionStore};

// ---------------------------
// ## Enumerations
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Planet {
    Sun,
    Moon,
    Mars,
    Mercury,
    Jupiter,
    Venus,
    Saturn,
    Rahu,
    Ketu,
}

impl Planet {
    pub const ALL: [Planet; 9] = [
        Planet::Sun,
        Planet::Moon,
        Planet::Mars,
        Planet::Mercury,
        Planet::Jupiter,
        Planet::Venus,
        Planet::Saturn,
        Planet::Rahu,
        Planet::Ketu,
    ];

    pub fn iter() -> impl Iterator<Item = Planet> {
        Self::ALL.iter().copied()
    }

    /// Position in [`Planet::ALL`], used to index per-planet arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Planet::Sun => "Sun",
            Planet::Moon => "Moon",
            Planet::Mars => "Mars",
            Planet::Mercury => "Mercury",
            Planet::Jupiter => "Jupiter",
            Planet::Venus => "Venus",
            Planet::Saturn => "Saturn",
            Planet::Rahu => "Rahu",
            Planet::Ketu => "Ketu",
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Planet {
    type Err = AstrologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Planet::iter()
            .find(|planet| planet.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AstrologyError::UnknownPlanet(wanted.to_string()))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    pub const SPAN_DEGREES: f64 = 30.0;

    /// Wraps any index into the 12-sign cycle.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// `floor(longitude / 30) mod 12` on the normalized longitude.
    pub fn from_longitude(longitude: f64) -> Self {
        let normalized = ephemeris::normalize_degrees(longitude);
        Self::from_index((normalized / Self::SPAN_DEGREES).floor() as usize)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Nakshatra {
    Ashwini,
    Bharani,
    Krittika,
    Rohini,
    Mrigashira,
    Ardra,
    Punarvasu,
    Pushya,
    Ashlesha,
    Magha,
    PurvaPhalguni,
    UttaraPhalguni,
    Hasta,
    Chitra,
    Swati,
    Vishakha,
    Anuradha,
    Jyeshtha,
    Mula,
    PurvaAshadha,
    UttaraAshadha,
    Shravana,
    Dhanishta,
    Shatabhisha,
    PurvaBhadrapada,
    UttaraBhadrapada,
    Revati,
}

impl Nakshatra {
    pub const ALL: [Nakshatra; 27] = [
        Nakshatra::Ashwini,
        Nakshatra::Bharani,
        Nakshatra::Krittika,
        Nakshatra::Rohini,
        Nakshatra::Mrigashira,
        Nakshatra::Ardra,
        Nakshatra::Punarvasu,
        Nakshatra::Pushya,
        Nakshatra::Ashlesha,
        Nakshatra::Magha,
        Nakshatra::PurvaPhalguni,
        Nakshatra::UttaraPhalguni,
        Nakshatra::Hasta,
        Nakshatra::Chitra,
        Nakshatra::Swati,
        Nakshatra::Vishakha,
        Nakshatra::Anuradha,
        Nakshatra::Jyeshtha,
        Nakshatra::Mula,
        Nakshatra::PurvaAshadha,
        Nakshatra::UttaraAshadha,
        Nakshatra::Shravana,
        Nakshatra::Dhanishta,
        Nakshatra::Shatabhisha,
        Nakshatra::PurvaBhadrapada,
        Nakshatra::UttaraBhadrapada,
        Nakshatra::Revati,
    ];

    pub const SPAN_DEGREES: f64 = 360.0 / 27.0;

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// `floor(longitude / (360/27)) mod 27` on the normalized longitude.
    pub fn from_longitude(longitude: f64) -> Self {
        let normalized = ephemeris::normalize_degrees(longitude);
        Self::from_index((normalized / Self::SPAN_DEGREES).floor() as usize)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Nakshatra::Ashwini => "Ashwini",
            Nakshatra::Bharani => "Bharani",
            Nakshatra::Krittika => "Krittika",
            Nakshatra::Rohini => "Rohini",
            Nakshatra::Mrigashira => "Mrigashira",
            Nakshatra::Ardra => "Ardra",
            Nakshatra::Punarvasu => "Punarvasu",
            Nakshatra::Pushya => "Pushya",
            Nakshatra::Ashlesha => "Ashlesha",
            Nakshatra::Magha => "Magha",
            Nakshatra::PurvaPhalguni => "Purva Phalguni",
            Nakshatra::UttaraPhalguni => "Uttara Phalguni",
            Nakshatra::Hasta => "Hasta",
            Nakshatra::Chitra => "Chitra",
            Nakshatra::Swati => "Swati",
            Nakshatra::Vishakha => "Vishakha",
            Nakshatra::Anuradha => "Anuradha",
            Nakshatra::Jyeshtha => "Jyeshtha",
            Nakshatra::Mula => "Mula",
            Nakshatra::PurvaAshadha => "Purva Ashadha",
            Nakshatra::UttaraAshadha => "Uttara Ashadha",
            Nakshatra::Shravana => "Shravana",
            Nakshatra::Dhanishta => "Dhanishta",
            Nakshatra::Shatabhisha => "Shatabhisha",
            Nakshatra::PurvaBhadrapada => "Purva Bhadrapada",
            Nakshatra::UttaraBhadrapada => "Uttara Bhadrapada",
            Nakshatra::Revati => "Revati",
        }
    }
}

impl fmt::Display for Nakshatra {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
            Direction::NorthEast => "North-East",
            Direction::NorthWest => "North-West",
            Direction::SouthEast => "South-East",
            Direction::SouthWest => "South-West",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------
// ## Structures
// ---------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Indian Standard Time and Gulf Standard Time, in seconds east of UTC.
const IST: i32 = 19_800;
const GST: i32 = 14_400;

/// Known birth places, matched by substring against free-text input, with
/// their civil UTC offset.
const CITIES: &[(&str, f64, f64, i32)] = &[
    ("delhi", 28.6139, 77.2090, IST),
    ("mumbai", 19.0760, 72.8777, IST),
    ("bombay", 19.0760, 72.8777, IST),
    ("bangalore", 12.9716, 77.5946, IST),
    ("bengaluru", 12.9716, 77.5946, IST),
    ("chennai", 13.0827, 80.2707, IST),
    ("kolkata", 22.5726, 88.3639, IST),
    ("hyderabad", 17.3850, 78.4867, IST),
    ("pune", 18.5204, 73.8567, IST),
    ("ahmedabad", 23.0225, 72.5714, IST),
    ("jaipur", 26.9124, 75.7873, IST),
    ("lucknow", 26.8467, 80.9462, IST),
    ("varanasi", 25.3176, 82.9739, IST),
    ("kochi", 9.9312, 76.2673, IST),
    ("kozhikode", 11.2588, 75.7804, IST),
    ("calicut", 11.2588, 75.7804, IST),
    ("thrissur", 10.5276, 76.2144, IST),
    ("kannur", 11.8745, 75.3704, IST),
    ("dubai", 25.2048, 55.2708, GST),
    ("abu dhabi", 24.4539, 54.3773, GST),
    ("sharjah", 25.3463, 55.4209, GST),
];

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location { latitude, longitude }
    }

    pub fn delhi() -> Self {
        Location::new(28.6139, 77.2090)
    }

    /// Rejects non-finite coordinates and anything outside |lat| <= 90,
    /// |lng| <= 180.
    pub fn validate(&self) -> AstrologyResult<()> {
        let in_range = |value: f64, limit: f64| value.is_finite() && value.abs() <= limit;
        if in_range(self.latitude, 90.0) && in_range(self.longitude, 180.0) {
            Ok(())
        } else {
            Err(AstrologyError::MalformedInput(format!(
                "coordinates out of range: latitude {}, longitude {}",
                self.latitude, self.longitude
            )))
        }
    }

    /// Looks a free-text place up in the city table, case-insensitively,
    /// returning its coordinates and civil UTC offset.
    pub fn lookup_with_offset(place: &str) -> Option<(Self, FixedOffset)> {
        let needle = place.to_lowercase();
        CITIES
            .iter()
            .find(|(city, _, _, _)| needle.contains(city))
            .and_then(|&(_, latitude, longitude, offset_secs)| {
                FixedOffset::east_opt(offset_secs).map(|offset| (Location::new(latitude, longitude), offset))
            })
    }

    pub fn lookup(place: &str) -> Option<Self> {
        Self::lookup_with_offset(place).map(|(location, _)| location)
    }

    /// Like [`Location::lookup`], falling back to `default` when no city matches.
    pub fn resolve(place: &str, default: Location) -> Self {
        Self::lookup(place).unwrap_or(default)
    }
}

/// Birth snapshot. Per-planet arrays are indexed by [`Planet::index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    pub birth_instant: DateTime<FixedOffset>,
    pub location: Location,
    pub ayanamsa: f64,
    pub lagna_longitude: f64,
    pub lagna_sign: ZodiacSign,
    pub moon_sign: ZodiacSign,
    pub moon_nakshatra: Nakshatra,
    pub moon_nakshatra_lord: Planet,
    pub sun_sign: ZodiacSign,
    pub planet_signs: [ZodiacSign; 9],
    pub house_from_lagna: [u8; 9],
    pub natal_strength: [i32; 9],
}

impl NatalChart {
    pub fn sign_of(&self, planet: Planet) -> ZodiacSign {
        self.planet_signs[planet.index()]
    }

    pub fn house_of(&self, planet: Planet) -> u8 {
        self.house_from_lagna[planet.index()]
    }

    pub fn strength_of(&self, planet: Planet) -> i32 {
        self.natal_strength[planet.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPanchang {
    pub date: NaiveDate,
    pub location: Location,
    pub weekday: Weekday,
    pub weekday_lord: Planet,
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
    pub nakshatra: Nakshatra,
    pub nakshatra_lord: Planet,
    pub moon_sign: ZodiacSign,
    pub moon_sign_lord: Planet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoraWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub planet: Planet,
}

impl fmt::Display for HoraWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} - {} ({})",
            self.start.format("%-I:%M %p"),
            self.end.format("%-I:%M %p"),
            self.planet
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckyColor {
    pub name: String,
    pub name_hi: String,
    pub hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mantra {
    pub sanskrit: String,
    pub meaning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub ruling_planet: Planet,
    pub lucky_number: u8,
    pub lucky_color: LuckyColor,
    pub lucky_direction: Direction,
    pub lucky_direction_hi: String,
    pub hora_windows: Vec<HoraWindow>,
    pub mantra: Mantra,
    pub scores: BTreeMap<Planet, i32>,
}

/// Stored prediction, keyed by `(person_id, date)` and never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPrediction {
    pub person_id: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub result: PredictionResult,
}

// ---------------------------
// ## Error Handling
// ---------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum AstrologyError {
    MalformedInput(String),
    DomainError { latitude: f64, day_of_year: u32 },
    UnknownPlanet(String),
}

pub type AstrologyResult<T> = Result<T, AstrologyError>;

impl fmt::Display for AstrologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstrologyError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            AstrologyError::DomainError { latitude, day_of_year } => write!(
                f,
                "No sunrise or sunset at latitude {} on day {} of the year",
                latitude, day_of_year
            ),
            AstrologyError::UnknownPlanet(name) => write!(f, "Unknown planet: {}", name),
        }
    }
}

impl Error for AstrologyError {}

// ---------------------------
// ## Engine
// ---------------------------

/// Entry point for the chart, panchang and prediction pipelines.
///
/// Holds only immutable configuration, so one engine can be shared across
/// threads and reused for any number of people and dates.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Engine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
