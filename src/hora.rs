//! Planetary hours.
//!
//! Sunrise to sunset is split into 12 equal day horas and sunset to the next
//! sunrise into 12 night horas. The first hora belongs to the weekday lord
//! and the rest follow [`CHALDEAN_ORDER`].

use chrono::{DateTime, Datelike, Duration as ChronoDuration, FixedOffset, Timelike};
use log::{debug, warn};

use super::*;
use crate::tables::CHALDEAN_ORDER;

pub const HORAS_PER_HALF_DAY: usize = 12;
pub const MAX_WINDOWS: usize = 2;

/// Earliest clock minute a window may start at (07:00).
pub const DAYTIME_START_MINUTE: u32 = 7 * 60;
/// Latest clock minute a window may end at (22:30).
pub const DAYTIME_END_MINUTE: u32 = 22 * 60 + 30;

pub const FALLBACK_START_MINUTE: i64 = 10 * 60;
pub const FALLBACK_LENGTH_MINUTES: i64 = 60;

fn minute_of_day(instant: &DateTime<FixedOffset>) -> u32 {
    instant.hour() * 60 + instant.minute()
}

fn split(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Vec<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    let length_ms = (end - start).num_milliseconds() as f64 / HORAS_PER_HALF_DAY as f64;
    let at = |i: usize| start + ChronoDuration::milliseconds((i as f64 * length_ms).round() as i64);
    (0..HORAS_PER_HALF_DAY).map(|i| (at(i), at(i + 1))).collect()
}

/// All 24 horas from `sunrise` to the following sunrise, taken to be 24
/// hours later.
pub fn hora_sequence(sunrise: DateTime<FixedOffset>, sunset: DateTime<FixedOffset>) -> Vec<HoraWindow> {
    let next_sunrise = sunrise + ChronoDuration::hours(24);
    let seed = Weekday::from(sunrise.weekday()).chaldean_offset();

    split(sunrise, sunset)
        .into_iter()
        .chain(split(sunset, next_sunrise))
        .enumerate()
        .map(|(i, (start, end))| HoraWindow {
            start,
            end,
            planet: CHALDEAN_ORDER[(seed + i) % CHALDEAN_ORDER.len()],
        })
        .collect()
}

/// Whether a window sits inside 07:00..22:30 on one calendar day.
pub fn within_daytime(window: &HoraWindow) -> bool {
    window.start.date_naive() == window.end.date_naive()
        && minute_of_day(&window.start) >= DAYTIME_START_MINUTE
        && minute_of_day(&window.end) <= DAYTIME_END_MINUTE
}

/// 10:00 to 11:00 on the sunrise's calendar day.
pub fn fallback_window(planet: Planet, sunrise: DateTime<FixedOffset>) -> HoraWindow {
    let midnight = sunrise
        - ChronoDuration::seconds(sunrise.num_seconds_from_midnight() as i64)
        - ChronoDuration::nanoseconds(sunrise.nanosecond() as i64);
    let start = midnight + ChronoDuration::minutes(FALLBACK_START_MINUTE);
    HoraWindow {
        start,
        end: start + ChronoDuration::minutes(FALLBACK_LENGTH_MINUTES),
        planet,
    }
}

/// The first two daytime horas ruled by `planet`, or the fixed fallback
/// window when none qualify.
pub fn hora_windows(planet: Planet, sunrise: DateTime<FixedOffset>, sunset: DateTime<FixedOffset>) -> Vec<HoraWindow> {
    let windows: Vec<HoraWindow> = hora_sequence(sunrise, sunset)
        .into_iter()
        .filter(|hora| hora.planet == planet && within_daytime(hora))
        .take(MAX_WINDOWS)
        .collect();

    if windows.is_empty() {
        warn!("no daytime hora for {} on {}, using fallback window", planet, sunrise.date_naive());
        return vec![fallback_window(planet, sunrise)];
    }
    debug!("hora windows for {}: {:?}", planet, windows.iter().map(ToString::to_string).collect::<Vec<_>>());
    windows
}
