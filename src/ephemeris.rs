//! Low-order closed-form ephemeris.
//!
//! Longitudes are truncated series around J2000 (2000-01-01 12:00 UTC), good
//! to about a degree for the Sun and a few degrees for the Moon. The outer
//! and inner planets use mean longitudes only.

use chrono::{DateTime, Datelike, Duration as ChronoDuration, FixedOffset, NaiveDate, NaiveTime, Utc};

use super::*;

/// Unix milliseconds of 2000-01-01T12:00:00Z.
pub const J2000_UNIX_MILLIS: i64 = 946_728_000_000;
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

const OBLIQUITY_DEGREES: f64 = 23.45;

/// Wraps an angle into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed, fractional days since J2000.
pub fn days_since_j2000(instant: DateTime<Utc>) -> f64 {
    (instant.timestamp_millis() - J2000_UNIX_MILLIS) as f64 / MILLIS_PER_DAY
}

fn sun_longitude(days: f64) -> f64 {
    let mean_longitude = 280.460 + 0.985_647_4 * days;
    let mean_anomaly = (357.528 + 0.985_600_3 * days).to_radians();
    normalize_degrees(
        mean_longitude + 1.915 * mean_anomaly.sin() + 0.020 * (2.0 * mean_anomaly).sin(),
    )
}

fn moon_longitude(days: f64) -> f64 {
    let moon_anomaly = (134.963 + 13.064_993 * days).to_radians();
    let sun_anomaly = (357.529 + 0.985_600 * days).to_radians();
    let elongation = (297.850 + 12.190_749 * days).to_radians();
    let mean_longitude = 218.316 + 13.176_396 * days;

    normalize_degrees(
        mean_longitude + 6.289 * moon_anomaly.sin()
            - 1.274 * (2.0 * elongation - moon_anomaly).sin()
            + 0.658 * (2.0 * elongation).sin()
            - 0.214 * (2.0 * moon_anomaly).sin()
            - 0.186 * sun_anomaly.sin(),
    )
}

/// Mean lunar ascending node; regresses about 19.3 degrees a year.
fn rahu_longitude(days: f64) -> f64 {
    normalize_degrees(125.044 - 0.052_954 * days)
}

fn mean_longitude(at_epoch: f64, daily_motion: f64, days: f64) -> f64 {
    normalize_degrees(at_epoch + daily_motion * days)
}

/// Tropical ecliptic longitude of `planet` at `instant`, in `[0, 360)`.
pub fn tropical_longitude(planet: Planet, instant: DateTime<Utc>) -> f64 {
    let days = days_since_j2000(instant);
    match planet {
        Planet::Sun => sun_longitude(days),
        Planet::Moon => moon_longitude(days),
        Planet::Rahu => rahu_longitude(days),
        Planet::Ketu => normalize_degrees(rahu_longitude(days) + 180.0),
        Planet::Mercury => mean_longitude(252.251, 4.092_317, days),
        Planet::Venus => mean_longitude(181.980, 1.602_136, days),
        Planet::Mars => mean_longitude(355.433, 0.524_039, days),
        Planet::Jupiter => mean_longitude(34.351, 0.083_056, days),
        Planet::Saturn => mean_longitude(50.077, 0.033_371, days),
    }
}

/// Linear ayanamsa: `at_epoch + years_since_j2000 * annual_precession`.
pub fn ayanamsa(instant: DateTime<Utc>, at_epoch: f64, annual_precession: f64) -> f64 {
    let years = days_since_j2000(instant) / DAYS_PER_JULIAN_YEAR;
    at_epoch + years * annual_precession
}

pub fn tropical_to_sidereal(tropical_longitude: f64, ayanamsa: f64) -> f64 {
    normalize_degrees(tropical_longitude - ayanamsa)
}

impl Engine {
    pub fn ayanamsa(&self, instant: DateTime<Utc>) -> f64 {
        ayanamsa(
            instant,
            self.config.ayanamsa_at_epoch,
            self.config.annual_precession,
        )
    }

    pub fn sidereal_longitude(&self, planet: Planet, instant: DateTime<Utc>) -> f64 {
        tropical_to_sidereal(tropical_longitude(planet, instant), self.ayanamsa(instant))
    }
}

// ---------------------------
// ## Sunrise and Sunset
// ---------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolarEvents {
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
}

pub fn solar_declination(day_of_year: u32) -> f64 {
    OBLIQUITY_DEGREES * ((360.0 / 365.0) * (day_of_year as f64 - 81.0)).to_radians().sin()
}

fn at_hours_after(midnight: DateTime<Utc>, hours: f64) -> Option<DateTime<Utc>> {
    let minutes = (hours * 60.0).round();
    if !minutes.is_finite() {
        return None;
    }
    ChronoDuration::try_minutes(minutes as i64).and_then(|delta| midnight.checked_add_signed(delta))
}

/// Approximate sunrise and sunset on `date`, rounded to the minute and
/// expressed in `offset`.
///
/// Solar noon is taken as 12:00 UTC shifted by the observer's longitude, so
/// the equation of time is ignored. Fails with
/// [`AstrologyError::DomainError`] when the sun never crosses the horizon and
/// with [`AstrologyError::MalformedInput`] for out-of-range coordinates.
pub fn solar_events(
    date: NaiveDate,
    location: Location,
    offset: FixedOffset,
) -> AstrologyResult<SolarEvents> {
    location.validate()?;
    let day_of_year = date.ordinal();
    let declination = solar_declination(day_of_year);
    let cos_hour_angle = -location.latitude.to_radians().tan() * declination.to_radians().tan();
    if !(-1.0..=1.0).contains(&cos_hour_angle) {
        return Err(AstrologyError::DomainError {
            latitude: location.latitude,
            day_of_year,
        });
    }

    let half_day_hours = cos_hour_angle.acos().to_degrees() / 15.0;
    let solar_noon_utc = 12.0 - location.longitude / 15.0;
    let midnight = date.and_time(NaiveTime::MIN).and_utc();

    let out_of_range = || AstrologyError::MalformedInput(format!("sunrise on {} is outside the calendar", date));
    let sunrise = at_hours_after(midnight, solar_noon_utc - half_day_hours).ok_or_else(out_of_range)?;
    let sunset = at_hours_after(midnight, solar_noon_utc + half_day_hours).ok_or_else(out_of_range)?;
    Ok(SolarEvents {
        sunrise: sunrise.with_timezone(&offset),
        sunset: sunset.with_timezone(&offset),
    })
}
