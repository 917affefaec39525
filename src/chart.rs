//! Natal chart: sign placements, lagna, houses and per-planet natal strength.

use chrono::{FixedOffset, NaiveTime, Utc};
use log::debug;

use super::*;
use crate::ephemeris::{normalize_degrees, solar_events, tropical_longitude, tropical_to_sidereal};

/// The lagna is taken to advance one sign every two hours after sunrise.
pub const LAGNA_DEGREES_PER_HOUR: f64 = 30.0 / 2.0;

/// Parses a birth time written as `H:MM` or `HH:MM` on a 24-hour clock.
pub fn parse_birth_time(raw: &str) -> AstrologyResult<NaiveTime> {
    let malformed = || AstrologyError::MalformedInput(format!("birth time must be HH:MM, got {:?}", raw));
    let (hours, minutes) = raw.trim().split_once(':').ok_or_else(malformed)?;
    if minutes.len() != 2 {
        return Err(malformed());
    }
    let hours: u32 = hours.parse().map_err(|_| malformed())?;
    let minutes: u32 = minutes.parse().map_err(|_| malformed())?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(malformed)
}

/// House of `sign` counted from `reference`, where `reference` itself is 1.
pub fn house_number(sign: ZodiacSign, reference: ZodiacSign) -> u8 {
    ((sign.index() + 12 - reference.index()) % 12 + 1) as u8
}

pub fn dignity(planet: Planet, sign: ZodiacSign) -> i32 {
    if planet.exaltation() == Some(sign) {
        return 10;
    }
    if planet.debilitation() == Some(sign) {
        return -10;
    }
    if planet.own_signs().contains(&sign) {
        return 8;
    }
    let lord = sign.lord();
    if planet.friends().contains(&lord) {
        4
    } else if planet.enemies().contains(&lord) {
        -4
    } else {
        0
    }
}

pub fn house_bonus(house: u8) -> i32 {
    match house {
        1 | 5 | 9 | 10 | 11 => 3,
        2 | 3 | 4 | 7 => 1,
        6 | 8 | 12 => -3,
        _ => 0,
    }
}

pub fn natal_strength(planet: Planet, sign: ZodiacSign, house: u8) -> i32 {
    dignity(planet, sign) + house_bonus(house)
}

impl Engine {
    /// Builds the natal chart for a birth on `birth_date` at `birth_time`,
    /// read as civil time in `offset` or, when `None`, the configured offset.
    pub fn compute_natal_chart(
        &self,
        birth_date: NaiveDate,
        birth_time: &str,
        location: Location,
        offset: Option<FixedOffset>,
    ) -> AstrologyResult<NatalChart> {
        location.validate()?;
        let time = parse_birth_time(birth_time)?;
        let offset = offset.unwrap_or(self.config.utc_offset);
        let birth_instant = birth_date
            .and_time(time)
            .and_local_timezone(offset)
            .single()
            .ok_or_else(|| AstrologyError::MalformedInput(format!("{} {} is not a civil time", birth_date, birth_time)))?;
        let instant = birth_instant.with_timezone(&Utc);
        let ayanamsa = self.ayanamsa(instant);

        let sidereal = Planet::ALL.map(|planet| tropical_to_sidereal(tropical_longitude(planet, instant), ayanamsa));
        let planet_signs = sidereal.map(ZodiacSign::from_longitude);
        let moon_longitude = sidereal[Planet::Moon.index()];
        let moon_nakshatra = Nakshatra::from_longitude(moon_longitude);

        let sunrise = solar_events(birth_date, location, offset)?.sunrise;
        let hours_since_sunrise = (instant - sunrise.with_timezone(&Utc)).num_milliseconds() as f64 / 3_600_000.0;
        let lagna_longitude =
            normalize_degrees(sidereal[Planet::Sun.index()] + hours_since_sunrise * LAGNA_DEGREES_PER_HOUR);
        let lagna_sign = ZodiacSign::from_longitude(lagna_longitude);

        let house_from_lagna = planet_signs.map(|sign| house_number(sign, lagna_sign));
        let mut strengths = [0; 9];
        for planet in Planet::iter() {
            let i = planet.index();
            strengths[i] = natal_strength(planet, planet_signs[i], house_from_lagna[i]);
        }

        debug!(
            "natal chart for {}: lagna {} ({:.2}), moon {} in {}",
            birth_instant, lagna_sign, lagna_longitude, moon_nakshatra, planet_signs[Planet::Moon.index()]
        );

        Ok(NatalChart {
            birth_instant,
            location,
            ayanamsa,
            lagna_longitude,
            lagna_sign,
            moon_sign: planet_signs[Planet::Moon.index()],
            moon_nakshatra,
            moon_nakshatra_lord: moon_nakshatra.lord(),
            sun_sign: planet_signs[Planet::Sun.index()],
            planet_signs,
            house_from_lagna,
            natal_strength: strengths,
        })
    }
}
