use chrono::{Datelike, FixedOffset, Utc};
use log::debug;

use super::*;
use crate::ephemeris::solar_events;

impl Engine {
    /// Almanac for `date` at `location`: weekday lord, sunrise and sunset,
    /// and the Moon's nakshatra and sign at sunrise. Sunrise and sunset are
    /// expressed in `offset`, or the configured offset when `None`.
    pub fn compute_daily_panchang(
        &self,
        date: NaiveDate,
        location: Location,
        offset: Option<FixedOffset>,
    ) -> AstrologyResult<DailyPanchang> {
        location.validate()?;
        let solar = solar_events(date, location, offset.unwrap_or(self.config.utc_offset))?;
        let weekday = Weekday::from(date.weekday());

        let moon_longitude = self.sidereal_longitude(Planet::Moon, solar.sunrise.with_timezone(&Utc));
        let nakshatra = Nakshatra::from_longitude(moon_longitude);
        let moon_sign = ZodiacSign::from_longitude(moon_longitude);

        debug!(
            "panchang {} ({}): sunrise {}, sunset {}, moon {:.2} in {} / {}",
            date, weekday, solar.sunrise, solar.sunset, moon_longitude, nakshatra, moon_sign
        );

        Ok(DailyPanchang {
            date,
            location,
            weekday,
            weekday_lord: weekday.lord(),
            sunrise: solar.sunrise,
            sunset: solar.sunset,
            nakshatra,
            nakshatra_lord: nakshatra.lord(),
            moon_sign,
            moon_sign_lord: moon_sign.lord(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sunday_panchang_in_delhi() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        let panchang = Engine::default().compute_daily_panchang(date, Location::delhi(), None).unwrap();
        assert_eq!(panchang.weekday, Weekday::Sunday);
        assert_eq!(panchang.weekday_lord, Planet::Sun);
        assert!(panchang.sunrise < panchang.sunset);
        assert_eq!(panchang.nakshatra_lord, panchang.nakshatra.lord());
        assert_eq!(panchang.moon_sign_lord, panchang.moon_sign.lord());
    }

    #[test]
    fn test_moon_sign_contains_nakshatra() {
        // Each sign spans exactly 2.25 nakshatras, so the nakshatra index
        // pins the sign to one of at most two neighbours.
        let engine = Engine::default();
        let mut date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for _ in 0..40 {
            let panchang = engine.compute_daily_panchang(date, Location::delhi(), None).unwrap();
            let start_sign = (panchang.nakshatra.index() as f64 * Nakshatra::SPAN_DEGREES / 30.0).floor() as usize;
            let sign = panchang.moon_sign.index();
            assert!(sign == start_sign || sign == (start_sign + 1) % 12, "{:?}", panchang);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_polar_panchang_fails() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let err = Engine::default()
            .compute_daily_panchang(date, Location::new(-78.0, 166.0), None)
            .unwrap_err();
        assert!(matches!(err, AstrologyError::DomainError { .. }));
    }

    #[test]
    fn test_offset_changes_clock_not_instant() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        let (dubai, gst) = Location::lookup_with_offset("dubai").unwrap();
        let engine = Engine::default();
        let local = engine.compute_daily_panchang(date, dubai, Some(gst)).unwrap();
        let as_ist = engine.compute_daily_panchang(date, dubai, None).unwrap();
        assert_eq!(local.sunrise.offset().local_minus_utc(), 4 * 3600);
        assert_eq!(local.sunrise, as_ist.sunrise);
        assert_eq!(local.nakshatra, as_ist.nakshatra);
        assert_eq!(local.sunrise.time() + chrono::Duration::minutes(90), as_ist.sunrise.time());
    }

    #[test]
    fn test_nan_longitude_is_rejected() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        for location in [Location::new(28.6, f64::NAN), Location::new(28.6, 1e15)] {
            let err = Engine::default()
                .compute_daily_panchang(date, location, None)
                .unwrap_err();
            assert!(matches!(err, AstrologyError::MalformedInput(_)));
        }
    }
}
