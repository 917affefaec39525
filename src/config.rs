//! Engine configuration.
//! Defaults reproduce the published constants; every knob can be overridden
//! from the environment.

use chrono::{FixedOffset, Offset, Utc};

use crate::{AstrologyError, AstrologyResult, Location};

pub const DEFAULT_AYANAMSA_AT_EPOCH: f64 = 23.856;
pub const DEFAULT_PRECESSION_ARCSEC_PER_YEAR: f64 = 50.29;
pub const DEFAULT_CONTINUITY_THRESHOLD: i32 = 12;
/// Indian Standard Time, +05:30.
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 19_800;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Ayanamsa in degrees at 2000-01-01 12:00 UTC.
    pub ayanamsa_at_epoch: f64,
    /// Degrees of precession per Julian year.
    pub annual_precession: f64,
    /// Yesterday's planet is kept while today's leader is ahead by less than this.
    pub continuity_threshold: i32,
    /// Civil offset for birth times, panchang dates and hora clock windows.
    pub utc_offset: FixedOffset,
    /// Used when a birth place cannot be resolved.
    pub default_location: Location,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            ayanamsa_at_epoch: DEFAULT_AYANAMSA_AT_EPOCH,
            annual_precession: DEFAULT_PRECESSION_ARCSEC_PER_YEAR / 3600.0,
            continuity_threshold: DEFAULT_CONTINUITY_THRESHOLD,
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or(Utc.fix()),
            default_location: Location::delhi(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> AstrologyResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> AstrologyResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = EngineConfig::default();

        if let Some(raw) = get("GRAHA_AYANAMSA_BASE") {
            config.ayanamsa_at_epoch = parse_number("GRAHA_AYANAMSA_BASE", &raw)?;
        }
        if let Some(raw) = get("GRAHA_PRECESSION_ARCSEC") {
            config.annual_precession = parse_number::<f64>("GRAHA_PRECESSION_ARCSEC", &raw)? / 3600.0;
        }
        if let Some(raw) = get("GRAHA_CONTINUITY_THRESHOLD") {
            config.continuity_threshold = parse_number("GRAHA_CONTINUITY_THRESHOLD", &raw)?;
        }
        if let Some(raw) = get("GRAHA_UTC_OFFSET") {
            config.utc_offset = parse_utc_offset(&raw)?;
        }
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> AstrologyResult<T> {
    raw.parse()
        .map_err(|_| AstrologyError::MalformedInput(format!("{} is not a number: {:?}", key, raw)))
}

/// Parses `+HH:MM`, `-HH:MM` or `Z`.
pub fn parse_utc_offset(raw: &str) -> AstrologyResult<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }
    let malformed = || AstrologyError::MalformedInput(format!("UTC offset must look like +05:30, got {:?}", raw));

    let (sign, rest) = if let Some(rest) = raw.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = raw.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(malformed());
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(malformed)?;
    let hours: i32 = hours.parse().map_err(|_| malformed())?;
    let minutes: i32 = minutes.parse().map_err(|_| malformed())?;
    if !(0..60).contains(&minutes) {
        return Err(malformed());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.ayanamsa_at_epoch, 23.856);
        assert_eq!(config.annual_precession, 50.29 / 3600.0);
        assert_eq!(config.continuity_threshold, 12);
        assert_eq!(config.utc_offset.local_minus_utc(), 19_800);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GRAHA_CONTINUITY_THRESHOLD", "8"),
            ("GRAHA_UTC_OFFSET", "-04:00"),
            ("GRAHA_AYANAMSA_BASE", "  "),
        ]
        .into_iter()
        .collect();
        let config = EngineConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.continuity_threshold, 8);
        assert_eq!(config.utc_offset.local_minus_utc(), -4 * 3600);
        assert_eq!(config.ayanamsa_at_epoch, DEFAULT_AYANAMSA_AT_EPOCH);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = EngineConfig::from_lookup(|k| (k == "GRAHA_PRECESSION_ARCSEC").then(|| "fast".to_string()))
            .unwrap_err();
        assert!(matches!(err, AstrologyError::MalformedInput(_)));
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+05:30").unwrap().local_minus_utc(), 19_800);
        assert_eq!(parse_utc_offset("-09:30").unwrap().local_minus_utc(), -34_200);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("05:30").is_err());
        assert!(parse_utc_offset("+5").is_err());
        assert!(parse_utc_offset("+05:75").is_err());
        assert!(parse_utc_offset("+30:00").is_err());
    }
}
