//! Ruling-planet selection.
//!
//! Up to four role lords compete for the day. Each scores its role bonuses,
//! its natal strength and a transit modifier; the highest total wins unless
//! yesterday's planet is still a candidate and trails by less than the
//! continuity threshold.

use chrono::{DateTime, Utc};
use log::debug;

use super::*;
use crate::chart::house_number;

// ---------------------------
// ## Roles
// ---------------------------

/// Ways a planet can earn a place among the day's candidates, in tie-break
/// priority order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    WeekdayLord,
    TodayNakshatraLord,
    NatalMoonNakshatraLord,
    TransitMoonSignLord,
}

impl Role {
    pub const PRIORITY: [Role; 4] = [
        Role::WeekdayLord,
        Role::TodayNakshatraLord,
        Role::NatalMoonNakshatraLord,
        Role::TransitMoonSignLord,
    ];

    pub fn bonus(self) -> i32 {
        match self {
            Role::WeekdayLord => 30,
            Role::TodayNakshatraLord => 25,
            Role::NatalMoonNakshatraLord => 20,
            Role::TransitMoonSignLord => 15,
        }
    }

    pub fn lord(self, natal: &NatalChart, panchang: &DailyPanchang) -> Planet {
        match self {
            Role::WeekdayLord => panchang.weekday_lord,
            Role::TodayNakshatraLord => panchang.nakshatra_lord,
            Role::NatalMoonNakshatraLord => natal.moon_nakshatra_lord,
            Role::TransitMoonSignLord => panchang.moon_sign_lord,
        }
    }
}

/// Distinct role lords, ordered by the first role each one holds.
pub fn candidates(natal: &NatalChart, panchang: &DailyPanchang) -> Vec<Planet> {
    let mut planets = Vec::with_capacity(Role::PRIORITY.len());
    for role in Role::PRIORITY {
        let lord = role.lord(natal, panchang);
        if !planets.contains(&lord) {
            planets.push(lord);
        }
    }
    planets
}

pub fn role_bonus(planet: Planet, natal: &NatalChart, panchang: &DailyPanchang) -> i32 {
    Role::PRIORITY
        .iter()
        .filter(|role| role.lord(natal, panchang) == planet)
        .map(|role| role.bonus())
        .sum()
}

pub fn transit_house_bonus(house: u8) -> i32 {
    match house {
        1 | 3 | 6 | 10 | 11 => 3,
        8 | 12 => -3,
        _ => 0,
    }
}

/// Sorts by descending score. The sort is stable, so candidates passed in
/// priority order keep that order on ties.
pub fn rank_candidates(scored: &[(Planet, i32)]) -> Vec<(Planet, i32)> {
    let mut ranked = scored.to_vec();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Picks yesterday's planet over the leader when it is still ranked and
/// trails by less than `threshold`. Returns the winner and whether the
/// override fired.
pub fn apply_continuity(ranked: &[(Planet, i32)], yesterday: Option<Planet>, threshold: i32) -> Option<(Planet, bool)> {
    let &(top, top_score) = ranked.first()?;
    let carried = yesterday.and_then(|prior| ranked.iter().find(|(planet, _)| *planet == prior));
    match carried {
        Some(&(prior, prior_score)) if prior != top && top_score - prior_score < threshold => Some((prior, true)),
        _ => Some((top, false)),
    }
}

// ---------------------------
// ## Selection
// ---------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub ruling_planet: Planet,
    /// Highest scorer before the continuity rule.
    pub nominal_top: Planet,
    pub continuity_applied: bool,
    pub scores: BTreeMap<Planet, i32>,
}

impl Engine {
    /// +3 or -3 depending on where `planet` transits at `instant`, counted
    /// in houses from the natal moon sign.
    pub fn transit_modifier(&self, planet: Planet, natal_moon_sign: ZodiacSign, instant: DateTime<Utc>) -> i32 {
        let sign = ZodiacSign::from_longitude(self.sidereal_longitude(planet, instant));
        transit_house_bonus(house_number(sign, natal_moon_sign))
    }

    pub fn score_candidate(&self, planet: Planet, natal: &NatalChart, panchang: &DailyPanchang) -> i32 {
        let sunrise = panchang.sunrise.with_timezone(&Utc);
        role_bonus(planet, natal, panchang)
            + natal.strength_of(planet)
            + self.transit_modifier(planet, natal.moon_sign, sunrise)
    }

    pub fn select_ruling_planet(
        &self,
        natal: &NatalChart,
        panchang: &DailyPanchang,
        yesterday: Option<Planet>,
    ) -> Selection {
        let scored: Vec<(Planet, i32)> = candidates(natal, panchang)
            .into_iter()
            .map(|planet| (planet, self.score_candidate(planet, natal, panchang)))
            .collect();
        let ranked = rank_candidates(&scored);
        let nominal_top = ranked.first().map_or(panchang.weekday_lord, |&(planet, _)| planet);
        let (ruling_planet, continuity_applied) =
            apply_continuity(&ranked, yesterday, self.config.continuity_threshold).unwrap_or((nominal_top, false));

        debug!(
            "{}: ranked {:?}, yesterday {:?}, selected {}{}",
            panchang.date,
            ranked,
            yesterday,
            ruling_planet,
            if continuity_applied { " (continuity)" } else { "" }
        );

        Selection {
            ruling_planet,
            nominal_top,
            continuity_applied,
            scores: scored.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn natal() -> NatalChart {
        let date = NaiveDate::from_ymd_opt(1991, 6, 18).unwrap();
        Engine::default()
            .compute_natal_chart(date, "07:10", Location::new(11.2588, 75.7804), None)
            .unwrap()
    }

    fn panchang() -> DailyPanchang {
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        Engine::default().compute_daily_panchang(date, Location::delhi(), None).unwrap()
    }

    /// Sunday with Sun as today's nakshatra lord, natal Moon lord Moon and
    /// transit moon sign lord Mars.
    fn sunday_fixture(sun: i32, moon: i32, mars: i32) -> (NatalChart, DailyPanchang) {
        let mut natal = natal();
        natal.moon_nakshatra_lord = Planet::Moon;
        natal.natal_strength[Planet::Sun.index()] = sun;
        natal.natal_strength[Planet::Moon.index()] = moon;
        natal.natal_strength[Planet::Mars.index()] = mars;

        let mut panchang = panchang();
        panchang.weekday_lord = Planet::Sun;
        panchang.nakshatra_lord = Planet::Sun;
        panchang.moon_sign_lord = Planet::Mars;
        (natal, panchang)
    }

    #[test]
    fn test_sunday_with_sun_nakshatra_selects_sun() {
        let engine = Engine::default();
        let (natal, panchang) = sunday_fixture(10, -10, -10);
        assert_eq!(candidates(&natal, &panchang), vec![Planet::Sun, Planet::Moon, Planet::Mars]);

        let selection = engine.select_ruling_planet(&natal, &panchang, None);
        assert_eq!(selection.ruling_planet, Planet::Sun);
        assert!(!selection.continuity_applied);
        assert_eq!(selection.scores.len(), 3);

        let transit = engine.transit_modifier(Planet::Sun, natal.moon_sign, panchang.sunrise.with_timezone(&Utc));
        assert_eq!(selection.scores[&Planet::Sun], 55 + 10 + transit);
    }

    #[test]
    fn test_candidate_count_is_between_one_and_four() {
        let (mut natal, mut panchang) = sunday_fixture(0, 0, 0);
        natal.moon_nakshatra_lord = Planet::Sun;
        panchang.moon_sign_lord = Planet::Sun;
        assert_eq!(candidates(&natal, &panchang), vec![Planet::Sun]);
        assert_eq!(role_bonus(Planet::Sun, &natal, &panchang), 90);

        panchang.nakshatra_lord = Planet::Rahu;
        natal.moon_nakshatra_lord = Planet::Ketu;
        panchang.moon_sign_lord = Planet::Saturn;
        assert_eq!(candidates(&natal, &panchang).len(), 4);
    }

    #[test]
    fn test_ties_keep_role_priority() {
        let scored = [(Planet::Mars, 40), (Planet::Moon, 52), (Planet::Venus, 52), (Planet::Rahu, 52)];
        let ranked = rank_candidates(&scored);
        let order: Vec<Planet> = ranked.iter().map(|(p, _)| *p).collect();
        assert_eq!(order, vec![Planet::Moon, Planet::Venus, Planet::Rahu, Planet::Mars]);
    }

    #[test]
    fn test_continuity_threshold_edges() {
        let close = [(Planet::Sun, 50), (Planet::Moon, 39)];
        assert_eq!(apply_continuity(&close, Some(Planet::Moon), 12), Some((Planet::Moon, true)));

        let exact = [(Planet::Sun, 50), (Planet::Moon, 38)];
        assert_eq!(apply_continuity(&exact, Some(Planet::Moon), 12), Some((Planet::Sun, false)));

        assert_eq!(apply_continuity(&close, Some(Planet::Sun), 12), Some((Planet::Sun, false)));
        assert_eq!(apply_continuity(&close, Some(Planet::Saturn), 12), Some((Planet::Sun, false)));
        assert_eq!(apply_continuity(&close, None, 12), Some((Planet::Sun, false)));
        assert_eq!(apply_continuity(&[], Some(Planet::Sun), 12), None);
    }

    #[test]
    fn test_yesterday_within_threshold_is_kept() {
        // Sun 55 + t, Moon 20 + 30 + t: the gap is at most 11.
        let (natal, panchang) = sunday_fixture(0, 30, -10);
        let selection = Engine::default().select_ruling_planet(&natal, &panchang, Some(Planet::Moon));
        assert_eq!(selection.ruling_planet, Planet::Moon);
        assert_eq!(selection.continuity_applied, selection.nominal_top != Planet::Moon);
    }

    #[test]
    fn test_yesterday_far_behind_is_dropped() {
        let (natal, panchang) = sunday_fixture(0, -10, -10);
        let selection = Engine::default().select_ruling_planet(&natal, &panchang, Some(Planet::Moon));
        assert_eq!(selection.ruling_planet, Planet::Sun);
        assert!(!selection.continuity_applied);
    }

    #[test]
    fn test_yesterday_outside_candidates_is_ignored() {
        let (natal, panchang) = sunday_fixture(0, 30, -10);
        let with = Engine::default().select_ruling_planet(&natal, &panchang, Some(Planet::Saturn));
        let without = Engine::default().select_ruling_planet(&natal, &panchang, None);
        assert_eq!(with, without);
    }

    #[test]
    fn test_threshold_comes_from_config() {
        let (natal, panchang) = sunday_fixture(0, 30, -10);
        let strict = Engine::new(EngineConfig {
            continuity_threshold: 0,
            ..EngineConfig::default()
        });
        let selection = strict.select_ruling_planet(&natal, &panchang, Some(Planet::Moon));
        assert_eq!(selection.ruling_planet, selection.nominal_top);
    }

    #[test]
    fn test_transit_house_bonus_table() {
        let bonuses: Vec<i32> = (1..=12).map(transit_house_bonus).collect();
        assert_eq!(bonuses, vec![3, 0, 3, 0, 0, 3, 0, -3, 0, 3, 3, -3]);
    }
}
