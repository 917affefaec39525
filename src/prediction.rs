use super::*;
use crate::hora::hora_windows;

/// Packages the lucky attributes of `planet` with its hora windows and the
/// selector's score map.
pub fn assemble(planet: Planet, hora_windows: Vec<HoraWindow>, scores: BTreeMap<Planet, i32>) -> PredictionResult {
    let direction = planet.direction();
    PredictionResult {
        ruling_planet: planet,
        lucky_number: planet.lucky_number(),
        lucky_color: planet.lucky_color(),
        lucky_direction: direction,
        lucky_direction_hi: direction.hindi().to_string(),
        hora_windows,
        mantra: planet.mantra(),
        scores,
    }
}

impl Engine {
    /// Full daily pipeline for one person: selection, hora windows and
    /// lucky attributes. Deterministic in its inputs.
    pub fn generate_daily_prediction(
        &self,
        natal: &NatalChart,
        panchang: &DailyPanchang,
        yesterday: Option<Planet>,
    ) -> PredictionResult {
        let selection = self.select_ruling_planet(natal, panchang, yesterday);
        let windows = hora_windows(selection.ruling_planet, panchang.sunrise, panchang.sunset);
        assemble(selection.ruling_planet, windows, selection.scores)
    }
}
