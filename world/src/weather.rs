//! One-shot weather overlay derived from the original grid.

use drone_courier_core::{CellCode, WeatherConditions};
use log::debug;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::Grid;

const WIND_COVERAGE_FACTOR: f64 = 0.4;

/// Number of free cells turned into wind cells for the given inputs.
///
/// Returns zero when the intensity does not exceed the activation threshold
/// or there are no candidates; otherwise at least one cell is affected.
#[must_use]
pub fn wind_cell_count(candidates: usize, weather: &WeatherConditions) -> usize {
    if !weather.is_windy() || candidates == 0 {
        return 0;
    }

    let scaled = (candidates as f64 * weather.wind_intensity * WIND_COVERAGE_FACTOR).floor();
    (scaled as usize).max(1).min(candidates)
}

/// Derives the weather overlay for `original`.
///
/// Free cells are collected in row-major order and a seeded sample of them
/// is reclassified as wind. Identical grids and conditions always produce the
/// same overlay.
pub(crate) fn apply_weather(original: &Grid, weather: &WeatherConditions) -> Grid {
    let mut overlay = original.clone();
    let candidates = original.cells_where(|code| code.is_free());
    let count = wind_cell_count(candidates.len(), weather);

    debug!(
        "weather overlay: wind intensity {:.2}, {} candidates, {} wind cells",
        weather.wind_intensity,
        candidates.len(),
        count
    );

    if count == 0 {
        return overlay;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(weather.seed);
    for &cell in candidates.choose_multiple(&mut rng, count) {
        overlay.set(cell, CellCode::Wind);
    }

    overlay
}
