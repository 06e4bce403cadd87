//! Per-move cost model and coarse reporting estimators.
//!
//! [`move_cost`] is the exact per-edge cost consumed by the search loop. The
//! estimators below it approximate whole-path battery and time usage from a
//! path length alone and exist for reporting only.

use drone_courier_core::{CellCode, FlightConfig, FlightHeight, PowerMode};

const BASE_STEP_COST: f64 = 1.0;
const HIGH_ALTITUDE_MULTIPLIER: f64 = 1.5;
const LOW_ALTITUDE_MULTIPLIER: f64 = 0.8;
const ELEVATED_OVERFLIGHT_MULTIPLIER: f64 = 1.2;
const WIND_MULTIPLIER: f64 = 2.0;
const BATTERY_SAVER_MULTIPLIER: f64 = 0.7;

const BATTERY_UNITS_PER_STEP: f64 = 2.0;
const SECONDS_PER_STEP: f64 = 3.0;

/// Cost of entering a cell classified as `destination`.
///
/// The result is the product of the base cost, the altitude multiplier, the
/// elevated-area surcharge (high altitude only), the wind surcharge and the
/// battery-saver discount.
#[must_use]
pub fn move_cost(destination: CellCode, config: FlightConfig) -> f64 {
    let mut cost = BASE_STEP_COST * altitude_multiplier(config.height);

    if destination == CellCode::ElevatedArea && config.height == FlightHeight::High {
        cost *= ELEVATED_OVERFLIGHT_MULTIPLIER;
    }

    if destination == CellCode::Wind {
        cost *= WIND_MULTIPLIER;
    }

    if config.power == PowerMode::BatterySaver {
        cost *= BATTERY_SAVER_MULTIPLIER;
    }

    cost
}

/// Smallest cost any single move can have under `config`.
#[must_use]
pub fn min_step_cost(config: FlightConfig) -> f64 {
    move_cost(CellCode::Free, config)
}

/// Coarse battery usage estimate for a path of `path_length` cells.
#[must_use]
pub fn estimate_battery_usage(path_length: usize, config: FlightConfig) -> f64 {
    let mut usage = path_length as f64 * BATTERY_UNITS_PER_STEP;

    usage *= match config.height {
        FlightHeight::High => 1.6,
        FlightHeight::Low => 0.7,
    };

    if config.power == PowerMode::BatterySaver {
        usage *= 0.6;
    }

    usage
}

/// Coarse flight time estimate, in seconds, for a path of `path_length` cells.
#[must_use]
pub fn estimate_time(path_length: usize, height: FlightHeight) -> f64 {
    let seconds = path_length as f64 * SECONDS_PER_STEP;
    match height {
        FlightHeight::High => seconds * 0.7,
        FlightHeight::Low => seconds * 1.2,
    }
}

fn altitude_multiplier(height: FlightHeight) -> f64 {
    match height {
        FlightHeight::High => HIGH_ALTITUDE_MULTIPLIER,
        FlightHeight::Low => LOW_ALTITUDE_MULTIPLIER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOW: FlightConfig = FlightConfig::new(FlightHeight::Low, PowerMode::Normal);
    const HIGH: FlightConfig = FlightConfig::new(FlightHeight::High, PowerMode::Normal);
    const LOW_SAVER: FlightConfig = FlightConfig::new(FlightHeight::Low, PowerMode::BatterySaver);
    const HIGH_SAVER: FlightConfig =
        FlightConfig::new(FlightHeight::High, PowerMode::BatterySaver);

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn altitude_scales_base_cost() {
        approx(move_cost(CellCode::Free, LOW), 0.8);
        approx(move_cost(CellCode::Free, HIGH), 1.5);
    }

    #[test]
    fn elevated_surcharge_applies_only_at_high_altitude() {
        approx(move_cost(CellCode::ElevatedArea, HIGH), 1.5 * 1.2);
        approx(move_cost(CellCode::ElevatedArea, LOW), 0.8);
    }

    #[test]
    fn wind_and_saver_multiply() {
        approx(move_cost(CellCode::Wind, LOW), 1.6);
        approx(move_cost(CellCode::Wind, LOW_SAVER), 0.8 * 2.0 * 0.7);
        approx(move_cost(CellCode::Free, LOW_SAVER), 0.56);
    }

    #[test]
    fn saver_with_nominal_high_keeps_elevated_surcharge_in_product() {
        approx(move_cost(CellCode::ElevatedArea, HIGH_SAVER), 1.5 * 1.2 * 0.7);
    }

    #[test]
    fn min_step_cost_matches_free_cell() {
        approx(min_step_cost(LOW_SAVER), 0.56);
        approx(min_step_cost(HIGH), 1.5);
    }

    #[test]
    fn estimators_follow_reporting_factors() {
        approx(estimate_battery_usage(10, HIGH), 32.0);
        approx(estimate_battery_usage(10, LOW_SAVER), 8.4);
        approx(estimate_time(10, FlightHeight::High), 21.0);
        approx(estimate_time(10, FlightHeight::Low), 36.0);
    }
}
