#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Numeric statistics for planned paths and cross-strategy comparison.
//!
//! Nothing here formats text; adapters decide how to present the figures.

use std::time::Duration;

use drone_courier_core::{CellCoord, FlightConfig, DELIVERY_DWELL_FRAMES, REST_DWELL_FRAMES};
use drone_courier_system_mission::MissionPlan;
use drone_courier_system_search::LegPlan;
use drone_courier_world::{estimate_battery_usage, estimate_time};

mod metrics;

pub use metrics::{efficiency_ratio, straight_line_distance, turn_count};

/// Figures describing one planned path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathStatistics {
    /// Strategy that produced the path.
    pub strategy: &'static str,
    /// Number of cells in the path.
    pub path_length: usize,
    /// Manhattan distance between the path's endpoints.
    pub straight_line_distance: u32,
    /// Straight-line distance per path cell.
    pub efficiency_ratio: f64,
    /// Direction changes along the path.
    pub turns: usize,
    /// States expanded while searching.
    pub nodes_expanded: usize,
    /// Wall-clock search time.
    pub computation_time: Duration,
    /// Exact cost accumulated by the search.
    pub realized_cost: f64,
    /// Coarse battery estimate derived from the path length.
    pub estimated_battery: f64,
    /// Coarse flight time estimate, in seconds.
    pub estimated_time: f64,
}

impl PathStatistics {
    /// Statistics of a single leg.
    #[must_use]
    pub fn from_leg(strategy: &'static str, leg: &LegPlan, flight: FlightConfig) -> Self {
        Self::collect(
            strategy,
            &leg.path,
            leg.nodes_expanded,
            leg.elapsed,
            leg.cost,
            flight,
        )
    }

    /// Statistics of a complete mission path, dwell frames included.
    #[must_use]
    pub fn from_mission(plan: &MissionPlan, flight: FlightConfig) -> Self {
        Self::collect(
            plan.strategy,
            &plan.path,
            plan.nodes_expanded(),
            plan.elapsed(),
            plan.total_cost(),
            flight,
        )
    }

    fn collect(
        strategy: &'static str,
        path: &[CellCoord],
        nodes_expanded: usize,
        computation_time: Duration,
        realized_cost: f64,
        flight: FlightConfig,
    ) -> Self {
        Self {
            strategy,
            path_length: path.len(),
            straight_line_distance: straight_line_distance(path),
            efficiency_ratio: efficiency_ratio(path),
            turns: turn_count(path),
            nodes_expanded,
            computation_time,
            realized_cost,
            estimated_battery: estimate_battery_usage(path.len(), flight),
            estimated_time: estimate_time(path.len(), flight.height),
        }
    }
}

/// Best results among several strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Comparison<'a> {
    /// Shortest path.
    pub best_by_length: Option<&'a PathStatistics>,
    /// Fastest search.
    pub best_by_time: Option<&'a PathStatistics>,
    /// Highest efficiency ratio.
    pub best_by_efficiency: Option<&'a PathStatistics>,
}

/// Picks the best result per criterion; earlier results win ties.
#[must_use]
pub fn compare(results: &[PathStatistics]) -> Comparison<'_> {
    Comparison {
        best_by_length: best_by(results, |candidate, best| {
            candidate.path_length < best.path_length
        }),
        best_by_time: best_by(results, |candidate, best| {
            candidate.computation_time < best.computation_time
        }),
        best_by_efficiency: best_by(results, |candidate, best| {
            candidate.efficiency_ratio > best.efficiency_ratio
        }),
    }
}

fn best_by<F>(results: &[PathStatistics], better: F) -> Option<&PathStatistics>
where
    F: Fn(&PathStatistics, &PathStatistics) -> bool,
{
    results.iter().fold(None, |best, candidate| match best {
        Some(current) if !better(candidate, current) => Some(current),
        _ => Some(candidate),
    })
}

/// Frame counts per mission phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MissionBreakdown {
    /// Moves toward the delivery goal.
    pub outbound: usize,
    /// Delivery dwell frames.
    pub delivery: usize,
    /// Moves back to the home base.
    pub inbound: usize,
    /// Rest dwell frames.
    pub rest: usize,
}

impl MissionBreakdown {
    /// Total number of frames.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.outbound + self.delivery + self.inbound + self.rest
    }
}

/// Frame counts of `plan`, derived from its legs.
#[must_use]
pub fn mission_breakdown(plan: &MissionPlan) -> MissionBreakdown {
    MissionBreakdown {
        outbound: plan.outbound.path.len().saturating_sub(1),
        delivery: usize::from(DELIVERY_DWELL_FRAMES),
        inbound: plan.inbound.path.len().saturating_sub(1),
        rest: usize::from(REST_DWELL_FRAMES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(strategy: &'static str, length: usize, millis: u64, efficiency: f64) -> PathStatistics {
        PathStatistics {
            strategy,
            path_length: length,
            straight_line_distance: 0,
            efficiency_ratio: efficiency,
            turns: 0,
            nodes_expanded: 0,
            computation_time: Duration::from_millis(millis),
            realized_cost: 0.0,
            estimated_battery: 0.0,
            estimated_time: 0.0,
        }
    }

    #[test]
    fn comparison_picks_best_per_criterion() {
        let results = [
            stats("a", 9, 5, 0.4),
            stats("b", 7, 8, 0.6),
            stats("c", 7, 2, 0.6),
        ];
        let comparison = compare(&results);

        assert_eq!(comparison.best_by_length.map(|s| s.strategy), Some("b"));
        assert_eq!(comparison.best_by_time.map(|s| s.strategy), Some("c"));
        assert_eq!(comparison.best_by_efficiency.map(|s| s.strategy), Some("b"));
    }

    #[test]
    fn empty_comparison_has_no_winner() {
        assert_eq!(compare(&[]), Comparison::default());
    }

    #[test]
    fn leg_statistics_include_estimates() {
        let leg = LegPlan {
            path: vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(1, 1),
            ],
            cost: 1.6,
            nodes_expanded: 4,
            arrival_battery: 98.4,
            elapsed: Duration::from_micros(10),
        };
        let statistics = PathStatistics::from_leg("uniform-cost", &leg, FlightConfig::default());

        assert_eq!(statistics.path_length, 3);
        assert_eq!(statistics.turns, 1);
        assert_eq!(statistics.straight_line_distance, 2);
        assert!((statistics.estimated_battery - 4.2).abs() < 1e-9);
        assert!((statistics.estimated_time - 10.8).abs() < 1e-9);
    }
}
