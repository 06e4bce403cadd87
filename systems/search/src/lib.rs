#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Search strategies that plan a single leg over `(cell, battery)` states.
//!
//! Every strategy implements [`SearchStrategy`] and answers the same
//! question: the cheapest path between two cells of an [`Environment`] that
//! the agent can fly with the battery it has. Moving costs the environment's
//! per-edge move cost, and arriving at a charging position restores the
//! battery to its maximum. [`BestFirst`] and [`UniformCost`] share the
//! frontier machinery; [`IterativeDeepening`] ignores the battery dimension
//! and is bounded by depth, node, and wall-clock budgets.

use std::{fmt, str::FromStr, time::Duration};

use drone_courier_core::{CellCoord, SearchError};
use drone_courier_world::Environment;
use serde::Deserialize;

mod frontier;
mod heuristic;
mod iterative;
mod tuning;

pub use frontier::{BestFirst, UniformCost};
pub use heuristic::{Heuristic, ManhattanHeuristic, ScaledManhattanHeuristic, ZeroHeuristic};
pub use iterative::IterativeDeepening;
pub use tuning::{DepthTier, IterativeDeepeningTuning, SearchTuning};

/// Inputs of a single leg search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegRequest {
    /// Cell the leg starts from.
    pub start: CellCoord,
    /// Cell the leg must reach.
    pub goal: CellCoord,
    /// Battery available at the start cell.
    pub battery: f64,
    /// Skips the energy filter on neighbors; used only to classify failures.
    pub ignore_battery: bool,
}

impl LegRequest {
    /// Creates a battery-constrained request.
    #[must_use]
    pub const fn new(start: CellCoord, goal: CellCoord, battery: f64) -> Self {
        Self {
            start,
            goal,
            battery,
            ignore_battery: false,
        }
    }

    /// Copy of the request with the energy filter disabled.
    #[must_use]
    pub const fn ignoring_battery(mut self) -> Self {
        self.ignore_battery = true;
        self
    }
}

/// Successful result of a leg search.
#[derive(Clone, Debug, PartialEq)]
pub struct LegPlan {
    /// Cells from the request's start to its goal, both included.
    pub path: Vec<CellCoord>,
    /// Realized cost of the path.
    pub cost: f64,
    /// Number of states expanded by the search.
    pub nodes_expanded: usize,
    /// Battery left on arrival at the goal.
    pub arrival_battery: f64,
    /// Wall-clock time spent searching.
    pub elapsed: Duration,
}

/// Planner that solves a single leg.
pub trait SearchStrategy: fmt::Debug {
    /// Human-readable strategy name.
    fn name(&self) -> &'static str;

    /// Finds a path for the request over the environment.
    fn find_path(&self, environment: &Environment, request: &LegRequest)
        -> Result<LegPlan, SearchError>;
}

/// Tuning shared by every strategy.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Frontier strategy tuning.
    pub search: SearchTuning,
    /// Iterative-deepening budgets.
    pub iterative_deepening: IterativeDeepeningTuning,
}

/// Selector for the available strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Heuristic-guided best-first search.
    BestFirst,
    /// Uniform-cost search.
    UniformCost,
    /// Iterative-deepening depth-first search.
    IterativeDeepening,
}

impl StrategyKind {
    /// Every strategy, in presentation order.
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::BestFirst,
        StrategyKind::UniformCost,
        StrategyKind::IterativeDeepening,
    ];

    /// Stable identifier of the strategy.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BestFirst => "best-first",
            Self::UniformCost => "uniform-cost",
            Self::IterativeDeepening => "iterative-deepening",
        }
    }

    /// Instantiates the strategy with the provided tuning.
    #[must_use]
    pub fn build(self, tuning: &Tuning) -> Box<dyn SearchStrategy> {
        match self {
            Self::BestFirst => Box::new(BestFirst::new(ManhattanHeuristic, tuning.search.clone())),
            Self::UniformCost => Box::new(UniformCost::new(tuning.search.clone())),
            Self::IterativeDeepening => Box::new(IterativeDeepening::new(
                tuning.iterative_deepening.clone(),
            )),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown search strategy `{}`", self.0)
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == value)
            .ok_or_else(|| UnknownStrategy(value.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names_round_trip_through_from_str() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.name().parse::<StrategyKind>(), Ok(kind));
        }
        assert!("dfs".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn built_strategies_report_their_names() {
        let tuning = Tuning::default();
        for kind in StrategyKind::ALL {
            assert_eq!(kind.build(&tuning).name(), kind.name());
        }
    }

    #[test]
    fn ignoring_battery_only_flips_the_flag() {
        let request = LegRequest::new(CellCoord::new(0, 0), CellCoord::new(1, 1), 5.0);
        let relaxed = request.ignoring_battery();
        assert!(relaxed.ignore_battery);
        assert_eq!(relaxed.start, request.start);
        assert_eq!(relaxed.goal, request.goal);
    }
}
