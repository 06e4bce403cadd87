use drone_courier_core::CellCoord;
use drone_courier_world::Environment;

/// Estimate of the remaining cost from a cell to the leg goal.
///
/// Best-first search is optimal only when the estimate never exceeds the true
/// remaining cost.
pub trait Heuristic: std::fmt::Debug {
    /// Estimated cost of travelling from `from` to `goal`.
    fn estimate(&self, environment: &Environment, from: CellCoord, goal: CellCoord) -> f64;
}

/// Raw Manhattan distance to the goal.
///
/// Admissible whenever every move costs at least one unit, which holds for
/// high altitude in normal power mode. At low altitude or in battery-saver
/// mode it may overestimate; use [`ScaledManhattanHeuristic`] there when
/// optimality matters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManhattanHeuristic;

impl Heuristic for ManhattanHeuristic {
    fn estimate(&self, _environment: &Environment, from: CellCoord, goal: CellCoord) -> f64 {
        f64::from(from.manhattan_distance(goal))
    }
}

/// Manhattan distance scaled by the cheapest possible move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScaledManhattanHeuristic;

impl Heuristic for ScaledManhattanHeuristic {
    fn estimate(&self, environment: &Environment, from: CellCoord, goal: CellCoord) -> f64 {
        f64::from(from.manhattan_distance(goal)) * environment.min_step_cost()
    }
}

/// Constant zero estimate; turns best-first into uniform-cost search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _environment: &Environment, _from: CellCoord, _goal: CellCoord) -> f64 {
        0.0
    }
}
