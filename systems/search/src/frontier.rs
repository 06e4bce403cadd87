//! Priority-queue strategies over `(cell, battery)` states.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, HashSet},
    time::Instant,
};

use drone_courier_core::{CellCoord, SearchError};
use drone_courier_world::Environment;
use log::{debug, trace};

use crate::{
    heuristic::{Heuristic, ManhattanHeuristic, ZeroHeuristic},
    tuning::SearchTuning,
    LegPlan, LegRequest, SearchStrategy,
};

/// Best-first search ordered by path cost plus a heuristic estimate.
///
/// Ties on the combined priority are broken in insertion order.
#[derive(Clone, Debug, Default)]
pub struct BestFirst<H = ManhattanHeuristic> {
    heuristic: H,
    tuning: SearchTuning,
}

impl<H: Heuristic> BestFirst<H> {
    /// Creates the strategy with the provided heuristic.
    #[must_use]
    pub fn new(heuristic: H, tuning: SearchTuning) -> Self {
        Self { heuristic, tuning }
    }
}

impl<H: Heuristic> SearchStrategy for BestFirst<H> {
    fn name(&self) -> &'static str {
        "best-first"
    }

    fn find_path(
        &self,
        environment: &Environment,
        request: &LegRequest,
    ) -> Result<LegPlan, SearchError> {
        frontier_search(environment, request, &self.tuning, |cell| {
            self.heuristic.estimate(environment, cell, request.goal)
        })
    }
}

/// Uniform-cost search; expands states strictly by accumulated cost.
#[derive(Clone, Debug, Default)]
pub struct UniformCost {
    tuning: SearchTuning,
}

impl UniformCost {
    /// Creates the strategy.
    #[must_use]
    pub fn new(tuning: SearchTuning) -> Self {
        Self { tuning }
    }
}

impl SearchStrategy for UniformCost {
    fn name(&self) -> &'static str {
        "uniform-cost"
    }

    fn find_path(
        &self,
        environment: &Environment,
        request: &LegRequest,
    ) -> Result<LegPlan, SearchError> {
        frontier_search(environment, request, &self.tuning, |cell| {
            ZeroHeuristic.estimate(environment, cell, request.goal)
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct StateKey {
    cell: CellCoord,
    battery_units: i64,
}

#[derive(Clone, Copy, Debug)]
struct QueueEntry {
    priority: f64,
    sequence: u64,
    cost: f64,
    battery: f64,
    key: StateKey,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: lowest priority first, then oldest entry.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

fn frontier_search<F>(
    environment: &Environment,
    request: &LegRequest,
    tuning: &SearchTuning,
    estimate: F,
) -> Result<LegPlan, SearchError>
where
    F: Fn(CellCoord) -> f64,
{
    let started = Instant::now();
    let start_key = StateKey {
        cell: request.start,
        battery_units: tuning.battery_units(request.battery),
    };

    let mut open = BinaryHeap::new();
    let mut best_cost: HashMap<StateKey, f64> = HashMap::new();
    let mut came_from: HashMap<StateKey, StateKey> = HashMap::new();
    let mut closed: HashSet<StateKey> = HashSet::new();
    let mut sequence = 0_u64;
    let mut nodes_expanded = 0_usize;

    let _ = best_cost.insert(start_key, 0.0);
    open.push(QueueEntry {
        priority: estimate(request.start),
        sequence,
        cost: 0.0,
        battery: request.battery,
        key: start_key,
    });

    while let Some(entry) = open.pop() {
        if !closed.insert(entry.key) {
            continue;
        }
        nodes_expanded += 1;
        trace!(
            "expand {} battery {:.2} cost {:.2}",
            entry.key.cell,
            entry.battery,
            entry.cost
        );

        if entry.key.cell == request.goal {
            let path = reconstruct(&came_from, entry.key);
            debug!(
                "leg {} -> {} solved: {} cells, cost {:.2}, {} nodes",
                request.start,
                request.goal,
                path.len(),
                entry.cost,
                nodes_expanded
            );
            return Ok(LegPlan {
                path,
                cost: entry.cost,
                nodes_expanded,
                arrival_battery: entry.battery,
                elapsed: started.elapsed(),
            });
        }

        for neighbor in
            environment.neighbors(entry.key.cell, entry.battery, request.ignore_battery)
        {
            let battery =
                environment.arrive(neighbor.cell, (entry.battery - neighbor.cost).max(0.0));
            let key = StateKey {
                cell: neighbor.cell,
                battery_units: tuning.battery_units(battery),
            };
            if closed.contains(&key) {
                continue;
            }

            let cost = entry.cost + neighbor.cost;
            if best_cost.get(&key).is_some_and(|known| *known <= cost) {
                continue;
            }

            let _ = best_cost.insert(key, cost);
            let _ = came_from.insert(key, entry.key);
            sequence += 1;
            open.push(QueueEntry {
                priority: cost + estimate(neighbor.cell),
                sequence,
                cost,
                battery,
                key,
            });
        }
    }

    debug!(
        "leg {} -> {} exhausted after {} nodes",
        request.start, request.goal, nodes_expanded
    );
    Err(SearchError::Exhausted { nodes_expanded })
}

fn reconstruct(came_from: &HashMap<StateKey, StateKey>, goal: StateKey) -> Vec<CellCoord> {
    let mut path = vec![goal.cell];
    let mut current = goal;
    while let Some(parent) = came_from.get(&current) {
        path.push(parent.cell);
        current = *parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use drone_courier_core::{FlightConfig, FlightHeight, PowerMode, WeatherConditions};
    use drone_courier_world::{Grid, MissionConfig};

    fn environment(rows: &[&[&str]], flight: FlightConfig, battery: f64) -> Environment {
        let grid = Grid::parse(rows).expect("valid grid");
        let start = grid.start().expect("start marker");
        let goal = grid.delivery_points()[0].1;
        Environment::new(
            grid,
            WeatherConditions::calm(),
            MissionConfig::new(start, goal)
                .with_flight(flight)
                .with_battery(battery),
        )
    }

    #[test]
    fn queue_pops_lowest_priority_then_oldest() {
        let key = StateKey {
            cell: CellCoord::new(0, 0),
            battery_units: 0,
        };
        let entry = |priority, sequence| QueueEntry {
            priority,
            sequence,
            cost: 0.0,
            battery: 0.0,
            key,
        };
        let mut heap = BinaryHeap::from(vec![entry(2.0, 0), entry(1.0, 2), entry(1.0, 1)]);

        assert_eq!(heap.pop().map(|e| e.sequence), Some(1));
        assert_eq!(heap.pop().map(|e| e.sequence), Some(2));
        assert_eq!(heap.pop().map(|e| e.sequence), Some(0));
    }

    #[test]
    fn open_grid_path_is_shortest() {
        let env = environment(
            &[&["S", "0", "0"], &["0", "0", "0"], &["0", "0", "1"]],
            FlightConfig::default(),
            100.0,
        );
        let request = LegRequest::new(CellCoord::new(0, 0), CellCoord::new(2, 2), 100.0);

        for strategy in [
            &BestFirst::new(ManhattanHeuristic, SearchTuning::default()) as &dyn SearchStrategy,
            &UniformCost::default(),
        ] {
            let plan = strategy.find_path(&env, &request).expect("path exists");
            assert_eq!(plan.path.len(), 5);
            assert!((plan.cost - 3.2).abs() < 1e-9);
            assert_eq!(plan.path.first(), Some(&request.start));
            assert_eq!(plan.path.last(), Some(&request.goal));
        }
    }

    #[test]
    fn start_equal_to_goal_returns_single_cell() {
        let env = environment(&[&["S", "1"]], FlightConfig::default(), 100.0);
        let request = LegRequest::new(CellCoord::new(0, 0), CellCoord::new(0, 0), 100.0);
        let plan = UniformCost::default()
            .find_path(&env, &request)
            .expect("trivial path");
        assert_eq!(plan.path, vec![CellCoord::new(0, 0)]);
        assert!(plan.cost.abs() < f64::EPSILON);
        assert_eq!(plan.nodes_expanded, 1);
    }

    #[test]
    fn insufficient_battery_exhausts_search() {
        let env = environment(
            &[&["S", "0", "0", "0", "1"]],
            FlightConfig::new(FlightHeight::High, PowerMode::Normal),
            4.0,
        );
        let request = LegRequest::new(CellCoord::new(0, 0), CellCoord::new(4, 0), 4.0);

        let error = UniformCost::default()
            .find_path(&env, &request)
            .expect_err("battery too small");
        assert!(matches!(error, SearchError::Exhausted { .. }));

        let relaxed = UniformCost::default()
            .find_path(&env, &request.ignoring_battery())
            .expect("reachable without the energy filter");
        assert_eq!(relaxed.path.len(), 5);
        assert!(relaxed.arrival_battery >= 0.0);
    }
}
