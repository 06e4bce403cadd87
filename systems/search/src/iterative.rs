//! Iterative-deepening depth-first search.

use std::{
    collections::HashSet,
    time::{Duration, Instant},
};

use drone_courier_core::{CellCoord, SearchError};
use drone_courier_world::Environment;
use log::{debug, trace};

use crate::{tuning::IterativeDeepeningTuning, LegPlan, LegRequest, SearchStrategy};

/// Depth-first search with an increasing move bound.
///
/// The battery dimension is ignored: neighbors are queried with a full
/// battery and never filtered by energy. The realized cost and arrival
/// battery are computed from the returned path afterwards. Every iteration
/// keeps a visited set per branch, so siblings never block each other.
#[derive(Clone, Debug, Default)]
pub struct IterativeDeepening {
    tuning: IterativeDeepeningTuning,
}

impl IterativeDeepening {
    /// Creates the strategy with the provided budgets.
    #[must_use]
    pub fn new(tuning: IterativeDeepeningTuning) -> Self {
        Self { tuning }
    }
}

impl SearchStrategy for IterativeDeepening {
    fn name(&self) -> &'static str {
        "iterative-deepening"
    }

    fn find_path(
        &self,
        environment: &Environment,
        request: &LegRequest,
    ) -> Result<LegPlan, SearchError> {
        let depth_limit = self.tuning.depth_limit_for(environment.dimensions());
        let mut search = DepthSearch {
            environment,
            goal: request.goal,
            started: Instant::now(),
            time_budget: self.tuning.time_budget(),
            node_budget: self.tuning.node_budget,
            nodes_expanded: 0,
        };

        for depth in 0..depth_limit {
            trace!(
                "iterative deepening {} -> {}: depth {depth}, {} nodes so far",
                request.start,
                request.goal,
                search.nodes_expanded
            );

            let mut path = vec![request.start];
            let visited = HashSet::from([request.start]);
            if search.descend(request.start, depth, &visited, &mut path)? {
                debug!(
                    "leg {} -> {} solved at depth {depth}: {} nodes",
                    request.start, request.goal, search.nodes_expanded
                );
                return Ok(LegPlan {
                    cost: environment.path_cost(&path),
                    arrival_battery: environment.drain_along(&path, request.battery),
                    nodes_expanded: search.nodes_expanded,
                    elapsed: search.started.elapsed(),
                    path,
                });
            }
        }

        debug!(
            "leg {} -> {} hit depth limit {depth_limit}",
            request.start, request.goal
        );
        Err(SearchError::DepthLimit {
            depth: depth_limit as usize,
            nodes_expanded: search.nodes_expanded,
        })
    }
}

struct DepthSearch<'a> {
    environment: &'a Environment,
    goal: CellCoord,
    started: Instant,
    time_budget: Duration,
    node_budget: usize,
    nodes_expanded: usize,
}

impl DepthSearch<'_> {
    fn descend(
        &mut self,
        cell: CellCoord,
        remaining: u32,
        visited: &HashSet<CellCoord>,
        path: &mut Vec<CellCoord>,
    ) -> Result<bool, SearchError> {
        if cell == self.goal {
            return Ok(true);
        }
        if remaining == 0 {
            return Ok(false);
        }

        self.expand()?;

        let battery = self.environment.max_battery();
        for neighbor in self.environment.neighbors(cell, battery, true) {
            if visited.contains(&neighbor.cell) {
                continue;
            }

            let mut branch = visited.clone();
            let _ = branch.insert(neighbor.cell);
            path.push(neighbor.cell);
            if self.descend(neighbor.cell, remaining - 1, &branch, path)? {
                return Ok(true);
            }
            let _ = path.pop();
        }

        Ok(false)
    }

    fn expand(&mut self) -> Result<(), SearchError> {
        if self.nodes_expanded >= self.node_budget {
            return Err(SearchError::NodeBudget {
                nodes_expanded: self.nodes_expanded,
            });
        }

        let elapsed = self.started.elapsed();
        if elapsed > self.time_budget {
            return Err(SearchError::TimeBudget {
                elapsed,
                nodes_expanded: self.nodes_expanded,
            });
        }

        self.nodes_expanded += 1;
        Ok(())
    }
}
