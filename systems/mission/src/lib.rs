#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Mission planner that assembles a complete delivery round trip.
//!
//! A mission is an outbound leg to the delivery goal, a stationary delivery
//! dwell, an inbound leg back to the home base, and a stationary rest dwell.
//! Both legs are solved by the same [`SearchStrategy`]. When a leg fails, a
//! single diagnostic re-search with the energy filter disabled decides
//! whether the leg is blocked or merely battery-infeasible.

use std::{iter, time::Duration};

use drone_courier_core::{
    CellCoord, FailureDiagnosis, Leg, MissionError, SearchError, DELIVERY_DWELL_FRAMES,
    REST_DWELL_FRAMES,
};
use drone_courier_system_search::{LegPlan, LegRequest, SearchStrategy};
use drone_courier_world::Environment;
use log::{debug, info, warn};
use serde::Deserialize;

mod replay;

pub use replay::{DroneStatus, MissionReplay, ReplayFrame};

/// Mission planner tuning.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MissionTuning {
    /// Runs the diagnostic re-search for failed inbound legs as well.
    pub diagnose_inbound: bool,
}

impl Default for MissionTuning {
    fn default() -> Self {
        Self {
            diagnose_inbound: true,
        }
    }
}

/// Successfully planned round trip.
#[derive(Clone, Debug, PartialEq)]
pub struct MissionPlan {
    /// Every frame after the launch cell, dwell repeats included.
    pub path: Vec<CellCoord>,
    /// Outbound leg as returned by the strategy.
    pub outbound: LegPlan,
    /// Inbound leg as returned by the strategy.
    pub inbound: LegPlan,
    /// Battery carried into the inbound leg.
    pub battery_at_delivery: f64,
    /// Name of the strategy that solved both legs.
    pub strategy: &'static str,
}

impl MissionPlan {
    /// Realized cost of both legs; dwell frames cost nothing.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.outbound.cost + self.inbound.cost
    }

    /// States expanded across both legs.
    #[must_use]
    pub fn nodes_expanded(&self) -> usize {
        self.outbound.nodes_expanded + self.inbound.nodes_expanded
    }

    /// Wall-clock time spent searching both legs.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.outbound.elapsed + self.inbound.elapsed
    }

    /// Number of frames in the assembled path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Reports whether the assembled path has no frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Classifies why `request` failed under `strategy` with `cause`.
///
/// A failure at a depth, node or time limit is reported as resource
/// exhaustion without searching again. Otherwise the strategy is re-run once
/// with the energy filter disabled; success means the goal is reachable but
/// not with the available battery.
#[must_use]
pub fn classify_failure(
    strategy: &dyn SearchStrategy,
    environment: &Environment,
    request: &LegRequest,
    cause: &SearchError,
) -> FailureDiagnosis {
    let diagnosis = if cause.is_resource_limit() {
        FailureDiagnosis::ResourceExhausted
    } else {
        match strategy.find_path(environment, &request.ignoring_battery()) {
            Ok(_) => FailureDiagnosis::BatteryInfeasible,
            Err(error) if error.is_resource_limit() => FailureDiagnosis::ResourceExhausted,
            Err(_) => FailureDiagnosis::Blocked,
        }
    };

    warn!(
        "{} from {} to {} with battery {:.2}: {diagnosis}",
        strategy.name(),
        request.start,
        request.goal,
        request.battery
    );
    diagnosis
}

/// Plans round trips with a single strategy.
#[derive(Clone, Copy, Debug)]
pub struct MissionPlanner<'a> {
    strategy: &'a dyn SearchStrategy,
    tuning: &'a MissionTuning,
}

impl<'a> MissionPlanner<'a> {
    /// Creates a planner that solves both legs with `strategy`.
    #[must_use]
    pub fn new(strategy: &'a dyn SearchStrategy, tuning: &'a MissionTuning) -> Self {
        Self { strategy, tuning }
    }

    /// Plans the complete mission for the environment's agent.
    ///
    /// The returned path starts with the first move after the launch cell,
    /// so its length is `(outbound - 1) + 3 + (inbound - 1) + 5`. Any leg
    /// failure fails the whole mission.
    pub fn plan(&self, environment: &Environment) -> Result<MissionPlan, MissionError> {
        let agent = environment.agent();
        let goal = agent.goal();
        let home = agent.home_base();

        info!(
            "planning mission {} -> {goal} -> {home} with {}",
            agent.start(),
            self.strategy.name()
        );

        let outbound = self.solve_leg(
            environment,
            Leg::Outbound,
            LegRequest::new(agent.start(), goal, agent.battery()),
            true,
        )?;

        let battery_at_delivery = if environment.charging_entry(goal).is_some() {
            environment.max_battery()
        } else {
            outbound.arrival_battery
        };

        let inbound = self.solve_leg(
            environment,
            Leg::Inbound,
            LegRequest::new(goal, home, battery_at_delivery),
            self.tuning.diagnose_inbound,
        )?;

        let path = outbound
            .path
            .iter()
            .skip(1)
            .copied()
            .chain(iter::repeat(goal).take(usize::from(DELIVERY_DWELL_FRAMES)))
            .chain(inbound.path.iter().skip(1).copied())
            .chain(iter::repeat(home).take(usize::from(REST_DWELL_FRAMES)))
            .collect();

        let plan = MissionPlan {
            path,
            outbound,
            inbound,
            battery_at_delivery,
            strategy: self.strategy.name(),
        };

        info!(
            "mission planned with {}: {} frames, cost {:.2}, {} nodes",
            plan.strategy,
            plan.len(),
            plan.total_cost(),
            plan.nodes_expanded()
        );
        Ok(plan)
    }

    fn solve_leg(
        &self,
        environment: &Environment,
        leg: Leg,
        request: LegRequest,
        diagnose: bool,
    ) -> Result<LegPlan, MissionError> {
        debug!(
            "{leg} leg {} -> {} with battery {:.2}",
            request.start, request.goal, request.battery
        );

        self.strategy
            .find_path(environment, &request)
            .map_err(|cause| {
                let diagnosis = if diagnose {
                    classify_failure(self.strategy, environment, &request, &cause)
                } else {
                    FailureDiagnosis::Unclassified
                };
                info!("mission failed: {leg} leg {diagnosis} ({cause})");
                MissionError::LegFailed {
                    leg,
                    diagnosis,
                    cause,
                }
            })
    }
}

/// Plans a complete mission with default tuning.
pub fn plan_complete_mission(
    strategy: &dyn SearchStrategy,
    environment: &Environment,
) -> Result<MissionPlan, MissionError> {
    MissionPlanner::new(strategy, &MissionTuning::default()).plan(environment)
}
