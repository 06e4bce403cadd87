//! Frame-by-frame replay of a planned mission.

use drone_courier_core::{CellCoord, MissionPhase, PhaseEvent};
use drone_courier_world::Environment;
use log::{debug, warn};

use crate::MissionPlan;

/// Operational status of the replayed drone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DroneStatus {
    /// Flying or dwelling with charge left.
    Active,
    /// Sitting on a charging position.
    Charging,
    /// The battery ran dry away from a charger.
    OutOfBattery,
    /// The round trip finished.
    Completed,
}

/// State of the drone after one replayed frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReplayFrame {
    /// Position occupied during the frame.
    pub position: CellCoord,
    /// Mission phase after the frame's tick.
    pub phase: MissionPhase,
    /// Battery level after the frame.
    pub battery: f64,
    /// Drone status after the frame.
    pub status: DroneStatus,
    /// Phase event emitted by the tick, if any.
    pub event: Option<PhaseEvent>,
    /// Manhattan distance to the goal of the phase after the tick.
    pub distance_to_target: u32,
}

/// Walks a mission path, moving the drone and ticking the phase machine.
///
/// Each frame drains the move cost from the battery, restores it on charging
/// positions, and feeds the new position to [`Environment::tick`]. The replay
/// owns its environment so the mission record it mutates is never shared.
#[derive(Clone, Debug)]
pub struct MissionReplay {
    environment: Environment,
    path: Vec<CellCoord>,
    cursor: usize,
    position: CellCoord,
    battery: f64,
    status: DroneStatus,
    distance_traveled: u32,
}

impl MissionReplay {
    /// Prepares a replay of `plan` starting from the agent's launch cell.
    #[must_use]
    pub fn new(environment: Environment, plan: &MissionPlan) -> Self {
        let agent = environment.agent();
        let position = agent.start();
        let battery = agent.battery();

        Self {
            path: plan.path.clone(),
            cursor: 0,
            position,
            battery,
            status: DroneStatus::Active,
            distance_traveled: 0,
            environment,
        }
    }

    /// Environment whose mission record the replay advances.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Current position of the drone.
    #[must_use]
    pub fn position(&self) -> CellCoord {
        self.position
    }

    /// Current battery level of the drone.
    #[must_use]
    pub fn battery(&self) -> f64 {
        self.battery
    }

    /// Current status of the drone.
    #[must_use]
    pub fn status(&self) -> DroneStatus {
        self.status
    }

    /// Number of moves between distinct cells so far.
    #[must_use]
    pub fn distance_traveled(&self) -> u32 {
        self.distance_traveled
    }

    /// Frames left to replay.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.path.len() - self.cursor
    }

    /// Replays every remaining frame.
    pub fn run(&mut self) -> Vec<ReplayFrame> {
        self.by_ref().collect()
    }

    fn advance(&mut self, next: CellCoord) -> ReplayFrame {
        if next != self.position {
            let cost = self.environment.move_cost(next).unwrap_or(0.0);
            self.battery = (self.battery - cost).max(0.0);
            self.distance_traveled += 1;
            self.position = next;
        }

        if self.environment.is_charging_position(next) {
            self.battery = self.environment.max_battery();
            self.status = DroneStatus::Charging;
        } else if self.battery <= 0.0 {
            if self.status != DroneStatus::OutOfBattery {
                warn!("drone ran out of battery at {next}");
            }
            self.status = DroneStatus::OutOfBattery;
        } else {
            self.status = DroneStatus::Active;
        }

        let event = self.environment.tick(next);
        if event == Some(PhaseEvent::MissionCompleted) {
            self.battery = self.environment.agent().battery();
            self.status = DroneStatus::Completed;
            debug!(
                "replay finished after {} moves at {next}",
                self.distance_traveled
            );
        }

        ReplayFrame {
            position: next,
            phase: self.environment.agent().phase(),
            battery: self.battery,
            status: self.status,
            event,
            distance_to_target: self.environment.heuristic(next),
        }
    }
}

impl Iterator for MissionReplay {
    type Item = ReplayFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let next = *self.path.get(self.cursor)?;
        self.cursor += 1;
        Some(self.advance(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan_complete_mission;
    use drone_courier_core::WeatherConditions;
    use drone_courier_system_search::{LegPlan, UniformCost};
    use drone_courier_world::{Grid, MissionConfig};
    use std::time::Duration;

    fn empty_leg() -> LegPlan {
        LegPlan {
            path: Vec::new(),
            cost: 0.0,
            nodes_expanded: 0,
            arrival_battery: 0.0,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn replay_walks_phases_and_completes() {
        let grid = Grid::parse(&[["S", "0", "0"], ["0", "0", "1"]]).expect("valid grid");
        let home = CellCoord::new(0, 0);
        let goal = CellCoord::new(2, 1);
        let env = Environment::new(
            grid,
            WeatherConditions::calm(),
            MissionConfig::new(home, goal).with_battery(50.0),
        );
        let plan = plan_complete_mission(&UniformCost::default(), &env).expect("mission");

        let mut replay = MissionReplay::new(env, &plan);
        let frames = replay.run();

        assert_eq!(frames.len(), plan.len());
        assert_eq!(replay.remaining(), 0);
        assert_eq!(replay.distance_traveled(), 6);
        assert_eq!(replay.status(), DroneStatus::Completed);
        assert!(replay.environment().agent().mission_complete());

        let events: Vec<_> = frames.iter().filter_map(|frame| frame.event).collect();
        assert_eq!(events.first(), Some(&PhaseEvent::DeliveryStarted));
        assert_eq!(events.last(), Some(&PhaseEvent::MissionCompleted));

        let arrival = frames[2];
        assert_eq!(arrival.position, goal);
        assert_eq!(arrival.status, DroneStatus::Charging);
        assert!((arrival.battery - 100.0).abs() < f64::EPSILON);
        assert_eq!(arrival.distance_to_target, 0);

        let first = frames[0];
        assert!((first.battery - 49.2).abs() < 1e-9);
        assert_eq!(first.phase, MissionPhase::Outbound);
        assert_eq!(first.distance_to_target, 2);

        let departure = frames[5];
        assert_eq!(departure.phase, MissionPhase::Inbound);
        assert_eq!(departure.distance_to_target, departure.position.manhattan_distance(home));
    }

    #[test]
    fn drained_battery_is_reported() {
        let grid = Grid::parse(&[["S", "0", "0", "1"]]).expect("valid grid");
        let env = Environment::new(
            grid,
            WeatherConditions::calm(),
            MissionConfig::new(CellCoord::new(0, 0), CellCoord::new(3, 0)).with_battery(1.0),
        );
        let plan = MissionPlan {
            path: vec![CellCoord::new(1, 0), CellCoord::new(2, 0)],
            outbound: empty_leg(),
            inbound: empty_leg(),
            battery_at_delivery: 0.0,
            strategy: "scripted",
        };

        let frames = MissionReplay::new(env, &plan).run();
        assert_eq!(frames[0].status, DroneStatus::Active);
        assert_eq!(frames[1].status, DroneStatus::OutOfBattery);
        assert!(frames[1].battery.abs() < f64::EPSILON);
    }
}
