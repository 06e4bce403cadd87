#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Environment model for the drone courier planner.
//!
//! The [`Terrain`] bundles the immutable original grid, the weather overlay
//! derived from it, and the charging and delivery registries. Terrain is
//! read-only after construction and may be shared across agents. An
//! [`Environment`] pairs a terrain with one agent's flight configuration and
//! [`MissionRecord`], and answers the questions every search strategy asks:
//! which neighbors are reachable, what a move costs, and where the battery is
//! restored.

use std::sync::Arc;

use drone_courier_core::{
    CellCode, CellCoord, ChargingEntry, Direction, FlightConfig, FlightHeight, MissionPhase,
    PhaseEvent, PowerMode, WeatherConditions, DEFAULT_MAX_BATTERY,
};
use log::debug;

mod cost;
mod grid;
mod registry;
mod weather;

pub use cost::{estimate_battery_usage, estimate_time, min_step_cost, move_cost};
pub use grid::Grid;
pub use registry::{ChargingRegistry, DeliveryRegistry};
pub use weather::wind_cell_count;

/// Immutable terrain shared by every agent planned over the same map.
#[derive(Clone, Debug, PartialEq)]
pub struct Terrain {
    original: Grid,
    overlay: Grid,
    weather: WeatherConditions,
    charging: ChargingRegistry,
    deliveries: DeliveryRegistry,
}

impl Terrain {
    /// Builds the terrain, deriving the weather overlay exactly once.
    #[must_use]
    pub fn new(original: Grid, weather: WeatherConditions) -> Self {
        let overlay = weather::apply_weather(&original, &weather);
        let charging = ChargingRegistry::from_grid(&original);
        let deliveries = DeliveryRegistry::from_grid(&original);

        debug!(
            "terrain ready: {}x{} grid, {} charging entries, {} delivery points",
            original.columns(),
            original.rows(),
            charging.len(),
            deliveries.len()
        );

        Self {
            original,
            overlay,
            weather,
            charging,
            deliveries,
        }
    }

    /// Grid exactly as supplied by the caller.
    #[must_use]
    pub fn original(&self) -> &Grid {
        &self.original
    }

    /// Grid after the weather overlay was applied.
    #[must_use]
    pub fn overlay(&self) -> &Grid {
        &self.overlay
    }

    /// Weather conditions the overlay was derived from.
    #[must_use]
    pub fn weather(&self) -> &WeatherConditions {
        &self.weather
    }

    /// Charging registry, delivery points included.
    #[must_use]
    pub fn charging(&self) -> &ChargingRegistry {
        &self.charging
    }

    /// Delivery point registry.
    #[must_use]
    pub fn deliveries(&self) -> &DeliveryRegistry {
        &self.deliveries
    }
}

/// Per-agent mission parameters supplied at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MissionConfig {
    /// Launch cell; also the home base.
    pub start: CellCoord,
    /// Delivery goal.
    pub goal: CellCoord,
    /// Flight configuration used for every cost and feasibility query.
    pub flight: FlightConfig,
    /// Battery capacity.
    pub max_battery: f64,
    /// Battery level at launch.
    pub battery: f64,
}

impl MissionConfig {
    /// Creates a configuration with default flight settings and a full battery.
    #[must_use]
    pub const fn new(start: CellCoord, goal: CellCoord) -> Self {
        Self {
            start,
            goal,
            flight: FlightConfig::new(FlightHeight::Low, PowerMode::Normal),
            max_battery: DEFAULT_MAX_BATTERY,
            battery: DEFAULT_MAX_BATTERY,
        }
    }

    /// Overrides the flight configuration.
    #[must_use]
    pub const fn with_flight(mut self, flight: FlightConfig) -> Self {
        self.flight = flight;
        self
    }

    /// Overrides the battery level at launch.
    #[must_use]
    pub const fn with_battery(mut self, battery: f64) -> Self {
        self.battery = battery;
        self
    }

    /// Overrides the battery capacity; the launch level is capped to it.
    #[must_use]
    pub fn with_max_battery(mut self, max_battery: f64) -> Self {
        self.max_battery = max_battery;
        self.battery = self.battery.min(max_battery);
        self
    }
}

/// Mission bookkeeping for the single planned agent.
///
/// Only [`Environment::tick`] mutates the record after construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MissionRecord {
    start: CellCoord,
    goal: CellCoord,
    home_base: CellCoord,
    battery: f64,
    max_battery: f64,
    phase: MissionPhase,
    mission_complete: bool,
}

impl MissionRecord {
    fn from_config(config: &MissionConfig) -> Self {
        Self {
            start: config.start,
            goal: config.goal,
            home_base: config.start,
            battery: config.battery,
            max_battery: config.max_battery,
            phase: MissionPhase::Outbound,
            mission_complete: false,
        }
    }

    /// Launch cell.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Delivery goal.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Home base; always equal to the start cell.
    #[must_use]
    pub const fn home_base(&self) -> CellCoord {
        self.home_base
    }

    /// Battery level recorded for the agent.
    #[must_use]
    pub const fn battery(&self) -> f64 {
        self.battery
    }

    /// Battery capacity.
    #[must_use]
    pub const fn max_battery(&self) -> f64 {
        self.max_battery
    }

    /// Current mission phase.
    #[must_use]
    pub const fn phase(&self) -> MissionPhase {
        self.phase
    }

    /// Remaining delivery ticks.
    #[must_use]
    pub const fn delivery_countdown(&self) -> u8 {
        self.phase.delivery_countdown()
    }

    /// Remaining rest ticks.
    #[must_use]
    pub const fn rest_countdown(&self) -> u8 {
        self.phase.rest_countdown()
    }

    /// Reports whether the round trip finished.
    #[must_use]
    pub const fn mission_complete(&self) -> bool {
        self.mission_complete
    }

    /// Cell the current phase is heading to.
    #[must_use]
    pub const fn current_goal(&self) -> CellCoord {
        self.phase.target(self.goal, self.home_base)
    }

    fn tick(&mut self, position: CellCoord) -> Option<PhaseEvent> {
        let transition = self.phase.advance(position, self.goal, self.home_base);
        self.phase = transition.phase;

        if transition.event == Some(PhaseEvent::MissionCompleted) {
            self.battery = self.max_battery;
            self.mission_complete = true;
        }

        transition.event
    }
}

/// Reachable neighbor together with the cost of moving into it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    /// Destination cell.
    pub cell: CellCoord,
    /// Cost of the move.
    pub cost: f64,
}

/// Iterator over the feasible neighbors of a cell.
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
    buffer: [Option<Neighbor>; 4],
    len: usize,
    cursor: usize,
}

impl Neighbors {
    fn push(&mut self, neighbor: Neighbor) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(neighbor);
            self.len += 1;
        }
    }
}

impl Iterator for Neighbors {
    type Item = Neighbor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}

/// Cost and feasibility oracle for one agent.
#[derive(Clone, Debug)]
pub struct Environment {
    terrain: Arc<Terrain>,
    flight: FlightConfig,
    agent: MissionRecord,
}

impl Environment {
    /// Builds an environment, deriving a fresh terrain from `grid` and `weather`.
    #[must_use]
    pub fn new(grid: Grid, weather: WeatherConditions, config: MissionConfig) -> Self {
        Self::with_terrain(Arc::new(Terrain::new(grid, weather)), config)
    }

    /// Builds an environment over an already derived terrain.
    #[must_use]
    pub fn with_terrain(terrain: Arc<Terrain>, config: MissionConfig) -> Self {
        Self {
            terrain,
            flight: config.flight,
            agent: MissionRecord::from_config(&config),
        }
    }

    /// Shared terrain.
    #[must_use]
    pub fn terrain(&self) -> &Arc<Terrain> {
        &self.terrain
    }

    /// Flight configuration of the agent.
    #[must_use]
    pub const fn flight(&self) -> FlightConfig {
        self.flight
    }

    /// Mission record of the agent.
    #[must_use]
    pub const fn agent(&self) -> &MissionRecord {
        &self.agent
    }

    /// Provides `(columns, rows)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.terrain.overlay.dimensions()
    }

    /// Battery capacity of the agent.
    #[must_use]
    pub const fn max_battery(&self) -> f64 {
        self.agent.max_battery
    }

    /// Code of the cell after the weather overlay.
    #[must_use]
    pub fn classify(&self, cell: CellCoord) -> Option<CellCode> {
        self.terrain.overlay.get(cell)
    }

    /// Code of the cell as supplied by the caller.
    #[must_use]
    pub fn original_code(&self, cell: CellCoord) -> Option<CellCode> {
        self.terrain.original.get(cell)
    }

    /// Reports whether the cell may be entered under the flight configuration.
    #[must_use]
    pub fn is_traversable(&self, cell: CellCoord) -> bool {
        match self.classify(cell) {
            None | Some(CellCode::Obstacle) => false,
            Some(CellCode::ElevatedArea) => self.flight.allows_elevated(),
            Some(_) => true,
        }
    }

    /// Cost of moving into `destination`, if it lies within the grid.
    #[must_use]
    pub fn move_cost(&self, destination: CellCoord) -> Option<f64> {
        self.classify(destination)
            .map(|code| move_cost(code, self.flight))
    }

    /// Smallest cost any move can have under the flight configuration.
    #[must_use]
    pub fn min_step_cost(&self) -> f64 {
        min_step_cost(self.flight)
    }

    /// Feasible axis-aligned neighbors of `cell`.
    ///
    /// Out-of-bounds cells, obstacles, and elevated areas (unless flying high
    /// in normal power mode) are excluded. Unless `ignore_battery` is set, a
    /// neighbor whose move cost exceeds `battery` is excluded as well.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord, battery: f64, ignore_battery: bool) -> Neighbors {
        let (columns, rows) = self.dimensions();
        let mut neighbors = Neighbors::default();

        for direction in Direction::ALL {
            let Some(candidate) = cell.step(direction, columns, rows) else {
                continue;
            };
            if !self.is_traversable(candidate) {
                continue;
            }
            let Some(cost) = self.move_cost(candidate) else {
                continue;
            };
            if !ignore_battery && cost > battery {
                continue;
            }

            neighbors.push(Neighbor {
                cell: candidate,
                cost,
            });
        }

        neighbors
    }

    /// Charging entry registered at the cell, if any.
    #[must_use]
    pub fn charging_entry(&self, cell: CellCoord) -> Option<&ChargingEntry> {
        self.terrain.charging.get(cell)
    }

    /// Reports whether arriving at the cell restores the battery.
    #[must_use]
    pub fn is_charging_position(&self, cell: CellCoord) -> bool {
        self.terrain.charging.contains(cell)
    }

    /// Reports whether the cell is a delivery point.
    #[must_use]
    pub fn is_delivery_point(&self, cell: CellCoord) -> bool {
        self.terrain.deliveries.get(cell).is_some()
    }

    /// Reports whether the cell is the agent's home base.
    #[must_use]
    pub fn is_home_base(&self, cell: CellCoord) -> bool {
        cell == self.agent.home_base
    }

    /// Battery level after arriving at `cell` with `battery` left.
    ///
    /// Charging positions restore the battery to its maximum.
    #[must_use]
    pub fn arrive(&self, cell: CellCoord, battery: f64) -> f64 {
        if self.is_charging_position(cell) {
            self.agent.max_battery
        } else {
            battery
        }
    }

    /// Manhattan distance from `cell` to the current phase's goal.
    #[must_use]
    pub fn heuristic(&self, cell: CellCoord) -> u32 {
        cell.manhattan_distance(self.current_goal())
    }

    /// Goal of the current mission phase.
    #[must_use]
    pub const fn current_goal(&self) -> CellCoord {
        self.agent.current_goal()
    }

    /// Reports whether `cell` is the current phase's goal.
    #[must_use]
    pub fn is_at_goal(&self, cell: CellCoord) -> bool {
        cell == self.current_goal()
    }

    /// Sum of move costs along consecutive cells of `path`.
    ///
    /// Repeated positions (dwell frames) contribute nothing.
    #[must_use]
    pub fn path_cost(&self, path: &[CellCoord]) -> f64 {
        path.windows(2)
            .filter(|pair| pair[0] != pair[1])
            .filter_map(|pair| self.move_cost(pair[1]))
            .sum()
    }

    /// Battery left after flying `path` starting with `battery`.
    ///
    /// Charging positions restore the battery exactly as during search. The
    /// level never drops below zero.
    #[must_use]
    pub fn drain_along(&self, path: &[CellCoord], battery: f64) -> f64 {
        path.windows(2)
            .filter(|pair| pair[0] != pair[1])
            .fold(battery, |level, pair| {
                let cost = self.move_cost(pair[1]).unwrap_or(0.0);
                self.arrive(pair[1], (level - cost).max(0.0))
            })
    }

    /// Feeds the agent's position to the mission phase machine.
    pub fn tick(&mut self, position: CellCoord) -> Option<PhaseEvent> {
        let event = self.agent.tick(position);
        if let Some(event) = event {
            debug!("mission phase event at {position}: {event:?}");
        }
        event
    }
}

/// Read-only helpers for adapters that present an environment.
pub mod query {
    use drone_courier_core::{CellCode, CellCoord, DeliveryPointId};

    use crate::Environment;

    /// Cells reclassified as wind by the overlay.
    #[must_use]
    pub fn wind_cells(environment: &Environment) -> Vec<CellCoord> {
        environment
            .terrain()
            .overlay()
            .cells_where(|code| code == CellCode::Wind)
    }

    /// Positions that restore the battery, ordered by position.
    #[must_use]
    pub fn charging_positions(environment: &Environment) -> Vec<CellCoord> {
        environment
            .terrain()
            .charging()
            .iter()
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Delivery points ordered by position.
    #[must_use]
    pub fn delivery_points(environment: &Environment) -> Vec<(CellCoord, DeliveryPointId)> {
        environment.terrain().deliveries().iter().collect()
    }

    /// Overlay symbols row by row, for renderers.
    #[must_use]
    pub fn overlay_symbols(environment: &Environment) -> Vec<Vec<&'static str>> {
        let overlay = environment.terrain().overlay();
        (0..overlay.rows())
            .map(|row| {
                (0..overlay.columns())
                    .map(|column| {
                        overlay
                            .get(CellCoord::new(column, row))
                            .map_or("?", |code| code.symbol())
                    })
                    .collect()
            })
            .collect()
    }
}
