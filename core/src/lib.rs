#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the drone courier planner.
//!
//! This crate defines the vocabulary that connects the environment model,
//! the search strategies, and the mission planner. The world crate turns a
//! grid of [`CellCode`] values and a [`FlightConfig`] into a cost and
//! feasibility oracle, the search systems explore `(cell, battery)` states
//! over it, and the mission planner stitches the resulting legs together.
//! The [`MissionPhase`] machine lives here so that planners and replay
//! adapters agree on the exact transition table.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of stationary frames spent at the delivery point.
pub const DELIVERY_DWELL_FRAMES: u8 = 3;

/// Number of stationary frames spent resting at the home base.
pub const REST_DWELL_FRAMES: u8 = 5;

/// Battery capacity assigned to a freshly constructed agent.
pub const DEFAULT_MAX_BATTERY: f64 = 100.0;

/// Recharge rate advertised by an explicit charging station cell.
pub const STATION_RECHARGE_RATE: f64 = 15.0;

/// Recharge rate advertised by a delivery point acting as a charger.
pub const DELIVERY_RECHARGE_RATE: f64 = 100.0;

/// Wind intensity at or below which no cell is reclassified.
pub const WIND_ACTIVATION_THRESHOLD: f64 = 0.3;

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the adjacent cell in `direction` if it lies inside a grid of
    /// the provided dimensions.
    #[must_use]
    pub fn step(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::East => (self.column.checked_add(1)?, self.row),
            Direction::West => (self.column.checked_sub(1)?, self.row),
            Direction::South => (self.column, self.row.checked_add(1)?),
            Direction::North => (self.column, self.row.checked_sub(1)?),
        };

        if column < columns && row < rows {
            Some(CellCoord::new(column, row))
        } else {
            None
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Cardinal movement directions available to the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward increasing column indices.
    East,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing row indices.
    North,
}

impl Direction {
    /// Expansion order used by every neighbor query.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    /// Direction of a single axis-aligned step between adjacent cells.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Direction> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if to.row() > from.row() {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

/// Identifier of one of the four delivery points a map may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeliveryPointId(u8);

impl DeliveryPointId {
    /// Creates an identifier when `value` lies in `1..=4`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= 4 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Terrain symbol stored in every grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellCode {
    /// Open airspace.
    Free,
    /// Building or other impassable structure.
    Obstacle,
    /// Restricted area that may only be overflown at high altitude.
    ElevatedArea,
    /// Cell reclassified by the weather overlay. Never accepted from input.
    Wind,
    /// Launch marker; doubles as the home base.
    Start,
    /// Dedicated charging station.
    ChargingStation,
    /// Delivery point carrying its identifier.
    DeliveryPoint(DeliveryPointId),
}

impl CellCode {
    /// Parses a map symbol supplied by a caller.
    ///
    /// Symbols are trimmed first. `0`, an empty string, and `nan` (an empty
    /// spreadsheet cell once stringified) all denote free airspace. The wind
    /// symbol is reserved for the weather overlay and rejected here.
    pub fn from_symbol(symbol: &str) -> Result<Self, CellCodeError> {
        let trimmed = symbol.trim();
        match trimmed {
            "" | "0" | "nan" => Ok(Self::Free),
            "X" | "x" => Ok(Self::Obstacle),
            "A" => Ok(Self::ElevatedArea),
            "S" => Ok(Self::Start),
            "B" => Ok(Self::ChargingStation),
            "W" => Err(CellCodeError::ReservedWind),
            "1" | "2" | "3" | "4" => trimmed
                .parse::<u8>()
                .ok()
                .and_then(DeliveryPointId::new)
                .map(Self::DeliveryPoint)
                .ok_or_else(|| CellCodeError::Unknown(trimmed.to_owned())),
            other => Err(CellCodeError::Unknown(other.to_owned())),
        }
    }

    /// Canonical symbol for the code.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Free => "0",
            Self::Obstacle => "X",
            Self::ElevatedArea => "A",
            Self::Wind => "W",
            Self::Start => "S",
            Self::ChargingStation => "B",
            Self::DeliveryPoint(id) => match id.get() {
                1 => "1",
                2 => "2",
                3 => "3",
                _ => "4",
            },
        }
    }

    /// Reports whether the cell can never be entered.
    #[must_use]
    pub const fn is_obstacle(&self) -> bool {
        matches!(self, Self::Obstacle)
    }

    /// Reports whether the cell is plain free airspace.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        matches!(self, Self::Free)
    }
}

impl FromStr for CellCode {
    type Err = CellCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(value)
    }
}

impl fmt::Display for CellCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Altitude band the agent flies in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightHeight {
    /// Low altitude: cheaper per step, cannot overfly elevated areas.
    #[default]
    Low,
    /// High altitude: more expensive per step, may overfly elevated areas.
    High,
}

/// Power management profile of the agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerMode {
    /// Regular consumption.
    #[default]
    Normal,
    /// Discounted consumption; forbids elevated-area traversal.
    BatterySaver,
}

/// Flight configuration fixed for the lifetime of an environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlightConfig {
    /// Altitude band.
    pub height: FlightHeight,
    /// Power profile.
    pub power: PowerMode,
}

impl FlightConfig {
    /// Creates a configuration from its two settings.
    #[must_use]
    pub const fn new(height: FlightHeight, power: PowerMode) -> Self {
        Self { height, power }
    }

    /// Reports whether elevated-area cells may be entered.
    ///
    /// Both high altitude and the normal power profile are required.
    #[must_use]
    pub fn allows_elevated(&self) -> bool {
        self.height == FlightHeight::High && self.power == PowerMode::Normal
    }
}

/// Weather inputs applied once when an environment is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    /// Wind intensity in `[0, 1]`.
    #[serde(default)]
    pub wind_intensity: f64,
    /// Seed of the random source that picks wind-affected cells.
    #[serde(default)]
    pub seed: u64,
}

impl WeatherConditions {
    /// Creates weather conditions, clamping the intensity into `[0, 1]`.
    #[must_use]
    pub fn new(wind_intensity: f64, seed: u64) -> Self {
        let wind_intensity = if wind_intensity.is_nan() {
            0.0
        } else {
            wind_intensity.clamp(0.0, 1.0)
        };
        Self {
            wind_intensity,
            seed,
        }
    }

    /// Windless conditions; the overlay equals the original grid.
    #[must_use]
    pub const fn calm() -> Self {
        Self {
            wind_intensity: 0.0,
            seed: 0,
        }
    }

    /// Reports whether the intensity is strong enough to reclassify cells.
    #[must_use]
    pub fn is_windy(&self) -> bool {
        self.wind_intensity > WIND_ACTIVATION_THRESHOLD
    }
}

impl Default for WeatherConditions {
    fn default() -> Self {
        Self::calm()
    }
}

/// Kind of charging entry registered at a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargingKind {
    /// Explicit charging station cell.
    Station,
    /// Delivery point that also restores the battery.
    DeliveryAndCharge,
}

/// Entry of the charging registry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChargingEntry {
    /// Origin of the entry.
    pub kind: ChargingKind,
    /// Nominal recharge rate advertised by the entry.
    pub recharge_rate: f64,
}

impl ChargingEntry {
    /// Entry describing an explicit charging station.
    #[must_use]
    pub const fn station() -> Self {
        Self {
            kind: ChargingKind::Station,
            recharge_rate: STATION_RECHARGE_RATE,
        }
    }

    /// Entry describing a delivery point acting as a charger.
    #[must_use]
    pub const fn delivery() -> Self {
        Self {
            kind: ChargingKind::DeliveryAndCharge,
            recharge_rate: DELIVERY_RECHARGE_RATE,
        }
    }
}

/// Phase of the delivery round trip.
///
/// Countdowns are carried inside the variants so that the machine never
/// relies on counters stored elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionPhase {
    /// Travelling toward the delivery goal.
    Outbound,
    /// Dwelling at the delivery goal.
    Delivering {
        /// Ticks left before the return leg starts.
        remaining: u8,
    },
    /// Travelling back to the home base.
    Inbound,
    /// Dwelling at the home base.
    Resting {
        /// Ticks left before the mission completes.
        remaining: u8,
    },
    /// Terminal phase.
    Complete,
}

/// Notable outcome of a single [`MissionPhase::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseEvent {
    /// The agent reached the delivery goal.
    DeliveryStarted,
    /// One delivery tick elapsed.
    DeliveryProgress {
        /// Ticks left after this one.
        remaining: u8,
    },
    /// Delivery finished; the return leg begins.
    DeliveryCompleted,
    /// The agent reached the home base.
    ArrivedHome,
    /// One rest tick elapsed.
    RestProgress {
        /// Ticks left after this one.
        remaining: u8,
    },
    /// Rest finished; the mission is complete.
    MissionCompleted,
}

/// Result of feeding one position to the phase machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseTransition {
    /// Phase after the tick.
    pub phase: MissionPhase,
    /// Event emitted by the tick, if any.
    pub event: Option<PhaseEvent>,
}

impl MissionPhase {
    /// Advances the machine by one tick given the agent's position.
    #[must_use]
    pub fn advance(self, position: CellCoord, goal: CellCoord, home: CellCoord) -> PhaseTransition {
        let (phase, event) = match self {
            Self::Outbound if position == goal => (
                Self::Delivering {
                    remaining: DELIVERY_DWELL_FRAMES,
                },
                Some(PhaseEvent::DeliveryStarted),
            ),
            Self::Outbound => (Self::Outbound, None),
            Self::Delivering { remaining } => match remaining.saturating_sub(1) {
                0 => (Self::Inbound, Some(PhaseEvent::DeliveryCompleted)),
                left => (
                    Self::Delivering { remaining: left },
                    Some(PhaseEvent::DeliveryProgress { remaining: left }),
                ),
            },
            Self::Inbound if position == home => (
                Self::Resting {
                    remaining: REST_DWELL_FRAMES,
                },
                Some(PhaseEvent::ArrivedHome),
            ),
            Self::Inbound => (Self::Inbound, None),
            Self::Resting { remaining } => match remaining.saturating_sub(1) {
                0 => (Self::Complete, Some(PhaseEvent::MissionCompleted)),
                left => (
                    Self::Resting { remaining: left },
                    Some(PhaseEvent::RestProgress { remaining: left }),
                ),
            },
            Self::Complete => (Self::Complete, None),
        };

        PhaseTransition { phase, event }
    }

    /// Target cell of the phase: home while inbound, the delivery goal otherwise.
    #[must_use]
    pub const fn target(self, goal: CellCoord, home: CellCoord) -> CellCoord {
        match self {
            Self::Inbound => home,
            _ => goal,
        }
    }

    /// Remaining delivery ticks, zero outside the delivering phase.
    #[must_use]
    pub const fn delivery_countdown(self) -> u8 {
        match self {
            Self::Delivering { remaining } => remaining,
            _ => 0,
        }
    }

    /// Remaining rest ticks, zero outside the resting phase.
    #[must_use]
    pub const fn rest_countdown(self) -> u8 {
        match self {
            Self::Resting { remaining } => remaining,
            _ => 0,
        }
    }
}

/// One of the two travelling legs of a mission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    /// Home base to delivery goal.
    Outbound,
    /// Delivery goal back to home base.
    Inbound,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outbound => f.write_str("outbound"),
            Self::Inbound => f.write_str("inbound"),
        }
    }
}

/// Cause assigned to a failed leg by the diagnostic re-search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureDiagnosis {
    /// No path exists even when battery is ignored.
    Blocked,
    /// A path exists, but only when battery is ignored.
    BatteryInfeasible,
    /// The search hit a depth, node or time limit before deciding.
    ResourceExhausted,
    /// No diagnostic re-search was run for the leg.
    Unclassified,
}

impl fmt::Display for FailureDiagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocked => f.write_str("blocked"),
            Self::BatteryInfeasible => f.write_str("battery-infeasible"),
            Self::ResourceExhausted => f.write_str("resource-exhausted"),
            Self::Unclassified => f.write_str("unclassified"),
        }
    }
}

/// Reasons a map symbol may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CellCodeError {
    /// The symbol is not part of the map alphabet.
    #[error("unknown cell symbol `{0}`")]
    Unknown(String),
    /// The wind symbol is produced by the weather overlay only.
    #[error("cell symbol `W` is reserved for the weather overlay")]
    ReservedWind,
}

/// Reasons a grid may fail to build.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grid has no rows or no columns.
    #[error("grid must contain at least one row and one column")]
    Empty,
    /// A row length differs from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Offending row index.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A dimension does not fit the coordinate type.
    #[error("grid dimension {0} exceeds the supported coordinate range")]
    TooLarge(usize),
    /// A symbol could not be parsed.
    #[error("invalid symbol at column {column}, row {row}")]
    Symbol {
        /// Row of the symbol.
        row: usize,
        /// Column of the symbol.
        column: usize,
        /// Parse failure.
        #[source]
        source: CellCodeError,
    },
}

/// Reasons a single search leg may fail.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The frontier emptied before the goal was reached.
    #[error("no path found after expanding {nodes_expanded} states")]
    Exhausted {
        /// States popped before giving up.
        nodes_expanded: usize,
    },
    /// Every depth up to the configured limit was searched without success.
    #[error("depth limit {depth} reached after expanding {nodes_expanded} nodes")]
    DepthLimit {
        /// Depth limit that was exhausted.
        depth: usize,
        /// Nodes expanded before giving up.
        nodes_expanded: usize,
    },
    /// The node expansion budget ran out.
    #[error("node budget exhausted after expanding {nodes_expanded} nodes")]
    NodeBudget {
        /// Nodes expanded before giving up.
        nodes_expanded: usize,
    },
    /// The wall-clock budget ran out.
    #[error("time budget exhausted after {elapsed:?} and {nodes_expanded} nodes")]
    TimeBudget {
        /// Time spent before giving up.
        elapsed: Duration,
        /// Nodes expanded before giving up.
        nodes_expanded: usize,
    },
}

impl SearchError {
    /// Number of nodes expanded before the failure.
    #[must_use]
    pub const fn nodes_expanded(&self) -> usize {
        match self {
            Self::Exhausted { nodes_expanded }
            | Self::DepthLimit { nodes_expanded, .. }
            | Self::NodeBudget { nodes_expanded }
            | Self::TimeBudget { nodes_expanded, .. } => *nodes_expanded,
        }
    }

    /// Reports whether the search stopped at a configured limit rather than
    /// proving the goal unreachable.
    #[must_use]
    pub const fn is_resource_limit(&self) -> bool {
        !matches!(self, Self::Exhausted { .. })
    }
}

/// Reasons a complete mission may fail to plan.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MissionError {
    /// One of the legs could not be planned.
    #[error("{leg} leg failed ({diagnosis})")]
    LegFailed {
        /// Leg that failed.
        leg: Leg,
        /// Cause assigned by the diagnostic re-search.
        diagnosis: FailureDiagnosis,
        /// Failure reported by the primary search.
        #[source]
        cause: SearchError,
    },
}

impl MissionError {
    /// Leg that failed.
    #[must_use]
    pub const fn leg(&self) -> Leg {
        match self {
            Self::LegFailed { leg, .. } => *leg,
        }
    }

    /// Diagnosis assigned to the failure.
    #[must_use]
    pub const fn diagnosis(&self) -> FailureDiagnosis {
        match self {
            Self::LegFailed { diagnosis, .. } => *diagnosis,
        }
    }
}
