//! Read-only registries derived from the original grid.

use std::collections::BTreeMap;

use drone_courier_core::{CellCode, CellCoord, ChargingEntry, DeliveryPointId};

use crate::Grid;

/// Positions that restore the battery on arrival.
///
/// Populated from charging-station cells, then extended so that every
/// delivery point is also a charging entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChargingRegistry {
    entries: BTreeMap<CellCoord, ChargingEntry>,
}

impl ChargingRegistry {
    /// Builds the registry from the original (pre-weather) grid.
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        let mut entries = BTreeMap::new();

        for (cell, code) in grid.iter() {
            if code == CellCode::ChargingStation {
                let _ = entries.insert(cell, ChargingEntry::station());
            }
        }

        for (_, cell) in grid.delivery_points() {
            let _ = entries.insert(cell, ChargingEntry::delivery());
        }

        Self { entries }
    }

    /// Entry registered at the cell, if any.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&ChargingEntry> {
        self.entries.get(&cell)
    }

    /// Reports whether arriving at the cell restores the battery.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.entries.contains_key(&cell)
    }

    /// Iterates over every entry ordered by position.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &ChargingEntry)> + '_ {
        self.entries.iter().map(|(cell, entry)| (*cell, entry))
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no entry is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Delivery points keyed by position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeliveryRegistry {
    points: BTreeMap<CellCoord, DeliveryPointId>,
}

impl DeliveryRegistry {
    /// Builds the registry from the original grid.
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        let points = grid
            .delivery_points()
            .into_iter()
            .map(|(id, cell)| (cell, id))
            .collect();
        Self { points }
    }

    /// Identifier of the delivery point at the cell, if any.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<DeliveryPointId> {
        self.points.get(&cell).copied()
    }

    /// Position of the delivery point with the given identifier.
    #[must_use]
    pub fn position_of(&self, id: DeliveryPointId) -> Option<CellCoord> {
        self.points
            .iter()
            .find(|(_, candidate)| **candidate == id)
            .map(|(cell, _)| *cell)
    }

    /// Iterates over every delivery point ordered by position.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, DeliveryPointId)> + '_ {
        self.points.iter().map(|(cell, id)| (*cell, *id))
    }

    /// Number of delivery points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Reports whether the map carries no delivery point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
