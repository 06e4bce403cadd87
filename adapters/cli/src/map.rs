//! CSV map loading and inspection.

use std::{fs::File, io::Read, path::Path};

use anyhow::{bail, Context, Result};
use drone_courier_core::{CellCode, CellCoord, DeliveryPointId};
use drone_courier_world::Grid;

/// Reads a headerless CSV map from `path`.
pub(crate) fn load_map(path: &Path) -> Result<Grid> {
    let file =
        File::open(path).with_context(|| format!("failed to open map file {}", path.display()))?;
    read_map(file).with_context(|| format!("failed to load map {}", path.display()))
}

/// Reads a headerless CSV map; every record is one grid row.
pub(crate) fn read_map<R: Read>(reader: R) -> Result<Grid> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in csv.records().enumerate() {
        let record = record.with_context(|| format!("failed to read map row {index}"))?;
        rows.push(record.iter().map(str::to_owned).collect::<Vec<_>>());
    }

    Grid::parse(&rows).context("map is not a valid grid")
}

/// Landmarks and cell counts of a map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MapSummary {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) start: CellCoord,
    pub(crate) destinations: Vec<(DeliveryPointId, CellCoord)>,
    pub(crate) obstacles: usize,
    pub(crate) elevated: usize,
    pub(crate) charging_stations: usize,
    pub(crate) free: usize,
}

impl MapSummary {
    /// Position of the requested destination, or the first one when `id` is absent.
    pub(crate) fn destination(&self, id: Option<u8>) -> Result<CellCoord> {
        let Some(requested) = id else {
            return self
                .destinations
                .first()
                .map(|(_, cell)| *cell)
                .context("map has no destination");
        };

        self.destinations
            .iter()
            .find(|(candidate, _)| candidate.get() == requested)
            .map(|(_, cell)| *cell)
            .with_context(|| format!("destination {requested} is not on the map"))
    }
}

/// Locates the landmarks of `grid` and rejects maps missing one.
pub(crate) fn inspect(grid: &Grid) -> Result<MapSummary> {
    let Some(start) = grid.start() else {
        bail!("map has no start marker `S`");
    };
    let destinations = grid.delivery_points();
    if destinations.is_empty() {
        bail!("map has no destination `1`-`4`");
    }

    let count = |code: CellCode| grid.iter().filter(|(_, cell)| *cell == code).count();
    let (width, height) = grid.dimensions();

    Ok(MapSummary {
        width,
        height,
        start,
        destinations,
        obstacles: count(CellCode::Obstacle),
        elevated: count(CellCode::ElevatedArea),
        charging_stations: count(CellCode::ChargingStation),
        free: count(CellCode::Free),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_csv_with_blank_and_lowercase_cells() {
        let grid = read_map("S, ,x\n0,A,1\nnan,B,0\n".as_bytes()).expect("valid map");
        let summary = inspect(&grid).expect("landmarks present");

        assert_eq!((summary.width, summary.height), (3, 3));
        assert_eq!(summary.start, CellCoord::new(0, 0));
        assert_eq!(summary.obstacles, 1);
        assert_eq!(summary.elevated, 1);
        assert_eq!(summary.charging_stations, 1);
        assert_eq!(summary.free, 4);
        assert_eq!(summary.destination(None).ok(), Some(CellCoord::new(2, 1)));
        assert_eq!(summary.destination(Some(1)).ok(), Some(CellCoord::new(2, 1)));
        assert!(summary.destination(Some(2)).is_err());
    }

    #[test]
    fn rejects_ragged_rows_and_wind_symbols() {
        assert!(read_map("S,0,1\n0,0\n".as_bytes()).is_err());
        assert!(read_map("S,W,1\n".as_bytes()).is_err());
    }

    #[test]
    fn rejects_maps_without_landmarks() {
        let no_start = read_map("0,0,1\n".as_bytes()).expect("valid grid");
        assert!(inspect(&no_start).is_err());

        let no_goal = read_map("S,0,0\n".as_bytes()).expect("valid grid");
        assert!(inspect(&no_goal).is_err());
    }
}
