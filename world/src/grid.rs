//! Rectangular terrain grid addressed by [`CellCoord`].

use std::fmt;

use drone_courier_core::{CellCode, CellCoord, DeliveryPointId, GridError};

/// Dense row-major matrix of terrain codes.
///
/// Rows are guaranteed to share the same length once constructed. The grid
/// itself is never mutated after an environment is built; the weather overlay
/// is derived as a separate copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<CellCode>,
}

impl Grid {
    /// Builds a grid from rows of already-parsed codes.
    pub fn from_rows(rows: Vec<Vec<CellCode>>) -> Result<Self, GridError> {
        let expected = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || expected == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(GridError::Ragged {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }

        let columns = u32::try_from(expected).map_err(|_| GridError::TooLarge(expected))?;
        let row_count = u32::try_from(rows.len()).map_err(|_| GridError::TooLarge(rows.len()))?;

        Ok(Self {
            columns,
            rows: row_count,
            cells,
        })
    }

    /// Parses a grid from rows of map symbols.
    pub fn parse<R, S>(rows: &[R]) -> Result<Self, GridError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let parsed = rows
            .iter()
            .enumerate()
            .map(|(row, symbols)| {
                symbols
                    .as_ref()
                    .iter()
                    .enumerate()
                    .map(|(column, symbol)| {
                        CellCode::from_symbol(symbol.as_ref()).map_err(|source| {
                            GridError::Symbol {
                                row,
                                column,
                                source,
                            }
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_rows(parsed)
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Provides `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the cell lies within the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Terrain code stored at the cell, if it lies within the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<CellCode> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellCode)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, code)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % columns, index / columns), *code)
        })
    }

    /// First cell carrying the start marker.
    #[must_use]
    pub fn start(&self) -> Option<CellCoord> {
        self.iter()
            .find(|(_, code)| *code == CellCode::Start)
            .map(|(cell, _)| cell)
    }

    /// Delivery points present in the grid, in row-major order.
    #[must_use]
    pub fn delivery_points(&self) -> Vec<(DeliveryPointId, CellCoord)> {
        self.iter()
            .filter_map(|(cell, code)| match code {
                CellCode::DeliveryPoint(id) => Some((id, cell)),
                _ => None,
            })
            .collect()
    }

    /// Cells whose code satisfies the predicate, in row-major order.
    pub fn cells_where<F>(&self, mut predicate: F) -> Vec<CellCoord>
    where
        F: FnMut(CellCode) -> bool,
    {
        self.iter()
            .filter(|(_, code)| predicate(*code))
            .map(|(cell, _)| cell)
            .collect()
    }

    pub(crate) fn set(&mut self, cell: CellCoord, code: CellCode) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = code;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX).max(1);
        for (index, row) in self.cells.chunks(width).enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for (column, code) in row.iter().enumerate() {
                if column > 0 {
                    f.write_str(" ")?;
                }
                f.write_str(code.symbol())?;
            }
        }
        Ok(())
    }
}
