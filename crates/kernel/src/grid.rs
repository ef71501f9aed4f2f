use crate::layout::LayoutError;
use mansion_common::{BlockKind, CellCoord, Rotation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const GRID_COLUMNS: u8 = 10;
pub const GRID_ROWS: u8 = 8;

/// The visual state of one grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    /// `None` for a blank cell.
    pub kind: Option<BlockKind>,
    pub rotation: Rotation,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        kind: None,
        rotation: Rotation::Deg0,
    };

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
    }

    pub fn label(&self) -> String {
        self.kind.map(BlockKind::label).unwrap_or_default()
    }
}

/// The persisted unit of grid state, keyed by its coordinate rather than
/// by position in the saved array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    pub col: u8,
    pub row: u8,
    #[serde(rename = "type")]
    pub kind: Option<BlockKind>,
    pub rotation: Rotation,
}

impl CellRecord {
    pub fn coord(&self) -> CellCoord {
        CellCoord::new(self.col, self.row)
    }
}

/// Fixed 10x8 grid of cells. Every cell always exists; painting overwrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    cells: BTreeMap<CellCoord, Cell>,
}

impl GridLayout {
    /// A grid with every cell blank.
    pub fn new() -> Self {
        let cells = Self::coords().map(|c| (c, Cell::EMPTY)).collect();
        Self { cells }
    }

    /// Every coordinate, row by row.
    pub fn coords() -> impl Iterator<Item = CellCoord> {
        (0..GRID_ROWS).flat_map(|row| (0..GRID_COLUMNS).map(move |col| CellCoord::new(col, row)))
    }

    pub fn in_bounds(coord: CellCoord) -> bool {
        coord.col < GRID_COLUMNS && coord.row < GRID_ROWS
    }

    /// Blank every cell.
    pub fn reset(&mut self) {
        *self = Self::new();
        tracing::debug!("grid reset");
    }

    /// Overwrite a cell with `kind` at `rotation`, whatever it held before.
    pub fn paint(
        &mut self,
        coord: CellCoord,
        kind: BlockKind,
        rotation: Rotation,
    ) -> Result<(), LayoutError> {
        let cell = self
            .cells
            .get_mut(&coord)
            .ok_or(LayoutError::OutOfBounds(coord))?;
        *cell = Cell {
            kind: Some(kind),
            rotation,
        };
        tracing::debug!(%coord, %kind, %rotation, "cell painted");
        Ok(())
    }

    pub fn get(&self, coord: CellCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// Number of cells that hold a block.
    pub fn painted_count(&self) -> usize {
        self.cells.values().filter(|c| !c.is_empty()).count()
    }

    /// Cells row by row.
    pub fn rows(&self) -> impl Iterator<Item = Vec<(CellCoord, Cell)>> + '_ {
        (0..GRID_ROWS).map(move |row| {
            (0..GRID_COLUMNS)
                .map(|col| {
                    let coord = CellCoord::new(col, row);
                    (coord, self.cells.get(&coord).copied().unwrap_or_default())
                })
                .collect()
        })
    }

    /// Every cell as a persisted record, row by row.
    pub fn records(&self) -> Vec<CellRecord> {
        Self::coords()
            .map(|coord| {
                let cell = self.cells.get(&coord).copied().unwrap_or_default();
                CellRecord {
                    col: coord.col,
                    row: coord.row,
                    kind: cell.kind,
                    rotation: cell.rotation,
                }
            })
            .collect()
    }

    /// Replace every cell from `records`.
    ///
    /// Records are matched by coordinate, not by order. Out-of-range or
    /// repeated coordinates reject the whole set; cells without a record
    /// come back blank.
    pub fn restore(&mut self, records: &[CellRecord]) -> Result<(), LayoutError> {
        let mut restored = Self::new();
        let mut seen = BTreeSet::new();
        for record in records {
            let coord = record.coord();
            if !Self::in_bounds(coord) {
                return Err(LayoutError::OutOfBounds(coord));
            }
            if !seen.insert(coord) {
                return Err(LayoutError::DuplicateCell(coord));
            }
            restored.cells.insert(
                coord,
                Cell {
                    kind: record.kind,
                    rotation: record.rotation,
                },
            );
        }
        *self = restored;
        tracing::debug!(count = records.len(), "grid restored");
        Ok(())
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_has_eighty_blank_cells() {
        let grid = GridLayout::new();
        assert_eq!(GridLayout::coords().count(), 80);
        assert_eq!(grid.records().len(), 80);
        assert_eq!(grid.painted_count(), 0);
    }

    #[test]
    fn paint_overwrites_unconditionally() {
        let mut grid = GridLayout::new();
        let c = CellCoord::new(3, 2);
        grid.paint(c, BlockKind::Pool, Rotation::Deg0).unwrap();
        grid.paint(c, BlockKind::Kitchen, Rotation::Deg270).unwrap();
        let cell = grid.get(c).unwrap();
        assert_eq!(cell.kind, Some(BlockKind::Kitchen));
        assert_eq!(cell.rotation, Rotation::Deg270);
        assert_eq!(cell.label(), "K");
        assert_eq!(grid.painted_count(), 1);
    }

    #[test]
    fn paint_out_of_bounds() {
        let mut grid = GridLayout::new();
        let c = CellCoord::new(10, 0);
        assert_eq!(
            grid.paint(c, BlockKind::Bed, Rotation::Deg0),
            Err(LayoutError::OutOfBounds(c))
        );
        assert_eq!(grid, GridLayout::new());
    }

    #[test]
    fn reset_blanks_everything() {
        let mut grid = GridLayout::new();
        grid.paint(CellCoord::new(0, 0), BlockKind::Vault, Rotation::Deg90)
            .unwrap();
        grid.reset();
        assert_eq!(grid, GridLayout::new());
    }

    #[test]
    fn records_round_trip_through_restore() {
        let mut grid = GridLayout::new();
        grid.paint(CellCoord::new(9, 7), BlockKind::Wine, Rotation::Deg180)
            .unwrap();
        grid.paint(CellCoord::new(0, 0), BlockKind::Vault, Rotation::Deg90)
            .unwrap();

        let mut records = grid.records();
        records.reverse(); // order must not matter
        let mut restored = GridLayout::new();
        restored.restore(&records).unwrap();
        assert_eq!(restored, grid);
    }

    #[test]
    fn restore_fills_missing_cells_with_blanks() {
        let mut grid = GridLayout::new();
        grid.paint(CellCoord::new(1, 1), BlockKind::Sofa, Rotation::Deg0)
            .unwrap();
        grid.restore(&[CellRecord {
            col: 4,
            row: 4,
            kind: Some(BlockKind::Desk),
            rotation: Rotation::Deg90,
        }])
        .unwrap();
        assert_eq!(grid.painted_count(), 1);
        assert!(grid.get(CellCoord::new(1, 1)).unwrap().is_empty());
        assert_eq!(
            grid.get(CellCoord::new(4, 4)).unwrap().kind,
            Some(BlockKind::Desk)
        );
    }

    #[test]
    fn restore_rejects_bad_coordinates_without_touching_state() {
        let mut grid = GridLayout::new();
        grid.paint(CellCoord::new(2, 2), BlockKind::Bed, Rotation::Deg0)
            .unwrap();
        let before = grid.clone();

        let outside = CellRecord {
            col: 0,
            row: 8,
            kind: None,
            rotation: Rotation::Deg0,
        };
        assert_eq!(
            grid.restore(&[outside]),
            Err(LayoutError::OutOfBounds(CellCoord::new(0, 8)))
        );

        let dup = CellRecord {
            col: 1,
            row: 1,
            kind: Some(BlockKind::Pool),
            rotation: Rotation::Deg0,
        };
        assert_eq!(
            grid.restore(&[dup, dup]),
            Err(LayoutError::DuplicateCell(CellCoord::new(1, 1)))
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn rows_are_ten_wide_and_eight_tall() {
        let grid = GridLayout::new();
        let rows: Vec<_> = grid.rows().collect();
        assert_eq!(rows.len(), 8);
        assert!(rows.iter().all(|r| r.len() == 10));
        assert_eq!(rows[7][9].0, CellCoord::new(9, 7));
    }

    #[test]
    fn blank_cell_record_serializes_null_type() {
        let json = serde_json::to_string(&GridLayout::new().records()[0]).unwrap();
        assert_eq!(json, r#"{"col":0,"row":0,"type":null,"rotation":0}"#);
    }
}
