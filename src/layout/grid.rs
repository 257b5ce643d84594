//! Fixed-size score-card grid - the output surface of the Big Road engine
//!
//! A [`Grid`] is a `rows × cols` array of optional [`Cell`]s. Dimensions are a
//! construction parameter; the grid never grows. Placement is fail-fast:
//! writing outside the bounds or onto an occupied slot is an error, so the
//! engine can never clobber a cell by accident.
//!
//! # Example
//! ```
//! use bigroad::layout::grid::{Cell, Grid};
//! use bigroad::Outcome;
//!
//! let mut grid = Grid::new(6, 20)?;
//! grid.place(0, 0, Cell::confirmed(Outcome::Player, 1))?;
//! assert!(grid.is_occupied(0, 0));
//! assert!(grid.place(0, 0, Cell::preview(Outcome::Banker, 2)).is_err());
//! # Ok::<(), bigroad::layout::grid::GridError>(())
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::outcome::Outcome;

/// Grid construction and placement failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid must have at least one row")]
    ZeroRows,
    #[error("grid must have at least one column")]
    ZeroCols,
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },
    #[error("a {rows}x{cols} grid does not fit in memory")]
    TooLarge { rows: usize, cols: usize },
}

/// A marker placed on the score card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub symbol: Outcome,
    /// `true` for recorded outcomes, `false` for predicted ones.
    pub confirmed: bool,
    /// 1-based index into outcomes followed by preview.
    pub source_index: usize,
}

impl Cell {
    pub fn confirmed(symbol: Outcome, source_index: usize) -> Self {
        Self {
            symbol,
            confirmed: true,
            source_index,
        }
    }

    pub fn preview(symbol: Outcome, source_index: usize) -> Self {
        Self {
            symbol,
            confirmed: false,
            source_index,
        }
    }

    /// Dump character: upper case when confirmed, lower case for preview.
    pub fn to_char(&self) -> char {
        if self.confirmed {
            self.symbol.symbol()
        } else {
            self.symbol.symbol().to_ascii_lowercase()
        }
    }
}

/// Zero-based cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Rectangular score-card grid stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Cell>>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 {
            return Err(GridError::ZeroRows);
        }
        if cols == 0 {
            return Err(GridError::ZeroCols);
        }
        // Every in-bounds `row * cols + col` stays below this product.
        let len = rows
            .checked_mul(cols)
            .filter(|len| {
                len.checked_mul(std::mem::size_of::<Option<Cell>>())
                    .is_some_and(|bytes| bytes <= isize::MAX as usize)
            })
            .ok_or(GridError::TooLarge { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![None; len],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index(row, col).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Out-of-bounds coordinates are reported as free.
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some()
    }

    pub fn place(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), GridError> {
        let idx = self.index(row, col).ok_or(GridError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        })?;
        let slot = &mut self.cells[idx];
        if slot.is_some() {
            return Err(GridError::Occupied { row, col });
        }
        *slot = Some(cell);
        Ok(())
    }

    /// Placed cells ordered column by column, top to bottom.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        (0..self.cols).flat_map(move |col| {
            (0..self.rows).filter_map(move |row| {
                self.get(row, col).map(|cell| (Position::new(row, col), cell))
            })
        })
    }

    /// Row slices for renderers that paint line by line.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Option<Cell>]> + '_ {
        self.cells.chunks(self.cols)
    }

    pub fn placed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn confirmed_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.confirmed).count()
    }

    pub fn preview_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| !c.confirmed).count()
    }

    /// Locate the cell representing a given turn, for click-to-select.
    pub fn position_of(&self, source_index: usize) -> Option<Position> {
        self.cells()
            .find(|(_, cell)| cell.source_index == source_index)
            .map(|(pos, _)| pos)
    }

    /// Content hash over dimensions and every slot.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.rows as u64).to_le_bytes());
        hasher.update(&(self.cols as u64).to_le_bytes());
        for slot in &self.cells {
            match slot {
                None => {
                    hasher.update(&[0]);
                }
                Some(cell) => {
                    hasher.update(&[1, cell.symbol.symbol() as u8, cell.confirmed as u8]);
                    hasher.update(&(cell.source_index as u64).to_le_bytes());
                }
            }
        }
        hasher.finalize()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.rows_iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            for slot in row {
                let ch = slot.as_ref().map(Cell::to_char).unwrap_or('.');
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_rejects_zero_dimensions() {
        assert_eq!(Grid::new(0, 5).unwrap_err(), GridError::ZeroRows);
        assert_eq!(Grid::new(6, 0).unwrap_err(), GridError::ZeroCols);
    }

    #[test]
    fn test_grid_rejects_oversized_dimensions() {
        assert_eq!(
            Grid::new(usize::MAX, 2).unwrap_err(),
            GridError::TooLarge {
                rows: usize::MAX,
                cols: 2
            }
        );
        assert!(matches!(
            Grid::new(2, usize::MAX / 2),
            Err(GridError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_place_refuses_overwrite() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.place(1, 1, Cell::confirmed(Outcome::Banker, 1)).unwrap();
        let err = grid
            .place(1, 1, Cell::preview(Outcome::Player, 2))
            .unwrap_err();
        assert_eq!(err, GridError::Occupied { row: 1, col: 1 });
        assert_eq!(grid.get(1, 1), Some(&Cell::confirmed(Outcome::Banker, 1)));
    }

    #[test]
    fn test_place_out_of_bounds() {
        let mut grid = Grid::new(2, 3).unwrap();
        let err = grid
            .place(2, 0, Cell::confirmed(Outcome::Player, 1))
            .unwrap_err();
        assert!(matches!(err, GridError::OutOfBounds { row: 2, col: 0, .. }));
        assert!(!grid.is_occupied(9, 9));
    }

    #[test]
    fn test_cells_iterate_column_major() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.place(0, 1, Cell::confirmed(Outcome::Banker, 3)).unwrap();
        grid.place(1, 0, Cell::confirmed(Outcome::Player, 2)).unwrap();
        grid.place(0, 0, Cell::confirmed(Outcome::Player, 1)).unwrap();

        let order: Vec<usize> = grid.cells().map(|(_, c)| c.source_index).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(grid.position_of(3), Some(Position::new(0, 1)));
        assert_eq!(grid.position_of(4), None);
    }

    #[test]
    fn test_counts_and_display() {
        let mut grid = Grid::new(2, 3).unwrap();
        grid.place(0, 0, Cell::confirmed(Outcome::Player, 1)).unwrap();
        grid.place(0, 1, Cell::preview(Outcome::Banker, 2)).unwrap();

        assert_eq!(grid.placed_count(), 2);
        assert_eq!(grid.confirmed_count(), 1);
        assert_eq!(grid.preview_count(), 1);
        assert_eq!(grid.to_string(), "Pb.\n...");
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let mut a = Grid::new(6, 4).unwrap();
        let b = Grid::new(6, 4).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());

        a.place(0, 0, Cell::confirmed(Outcome::Player, 1)).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());

        let transposed = Grid::new(4, 6).unwrap();
        assert_ne!(b.fingerprint(), transposed.fingerprint());
    }
}
