//! Matrix module - the cell grid
//!
//! The grid is stored column-major (`columns[x][y]`) with `y = 0` at the top, so
//! that refilling a column is a matter of prepending: new cells enter from above and
//! everything below shifts down purely by array position.
//!
//! Every tick step takes a matrix and produces a new one. Columns may only differ
//! from `rows` in length transiently inside [`Matrix::fill_gaps`].

use crate::cell::{transition, Cell, CellState, Spawner};
use crate::types::CellId;

/// The game grid - `cols` columns by `rows` rows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix {
    cols: usize,
    rows: usize,
    /// Column-major cells (`columns[x][y]`)
    columns: Vec<Vec<Cell>>,
}

impl Matrix {
    /// Generate a fresh board; every cell starts out `Spawning`.
    ///
    /// Cells are minted column by column, top to bottom.
    pub fn generate(cols: usize, rows: usize, spawner: &mut Spawner) -> Self {
        let columns = (0..cols)
            .map(|_| (0..rows).map(|_| spawner.spawn()).collect())
            .collect();
        Self {
            cols,
            rows,
            columns,
        }
    }

    /// Build a matrix from explicit columns.
    ///
    /// Returns `None` if there are no columns or the columns differ in length.
    pub fn from_columns(columns: Vec<Vec<Cell>>) -> Option<Self> {
        let rows = columns.first()?.len();
        if rows == 0 || columns.iter().any(|c| c.len() != rows) {
            return None;
        }
        Some(Self {
            cols: columns.len(),
            rows,
            columns,
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Columns in left-to-right order
    pub fn columns(&self) -> &[Vec<Cell>] {
        &self.columns
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        self.columns.get(x).and_then(|col| col.get(y))
    }

    /// Same as [`Matrix::get`] for coordinates that may be negative
    pub fn get_signed(&self, x: isize, y: isize) -> Option<&Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.get(x as usize, y as usize)
    }

    /// Replace the cell at (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        match self.columns.get_mut(x).and_then(|col| col.get_mut(y)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is in bounds
    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.cols && (y as usize) < self.rows
    }

    /// Swap the contents of two in-bounds positions
    pub fn swap(&mut self, a: (usize, usize), b: (usize, usize)) -> bool {
        let (Some(ca), Some(cb)) = (self.get(a.0, a.1).copied(), self.get(b.0, b.1).copied())
        else {
            return false;
        };
        self.set(a.0, a.1, cb);
        self.set(b.0, b.1, ca);
        true
    }

    /// Cells with their positions, in scan order (x-major, then y)
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .flat_map(|(x, col)| col.iter().enumerate().map(move |(y, cell)| (x, y, cell)))
    }

    /// First cell in scan order matching `predicate`
    pub fn find<F>(&self, mut predicate: F) -> Option<(usize, usize, &Cell)>
    where
        F: FnMut(&Cell) -> bool,
    {
        self.iter().find(|(_, _, cell)| predicate(cell))
    }

    /// Position of the cell with the given id
    pub fn position_of(&self, id: CellId) -> Option<(usize, usize)> {
        self.find(|cell| cell.id == id).map(|(x, y, _)| (x, y))
    }

    /// Build a new matrix by mapping every cell with its position
    pub fn map_cells<F>(&self, mut f: F) -> Matrix
    where
        F: FnMut(&Cell, usize, usize) -> Cell,
    {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(x, col)| col.iter().enumerate().map(|(y, c)| f(c, x, y)).collect())
            .collect();
        Matrix {
            cols: self.cols,
            rows: self.rows,
            columns,
        }
    }

    /// Apply the per-cell transition to every cell.
    ///
    /// All transitions read from `self`, never from a cell already advanced this
    /// tick.
    pub fn mutate(&self) -> Matrix {
        self.map_cells(|cell, x, y| transition(cell, x, y, self))
    }

    /// Sum of the scores leaving play (cells in `ScoreExit`)
    pub fn collect_score(&self) -> u32 {
        self.iter()
            .filter_map(|(_, _, cell)| match cell.state {
                CellState::ScoreExit { score } => Some(score),
                _ => None,
            })
            .sum()
    }

    /// Drop `Clicked`/`ScoreExit` cells and top every column back up.
    ///
    /// Returns the refilled matrix and the number of cells spawned. Columns are
    /// processed left to right; each column's new cells are minted top to bottom.
    pub fn fill_gaps(self, spawner: &mut Spawner) -> (Matrix, u32) {
        let rows = self.rows;
        let mut spawned = 0u32;
        let columns = self
            .columns
            .into_iter()
            .map(|col| {
                let kept: Vec<Cell> = col.into_iter().filter(|c| !c.is_doomed()).collect();
                let lacking = rows.saturating_sub(kept.len());
                spawned += lacking as u32;
                let mut refilled = Vec::with_capacity(rows);
                refilled.extend((0..lacking).map(|_| spawner.spawn()));
                refilled.extend(kept);
                refilled
            })
            .collect();
        (
            Matrix {
                cols: self.cols,
                rows,
                columns,
            },
            spawned,
        )
    }

    /// True while any cell is mid-transition (anything but `Idle` or `Bomb`)
    pub fn is_dirty(&self) -> bool {
        self.iter().any(|(_, _, cell)| !cell.is_settled())
    }

    /// Ignite every dormant bomb; returns the new matrix and how many were lit
    pub fn ignite_all_bombs(self) -> (Matrix, u32) {
        let mut ignited = 0u32;
        let next = self.map_cells(|cell, _, _| {
            if cell.state == CellState::Bomb {
                ignited += 1;
                cell.with_state(CellState::BombIgnited)
            } else {
                *cell
            }
        });
        (next, ignited)
    }

    /// Every column holds exactly `rows` cells
    pub fn is_well_formed(&self) -> bool {
        self.columns.len() == self.cols && self.columns.iter().all(|c| c.len() == self.rows)
    }

    /// Number of cells in the given state kind
    pub fn count<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&Cell) -> bool,
    {
        self.iter().filter(|(_, _, c)| predicate(c)).count()
    }
}
