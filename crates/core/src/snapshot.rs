use crate::cell::{Cell, CellState};
use crate::types::{Axis, CellId, CellKind, Color};

/// Flat, presentation-friendly view of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellView {
    pub id: CellId,
    pub x: u8,
    pub y: u8,
    pub kind: CellKind,
    pub color: Color,
    pub score: Option<u32>,
    pub axis: Option<Axis>,
}

impl CellView {
    pub fn new(cell: &Cell, x: usize, y: usize) -> Self {
        let axis = match cell.state {
            CellState::Fusion { axis, .. } => Some(axis),
            _ => None,
        };
        Self {
            id: cell.id,
            x: x as u8,
            y: y as u8,
            kind: cell.kind(),
            color: cell.color,
            score: cell.score(),
            axis,
        }
    }
}

/// Everything an observer needs to draw or evaluate a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub seed: String,
    pub episode_id: u32,
    pub cols: u8,
    pub rows: u8,
    pub score: u32,
    pub moves_left: u32,
    pub settled: bool,
    pub finished: bool,
    /// Sorted by id so the list order is stable across ticks
    pub cells: Vec<CellView>,
    /// Replay id of the moves played so far
    pub moves: String,
}

impl SessionSnapshot {
    /// Input would be accepted right now
    pub fn playable(&self) -> bool {
        self.settled && !self.finished && self.moves_left > 0
    }

    pub fn cell(&self, id: CellId) -> Option<&CellView> {
        self.cells
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|i| &self.cells[i])
    }

    pub fn cell_at(&self, x: u8, y: u8) -> Option<&CellView> {
        self.cells.iter().find(|c| c.x == x && c.y == y)
    }
}
