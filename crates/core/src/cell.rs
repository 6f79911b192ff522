//! Cell module - per-cell state machine
//!
//! A cell keeps its id and color for its whole lifetime; only its [`CellState`]
//! changes. [`transition`] computes what a cell becomes on the next tick from a
//! read-only view of the pre-tick matrix.

use crate::fuse::fuse_axes;
use crate::matrix::Matrix;
use crate::rng::SeededRng;
use crate::types::{Axis, CellId, CellKind, Color, FUSION_SCORE};

/// Lifecycle state of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Freshly spawned above the column, not yet dropped in
    Spawning,
    /// Finished its drop-in beat; evaluated for fusion next tick
    Dropped,
    /// At rest
    Idle,
    /// Tapped by the player, removed on the next refill
    Clicked,
    /// Part of a run along `axis`
    Fusion { axis: Axis, score: u32 },
    /// Score is being shown
    ScoreEnter { score: u32 },
    /// Score leaves play this tick
    ScoreExit { score: u32 },
    /// Dormant bomb
    Bomb,
    /// Bomb waiting for a settled board to detonate
    BombIgnited,
    /// Bomb that just detonated
    BombDetonated { score: u32 },
}

impl CellState {
    pub fn kind(&self) -> CellKind {
        match self {
            CellState::Spawning => CellKind::Spawning,
            CellState::Dropped => CellKind::Dropped,
            CellState::Idle => CellKind::Idle,
            CellState::Clicked => CellKind::Clicked,
            CellState::Fusion { .. } => CellKind::Fusion,
            CellState::ScoreEnter { .. } => CellKind::ScoreEnter,
            CellState::ScoreExit { .. } => CellKind::ScoreExit,
            CellState::Bomb => CellKind::Bomb,
            CellState::BombIgnited => CellKind::BombIgnited,
            CellState::BombDetonated { .. } => CellKind::BombDetonated,
        }
    }

    /// Score payload, for the variants that carry one
    pub fn score(&self) -> Option<u32> {
        match *self {
            CellState::Fusion { score, .. }
            | CellState::ScoreEnter { score }
            | CellState::ScoreExit { score }
            | CellState::BombDetonated { score } => Some(score),
            _ => None,
        }
    }
}

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub id: CellId,
    pub color: Color,
    pub state: CellState,
}

impl Cell {
    pub fn new(id: CellId, color: Color, state: CellState) -> Self {
        Self { id, color, state }
    }

    /// Same cell (id and color preserved) in a new state
    pub fn with_state(self, state: CellState) -> Self {
        Self { state, ..self }
    }

    pub fn kind(&self) -> CellKind {
        self.state.kind()
    }

    pub fn score(&self) -> Option<u32> {
        self.state.score()
    }

    /// Can take part in a run
    pub fn is_fusable(&self) -> bool {
        matches!(
            self.state,
            CellState::Idle | CellState::Dropped | CellState::Bomb | CellState::BombIgnited
        )
    }

    /// At rest: the grid is settled when every cell is
    pub fn is_settled(&self) -> bool {
        matches!(self.state, CellState::Idle | CellState::Bomb)
    }

    /// Mid-animation; a detonation waits until no cell is busy
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            CellState::Fusion { .. }
                | CellState::ScoreEnter { .. }
                | CellState::ScoreExit { .. }
                | CellState::Spawning
                | CellState::Dropped
                | CellState::BombDetonated { .. }
        )
    }

    /// Leaves its column on the next refill
    pub fn is_doomed(&self) -> bool {
        matches!(self.state, CellState::Clicked | CellState::ScoreExit { .. })
    }
}

/// Compute the next state of the cell at `(x, y)`.
///
/// Neighbor context is read from `matrix`, which must be the pre-tick snapshot.
/// `Clicked`, `BombIgnited` and `ScoreExit` are left unchanged: they are handled
/// by commands, bomb resolution and refill respectively.
pub fn transition(cell: &Cell, x: usize, y: usize, matrix: &Matrix) -> Cell {
    match cell.state {
        CellState::Spawning => cell.with_state(CellState::Dropped),
        CellState::Dropped | CellState::Idle | CellState::Bomb => {
            let axes = fuse_axes(matrix, x, y, cell.color);

            if cell.state == CellState::Bomb {
                return if axes.any() {
                    cell.with_state(CellState::BombIgnited)
                } else {
                    *cell
                };
            }

            if axes.both() {
                cell.with_state(CellState::Bomb)
            } else if let Some(axis) = axes.axis() {
                cell.with_state(CellState::Fusion {
                    axis,
                    score: FUSION_SCORE,
                })
            } else {
                cell.with_state(CellState::Idle)
            }
        }
        CellState::Fusion { score, .. } => cell.with_state(CellState::ScoreEnter { score }),
        CellState::ScoreEnter { score } => cell.with_state(CellState::ScoreExit { score }),
        CellState::BombDetonated { score } => cell.with_state(CellState::ScoreEnter { score }),
        CellState::Clicked | CellState::BombIgnited | CellState::ScoreExit { .. } => *cell,
    }
}

/// Mints new cells: fresh ids from a serial, colors from the seeded stream.
///
/// Each cell costs exactly one draw (`Color::ALL[next_index(5)]`) and ids never
/// touch the stream. Builds that round a draw to a color and then spend a second
/// draw on a random id consume the stream twice as fast, so their daily boards
/// cannot be reproduced from the same seed here.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: SeededRng,
    next_id: u32,
}

impl Spawner {
    pub fn new(rng: SeededRng) -> Self {
        Self { rng, next_id: 1 }
    }

    pub fn from_seed(seed: &str) -> Self {
        Self::new(SeededRng::from_seed(seed))
    }

    /// Continue the serial at `next_id` (for boards built outside the spawner)
    pub fn with_next_id(mut self, next_id: u32) -> Self {
        self.next_id = next_id.max(1);
        self
    }

    /// Spawn a new cell in the `Spawning` state
    pub fn spawn(&mut self) -> Cell {
        let color = Color::ALL[self.rng.next_index(Color::COUNT)];
        let id = CellId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        Cell::new(id, color, CellState::Spawning)
    }

    /// Number of cells minted so far
    pub fn minted(&self) -> u32 {
        self.next_id - 1
    }
}
