//! Bomb module - ignition and detonation
//!
//! Bombs are formed by the cell state machine when a cell fuses along both axes.
//! Once ignited they wait for the board to calm down: a detonation only happens
//! while no cell is busy, and at most one bomb goes off per tick.
//!
//! | Blast target | Result |
//! |--------------|--------|
//! | the bomb itself | `BombDetonated { score: 100 }` |
//! | `Idle` / `Dropped` neighbor | `ScoreEnter { score: 10 }` |
//! | `Bomb` neighbor | `BombIgnited` (chain) |
//! | anything else | untouched |

use arrayvec::ArrayVec;

use crate::cell::CellState;
use crate::matrix::Matrix;
use crate::types::{BLAST_SCORE, DETONATION_SCORE};

/// What a single detonation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detonation {
    pub x: usize,
    pub y: usize,
    /// Neighbors turned into `ScoreEnter`
    pub caught: u32,
    /// Neighboring bombs ignited by the blast
    pub chained: u32,
}

impl Detonation {
    /// Total score the blast will eventually pay out
    pub fn payout(&self) -> u32 {
        DETONATION_SCORE + self.caught * BLAST_SCORE
    }
}

/// True while any cell is still animating, which holds back detonation
pub fn is_waiting_for_detonation(matrix: &Matrix) -> bool {
    matrix.iter().any(|(_, _, cell)| cell.is_busy())
}

/// The in-bounds 3x3 neighborhood of `(x, y)`, including the center
fn neighborhood(matrix: &Matrix, x: usize, y: usize) -> ArrayVec<(usize, usize), 9> {
    let mut out = ArrayVec::new();
    for dx in -1isize..=1 {
        for dy in -1isize..=1 {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if matrix.contains(nx, ny) {
                out.push((nx as usize, ny as usize));
            }
        }
    }
    out
}

/// Detonate the first ignited bomb in scan order, if the board allows it.
///
/// Returns the matrix unchanged and `None` when there is no ignited bomb or a
/// busy cell is still in play.
pub fn detonate_bombs(matrix: Matrix) -> (Matrix, Option<Detonation>) {
    let Some((x, y, _)) = matrix.find(|cell| cell.state == CellState::BombIgnited) else {
        return (matrix, None);
    };
    if is_waiting_for_detonation(&matrix) {
        return (matrix, None);
    }
    detonate_at(matrix, x, y)
}

/// Detonate the bomb at `(x, y)`; a no-op unless that cell is `BombIgnited`.
pub fn detonate_at(mut matrix: Matrix, x: usize, y: usize) -> (Matrix, Option<Detonation>) {
    match matrix.get(x, y) {
        Some(cell) if cell.state == CellState::BombIgnited => {}
        _ => return (matrix, None),
    }

    let mut detonation = Detonation {
        x,
        y,
        caught: 0,
        chained: 0,
    };

    for (cx, cy) in neighborhood(&matrix, x, y) {
        let Some(cell) = matrix.get(cx, cy).copied() else {
            continue;
        };
        let next = if (cx, cy) == (x, y) {
            CellState::BombDetonated {
                score: DETONATION_SCORE,
            }
        } else {
            match cell.state {
                CellState::Idle | CellState::Dropped => {
                    detonation.caught += 1;
                    CellState::ScoreEnter { score: BLAST_SCORE }
                }
                CellState::Bomb => {
                    detonation.chained += 1;
                    CellState::BombIgnited
                }
                _ => continue,
            }
        };
        matrix.set(cx, cy, cell.with_state(next));
    }

    log::debug!(
        "bomb detonated at ({}, {}): caught={} chained={}",
        x,
        y,
        detonation.caught,
        detonation.chained
    );
    (matrix, Some(detonation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::test_support::matrix_from_rows;

    fn grid_3x3_with_center(state: CellState) -> Matrix {
        let mut m = matrix_from_rows(&["BGY", "GYB", "YBG"]);
        let c = m.get(1, 1).unwrap().with_state(state);
        m.set(1, 1, c);
        m
    }

    #[test]
    fn test_interior_detonation_catches_eight() {
        let m = grid_3x3_with_center(CellState::BombIgnited);
        let (next, det) = detonate_bombs(m);
        let det = det.expect("should detonate");
        assert_eq!((det.x, det.y), (1, 1));
        assert_eq!(det.caught, 8);
        assert_eq!(det.payout(), 180);
        assert_eq!(
            next.get(1, 1).unwrap().state,
            CellState::BombDetonated { score: 100 }
        );
        assert_eq!(
            next.get(0, 0).unwrap().state,
            CellState::ScoreEnter { score: 10 }
        );
    }

    #[test]
    fn test_corner_detonation_catches_three() {
        let mut m = matrix_from_rows(&["BGY", "GYB", "YBG"]);
        let c = m.get(0, 0).unwrap().with_state(CellState::BombIgnited);
        m.set(0, 0, c);
        let (_, det) = detonate_bombs(m);
        assert_eq!(det.unwrap().caught, 3);
    }

    #[test]
    fn test_edge_detonation_catches_five() {
        let mut m = matrix_from_rows(&["BGY", "GYB", "YBG"]);
        let c = m.get(1, 0).unwrap().with_state(CellState::BombIgnited);
        m.set(1, 0, c);
        let (_, det) = detonate_bombs(m);
        assert_eq!(det.unwrap().caught, 5);
    }

    #[test]
    fn test_blast_chains_dormant_bombs() {
        let mut m = grid_3x3_with_center(CellState::BombIgnited);
        let b = m.get(2, 2).unwrap().with_state(CellState::Bomb);
        m.set(2, 2, b);
        let (next, det) = detonate_bombs(m);
        let det = det.unwrap();
        assert_eq!(det.chained, 1);
        assert_eq!(det.caught, 7);
        assert_eq!(next.get(2, 2).unwrap().state, CellState::BombIgnited);
    }

    #[test]
    fn test_blast_scores_dropped_neighbors() {
        let mut m = grid_3x3_with_center(CellState::BombIgnited);
        for (x, y) in [(0, 0), (2, 1)] {
            let c = m.get(x, y).unwrap().with_state(CellState::Dropped);
            m.set(x, y, c);
        }
        // Dropped cells hold back `detonate_bombs`, but a direct blast still takes them.
        assert!(detonate_bombs(m.clone()).1.is_none());
        let (next, det) = detonate_at(m, 1, 1);
        let det = det.unwrap();
        assert_eq!(det.caught, 8);
        assert_eq!(det.payout(), 180);
        for (x, y) in [(0, 0), (2, 1)] {
            assert_eq!(
                next.get(x, y).unwrap().state,
                CellState::ScoreEnter { score: 10 }
            );
        }
    }

    #[test]
    fn test_waits_for_busy_cells() {
        let mut m = grid_3x3_with_center(CellState::BombIgnited);
        let busy = m.get(0, 2).unwrap().with_state(CellState::Spawning);
        m.set(0, 2, busy);
        let (next, det) = detonate_bombs(m.clone());
        assert!(det.is_none());
        assert_eq!(next, m);
    }

    #[test]
    fn test_only_first_in_scan_order() {
        let mut m = matrix_from_rows(&["BGYBG", "GYBGY", "YBGYB"]);
        for x in [0, 4] {
            let b = m.get(x, 1).unwrap().with_state(CellState::BombIgnited);
            m.set(x, 1, b);
        }
        let (next, det) = detonate_bombs(m);
        assert_eq!(det.map(|d| (d.x, d.y)), Some((0, 1)));
        assert_eq!(next.get(4, 1).unwrap().state, CellState::BombIgnited);
    }

    #[test]
    fn test_clicked_neighbor_untouched() {
        let mut m = grid_3x3_with_center(CellState::BombIgnited);
        let clicked = m.get(1, 0).unwrap().with_state(CellState::Clicked);
        m.set(1, 0, clicked);
        // Clicked is not busy, so the bomb still goes off.
        let (next, det) = detonate_bombs(m);
        assert_eq!(det.unwrap().caught, 7);
        assert_eq!(next.get(1, 0).unwrap().state, CellState::Clicked);
    }

    #[test]
    fn test_detonate_at_requires_ignited() {
        let m = grid_3x3_with_center(CellState::Bomb);
        let (next, det) = detonate_at(m.clone(), 1, 1);
        assert!(det.is_none());
        assert_eq!(next, m);
    }
}
