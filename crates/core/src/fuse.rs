//! Fuse detection - local window heuristic
//!
//! For a candidate at `(x, y)` two 4-cell windows are sampled: `[x-2, x-1, x+1, x+2]`
//! on its row and `[y-2, y-1, y+1, y+2]` on its column. An axis fuses when any two
//! adjacent window slots are both fusable with the candidate's color.
//!
//! This is evaluated independently for every cell on every tick. There is no global
//! run extraction, so overlapping runs each score on their own. Scoring depends on
//! this exact rule; keep it as is.

use crate::matrix::Matrix;
use crate::types::{Axis, Color};

/// Offsets sampled on each side of the candidate
const WINDOW: [isize; 4] = [-2, -1, 1, 2];

/// Which axes a candidate fuses along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FuseAxes {
    pub horizontal: bool,
    pub vertical: bool,
}

impl FuseAxes {
    pub fn any(&self) -> bool {
        self.horizontal || self.vertical
    }

    pub fn both(&self) -> bool {
        self.horizontal && self.vertical
    }

    /// The single fusing axis; horizontal wins when both fuse
    pub fn axis(&self) -> Option<Axis> {
        if self.horizontal {
            Some(Axis::Horizontal)
        } else if self.vertical {
            Some(Axis::Vertical)
        } else {
            None
        }
    }
}

/// True iff `(x, y)` is in bounds and holds a fusable cell of `color`.
pub fn can_fuse(matrix: &Matrix, x: isize, y: isize, color: Color) -> bool {
    matrix
        .get_signed(x, y)
        .map(|cell| cell.is_fusable() && cell.color == color)
        .unwrap_or(false)
}

#[inline]
fn window_fuses(w: [bool; 4]) -> bool {
    (w[0] && w[1]) || (w[1] && w[2]) || (w[2] && w[3])
}

/// Evaluate both windows around `(x, y)` for `color`.
pub fn fuse_axes(matrix: &Matrix, x: usize, y: usize, color: Color) -> FuseAxes {
    let (x, y) = (x as isize, y as isize);
    let h = WINDOW.map(|d| can_fuse(matrix, x + d, y, color));
    let v = WINDOW.map(|d| can_fuse(matrix, x, y + d, color));

    FuseAxes {
        horizontal: window_fuses(h),
        vertical: window_fuses(v),
    }
}
