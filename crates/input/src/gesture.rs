//! Press tracking for pointer and touch input.
//!
//! A press starts on a cell and is resolved either when the pointer travels past
//! the swipe threshold (the swipe fires immediately) or when it is released (tap
//! if it never left the threshold box, swipe otherwise).

use crate::types::{CellId, Direction, SWIPE_THRESHOLD_PX};

/// Resolved pointer gesture, addressed by cell id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Tap(CellId),
    Swipe(CellId, Direction),
}

impl Gesture {
    pub fn cell(&self) -> CellId {
        match *self {
            Gesture::Tap(id) | Gesture::Swipe(id, _) => id,
        }
    }
}

/// Dominant direction of a pointer delta.
///
/// Horizontal wins only when strictly larger; ties (including no movement at
/// all) resolve vertically, and a zero vertical delta reads as up.
pub fn direction_from_delta(dx: f32, dy: f32) -> Direction {
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    id: CellId,
    x: f32,
    y: f32,
}

/// Tracks at most one active press.
#[derive(Debug, Clone)]
pub struct PressTracker {
    press: Option<Press>,
    threshold: f32,
}

impl Default for PressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PressTracker {
    pub fn new() -> Self {
        Self::with_threshold(SWIPE_THRESHOLD_PX)
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            press: None,
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Begin a press on `id`; replaces any press in progress.
    pub fn start(&mut self, id: CellId, x: f32, y: f32) {
        self.press = Some(Press { id, x, y });
    }

    fn within_threshold(&self, dx: f32, dy: f32) -> bool {
        dx.abs() < self.threshold && dy.abs() < self.threshold
    }

    /// Pointer moved; fires a swipe once the threshold is crossed.
    pub fn moved(&mut self, x: f32, y: f32) -> Option<Gesture> {
        let press = self.press?;
        let (dx, dy) = (x - press.x, y - press.y);
        if self.within_threshold(dx, dy) {
            return None;
        }
        self.press = None;
        Some(Gesture::Swipe(press.id, direction_from_delta(dx, dy)))
    }

    /// Pointer released; always ends the press.
    pub fn end(&mut self, x: f32, y: f32) -> Option<Gesture> {
        let press = self.press.take()?;
        let (dx, dy) = (x - press.x, y - press.y);
        if self.within_threshold(dx, dy) {
            Some(Gesture::Tap(press.id))
        } else {
            Some(Gesture::Swipe(press.id, direction_from_delta(dx, dy)))
        }
    }

    /// Drop the press without producing a gesture (pointer left the board).
    pub fn cancel(&mut self) {
        self.press = None;
    }
}
