//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental vocabulary used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (simulation, gesture decoding, wire protocol).
//!
//! # Grid Dimensions
//!
//! The reference board is 5 columns by 8 rows, indexed `[x][y]` with `y = 0` at
//! the top. Cells fall downward as `y` increases.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 300 | Interval between simulation ticks while the grid is dirty |
//! | `FINISH_DELAY_MS` | 1000 | Delay before the finishing tick once moves are exhausted |
//! | `REPLAY_MOVE_DELAY_MS` | 1000 | Pacing between replayed moves |
//!
//! # Scoring
//!
//! | Constant | Value |
//! |----------|-------|
//! | `FUSION_SCORE` | 1 per fused cell |
//! | `DETONATION_SCORE` | 100 for the detonated bomb |
//! | `BLAST_SCORE` | 10 per caught neighbor |
//!
//! # Examples
//!
//! ```
//! use fusegrid_types::{Color, Direction, Move, DEFAULT_COLS, DEFAULT_ROWS};
//!
//! assert_eq!(Color::from_index(2), Some(Color::Yellow));
//! assert_eq!(Direction::from_code(3), Some(Direction::Left));
//! assert_eq!(Direction::Left.offset(), (-1, 0));
//!
//! let m = Move::swipe(1, 2, Direction::Up);
//! assert_eq!(m.direction, Some(Direction::Up));
//!
//! assert_eq!(DEFAULT_COLS, 5);
//! assert_eq!(DEFAULT_ROWS, 8);
//! ```

use std::fmt;
use std::str::FromStr;

/// Board width in cells (5 columns)
pub const DEFAULT_COLS: u8 = 5;

/// Board height in cells (8 rows)
pub const DEFAULT_ROWS: u8 = 8;

/// Largest dimension the move codec can address with a single digit.
pub const MAX_DIMENSION: u8 = 10;

/// Moves available per game.
pub const DEFAULT_MOVES: u32 = 30;

/// Simulation tick interval while the grid is dirty.
pub const TICK_MS: u32 = 300;

/// Debounce before a settled, out-of-moves game is marked finished.
pub const FINISH_DELAY_MS: u32 = 1000;

/// Pause inserted before each replayed move.
pub const REPLAY_MOVE_DELAY_MS: u32 = 1000;

/// Pointer travel (px, per axis) below which a press counts as a tap.
pub const SWIPE_THRESHOLD_PX: f32 = 5.0;

/// Score carried by every cell that fuses along one axis.
pub const FUSION_SCORE: u32 = 1;

/// Score carried by a bomb that detonates.
pub const DETONATION_SCORE: u32 = 100;

/// Score carried by each neighbor caught in a blast.
pub const BLAST_SCORE: u32 = 10;


/// The five cell colors
///
/// Colors have no numeric meaning beyond identity; [`Color::ALL`] fixes the
/// order used for deterministic selection from a random draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Blue,
    Green,
    Yellow,
    Pink,
    Purple,
}

impl Color {
    pub const COUNT: usize = 5;

    pub const ALL: [Color; Self::COUNT] = [
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Pink,
        Color::Purple,
    ];

    /// Position in [`Color::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Color::Blue => 0,
            Color::Green => 1,
            Color::Yellow => 2,
            Color::Pink => 3,
            Color::Purple => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use fusegrid_types::Color;
    ///
    /// assert_eq!(Color::parse("pink"), Some(Color::Pink));
    /// assert_eq!(Color::parse("BLUE"), Some(Color::Blue));
    /// assert_eq!(Color::parse("teal"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "blue" => Some(Color::Blue),
            "green" => Some(Color::Green),
            "yellow" => Some(Color::Yellow),
            "pink" => Some(Color::Pink),
            "purple" => Some(Color::Purple),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Pink => "pink",
            Color::Purple => "purple",
        }
    }
}

/// Swipe direction
///
/// The numeric codes are part of the replay format: `0` is reserved for a tap,
/// `1..=4` name a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Replay code (`1..=4`)
    pub fn code(&self) -> u8 {
        match self {
            Direction::Up => 1,
            Direction::Down => 2,
            Direction::Left => 3,
            Direction::Right => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Direction::Up),
            2 => Some(Direction::Down),
            3 => Some(Direction::Left),
            4 => Some(Direction::Right),
            _ => None,
        }
    }

    /// Grid offset `(dx, dy)`; `y` grows downward.
    pub fn offset(&self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    /// Accepts full names or single letters (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            _ => Err(()),
        }
    }
}

/// Axis along which a cell fused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        }
    }
}

/// Stable identity of a cell for its whole lifetime
///
/// Ids are minted from a per-session serial and never reused, so a
/// presentation layer can key animations on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u32);

impl CellId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CellId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(CellId)
    }
}

/// An accepted player command, addressed by grid position
///
/// A tap has no direction; a swipe carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub x: u8,
    pub y: u8,
    pub direction: Option<Direction>,
}

impl Move {
    pub fn tap(x: u8, y: u8) -> Self {
        Self {
            x,
            y,
            direction: None,
        }
    }

    pub fn swipe(x: u8, y: u8, direction: Direction) -> Self {
        Self {
            x,
            y,
            direction: Some(direction),
        }
    }

    pub fn is_tap(&self) -> bool {
        self.direction.is_none()
    }
}

/// Variant tag of a cell, without payload
///
/// Used by projections that only need to know which state a cell is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Spawning,
    Dropped,
    Idle,
    Clicked,
    Fusion,
    ScoreEnter,
    ScoreExit,
    Bomb,
    BombIgnited,
    BombDetonated,
}

impl CellKind {
    /// camelCase name for the wire protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Spawning => "spawning",
            CellKind::Dropped => "dropped",
            CellKind::Idle => "idle",
            CellKind::Clicked => "clicked",
            CellKind::Fusion => "fusion",
            CellKind::ScoreEnter => "scoreEnter",
            CellKind::ScoreExit => "scoreExit",
            CellKind::Bomb => "bomb",
            CellKind::BombIgnited => "bombIgnited",
            CellKind::BombDetonated => "bombDetonated",
        }
    }
}

/// Summary of one simulation tick.
///
/// Consumed by collaborators that react to game beats (audio cues, effects).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickEvent {
    /// Cells that entered `Fusion` this tick
    pub fused: u32,
    /// Cells that turned into bombs this tick
    pub bombs_formed: u32,
    /// Bombs that became ignited this tick (fuse, blast or end-of-game)
    pub bombs_ignited: u32,
    /// Position of the bomb detonated this tick, if any
    pub detonation: Option<(u8, u8)>,
    /// Score collected from cells leaving play
    pub score_gained: u32,
    /// Fresh cells spawned to refill columns
    pub spawned: u32,
}

impl TickEvent {
    /// True when nothing audible happened
    pub fn is_quiet(&self) -> bool {
        self.fused == 0
            && self.bombs_formed == 0
            && self.bombs_ignited == 0
            && self.detonation.is_none()
            && self.score_gained == 0
    }
}
