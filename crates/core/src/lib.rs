//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the grid simulation: cell lifecycle, run detection, bombs,
//! refills, scoring and the replay codec. It performs **no I/O** and keeps no clock,
//! making it:
//!
//! - **Deterministic**: the same seed and the same moves produce the same game
//! - **Testable**: every rule can be exercised on a hand-built matrix
//! - **Portable**: drive it from a terminal, a socket, a test or a browser
//!
//! # Module Structure
//!
//! - [`rng`]: string-seeded generator and daily seeds
//! - [`cell`]: cell states, the per-tick transition and the cell spawner
//! - [`fuse`]: the local window rule that decides when a cell is part of a run
//! - [`matrix`]: the column-major grid and the tick steps that operate on it
//! - [`bomb`]: detonation of ignited bombs
//! - [`moves`]: move log and replay id codec
//! - [`graveyard`]: per-color tally of cleared cells and detonated bombs
//! - [`session`]: the [`GameSession`] facade tying it all together
//! - [`snapshot`]: flat projections for observers
//!
//! # Game Rules
//!
//! - **Runs**: three or more same-colored cells in a row or column fuse and score
//!   1 point each
//! - **Bombs**: a cell that fuses along both axes at once becomes a bomb instead
//! - **Detonation**: an ignited bomb explodes on a calm board, scoring 100 plus 10
//!   per caught neighbor
//! - **Moves**: tapping an idle cell removes it; swiping swaps it with a neighbor;
//!   each costs one move
//! - **End**: when moves run out, every bomb is ignited and the game finishes once
//!   the board comes to rest
//!
//! # Example
//!
//! ```
//! use fusegrid_core::GameSession;
//! use fusegrid_types::Move;
//!
//! let mut game = GameSession::new("2024-1-1", 30);
//!
//! // The opening board drops in and resolves any accidental runs.
//! while !game.is_settled() {
//!     game.tick();
//! }
//!
//! assert!(game.apply_move(&Move::tap(2, 7)));
//! assert_eq!(game.moves_left(), 29);
//! assert_eq!(game.encoded_moves(), "270");
//! ```
//!
//! # Timing
//!
//! Ticks are discrete; the session never looks at a clock. Callers are expected
//! to tick every `tick_ms` (300ms) while [`GameSession::needs_tick`] is true, and to
//! wait `finish_delay_ms` (1000ms) before the finishing tick.

pub mod bomb;
pub mod cell;
pub mod fuse;
pub mod graveyard;
pub mod matrix;
pub mod moves;
pub mod rng;
pub mod session;
pub mod snapshot;

pub use fusegrid_types as types;

// Re-export commonly used types for convenience
pub use bomb::{detonate_bombs, Detonation};
pub use cell::{transition, Cell, CellState, Spawner};
pub use graveyard::{Graveyard, GraveyardStat, Tomb};
pub use matrix::Matrix;
pub use moves::{decode_moves, encode_moves, DecodeError, MoveLog};
pub use rng::{clock_seed, daily_seed, today_seed, SeededRng};
pub use session::{ConfigError, GameConfig, GameSession};
pub use snapshot::{CellView, SessionSnapshot};
