//! Engine-level helpers built on top of `fusegrid-core`.
//!
//! - [`command`]: apply player commands with a reason on rejection
//! - [`scheduler`]: wall-clock pacing of ticks and the finish delay
//! - [`replay`]: paced or instant playback of a move log

pub mod command;
pub mod replay;
pub mod scheduler;

pub use fusegrid_core as core;
pub use fusegrid_types as types;

pub use command::{apply_command, Command, CommandError};
pub use replay::{replay_to_end, ReplayPlayer};
pub use scheduler::Scheduler;
