//! fusegrid (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so binaries, tests and benches
//! can use `fusegrid::{core,engine,input,adapter,types}`.

pub use fusegrid_adapter as adapter;
pub use fusegrid_core as core;
pub use fusegrid_engine as engine;
pub use fusegrid_input as input;
pub use fusegrid_types as types;
