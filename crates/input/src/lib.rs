//! Pointer input module (engine-facing).
//!
//! This module is independent of any UI framework. A presentation layer feeds it
//! raw press/move/release coordinates (in pixels) together with the id of the
//! pressed cell, and gets back abstract [`Gesture`]s that map one-to-one onto
//! session commands.

pub mod gesture;

pub use fusegrid_types as types;

pub use gesture::{direction_from_delta, Gesture, PressTracker};
