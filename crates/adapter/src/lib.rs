//! Adapter module - drive a session over TCP with a JSON protocol
//!
//! This crate lets an external presentation layer or bot play a fusegrid
//! session through a TCP socket, and lets any number of observers watch.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7777)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Observation Streaming**: Server sends a full observation after each change
//! 5. **Commanding**: Controller sends commands; each is acked once applied
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and requested capabilities
//! - **command**: `click` a cell id, `swipe` a cell id, `move` by position, or `restart`
//! - **control**: Claim or release controller status
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello with role and capabilities
//! - **observation**: Cells (sorted by id), score, moves left, move log, last tick event
//! - **ack**: Command applied
//! - **error**: Error response with code and message
//!
//! | Error code | Meaning |
//! |------------|---------|
//! | `handshake_required` | command/control before hello |
//! | `protocol_mismatch` | hello announced another major version |
//! | `not_controller` | command or release from an observer |
//! | `controller_active` | claim while another client controls |
//! | `invalid_command` | malformed message, stale `seq`, or rejected by the session |
//! | `backpressure` | the game loop's queue is full |
//!
//! # Environment Variables
//!
//! - `FUSEGRID_HOST`: Bind address (default: "127.0.0.1")
//! - `FUSEGRID_PORT`: Port number (default: 7777)
//! - `FUSEGRID_MAX_PENDING`: Command queue depth (default: 10)
//! - `FUSEGRID_LOG_PATH`: Append all wire traffic to this file
//! - `FUSEGRID_DISABLED`: Set to "1" or "true" to disable the adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1,"client":{"name":"bot","version":"1.0.0"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":2,"protocol_version":"1.0.0","client_id":1,"role":"controller",...}
//! Server -> Client: {"type":"observation","seq":1,"ts":3,"playable":true,"cells":[...],...}
//! Client -> Server: {"type":"command","seq":2,"ts":4,"mode":"swipe","id":"17","direction":"left"}
//! Server -> Client: {"type":"ack","seq":2,"ts":5,"status":"ok"}
//! ```

pub mod host;
pub mod protocol;
pub mod runtime;
pub mod server;

pub use fusegrid_core as core;
pub use fusegrid_engine as engine;
pub use fusegrid_types as types;

pub use host::SessionHost;
pub use protocol::*;
pub use runtime::{Adapter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{build_observation, run_server, state_hash, ServerConfig, ServerState};
