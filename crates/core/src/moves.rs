//! Move log and replay codec
//!
//! A replay id is the list of accepted moves, each encoded as a three digit token
//! `"{x}{y}{d}"` and joined with `-`:
//!
//! | Digit | Meaning |
//! |-------|---------|
//! | `x`, `y` | grid position, `0..=9` |
//! | `d` | `0` tap, `1` up, `2` down, `3` left, `4` right |
//!
//! e.g. `"120-342"` is a tap at (1, 2) followed by a down swipe at (3, 4).
//! The empty string is the empty log.

use std::fmt;
use std::str::FromStr;

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::types::{Direction, Move};

const TOKEN_LEN: usize = 3;
const SEPARATOR: &str = "-";

/// Errors produced while decoding a replay id
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("move #{index} `{token}` must be exactly 3 digits")]
    TokenLength { index: usize, token: String },
    #[error("move #{index} `{token}` contains a non-digit character")]
    NonDigit { index: usize, token: String },
    #[error("move #{index} has direction code {code}, expected 0-4")]
    BadDirection { index: usize, code: u8 },
}

fn encode_move(m: &Move) -> String {
    let d = m.direction.map(|d| d.code()).unwrap_or(0);
    format!("{}{}{}", m.x, m.y, d)
}

/// Encode moves as a replay id
pub fn encode_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(encode_move)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

fn decode_token(index: usize, token: &str) -> Result<Move, DecodeError> {
    if token.chars().count() != TOKEN_LEN {
        return Err(DecodeError::TokenLength {
            index,
            token: token.to_string(),
        });
    }
    let digits: ArrayVec<u8, TOKEN_LEN> = token
        .chars()
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect::<Option<_>>()
        .ok_or_else(|| DecodeError::NonDigit {
            index,
            token: token.to_string(),
        })?;

    let (x, y, code) = (digits[0], digits[1], digits[2]);
    let direction = match code {
        0 => None,
        c => Some(Direction::from_code(c).ok_or(DecodeError::BadDirection { index, code: c })?),
    };
    Ok(Move { x, y, direction })
}

/// Decode a replay id back into moves, failing on the first malformed token
pub fn decode_moves(encoded: &str) -> Result<Vec<Move>, DecodeError> {
    if encoded.is_empty() {
        return Ok(Vec::new());
    }
    encoded
        .split(SEPARATOR)
        .enumerate()
        .map(|(i, token)| decode_token(i, token))
        .collect()
}

/// Ordered record of accepted moves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveLog {
    moves: Vec<Move>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// The replay id for this log
    pub fn encode(&self) -> String {
        encode_moves(&self.moves)
    }
}

impl From<Vec<Move>> for MoveLog {
    fn from(moves: Vec<Move>) -> Self {
        Self { moves }
    }
}

impl fmt::Display for MoveLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for MoveLog {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_moves(s).map(MoveLog::from)
    }
}
