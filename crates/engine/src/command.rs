use thiserror::Error;

use crate::core::{CellState, GameSession};
use crate::types::{CellId, Direction, Move};

/// A player command, in any of the forms the session understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Click(CellId),
    Swipe(CellId, Direction),
    /// Positional form, as stored in a move log
    Move(Move),
}

impl From<Move> for Command {
    fn from(m: Move) -> Self {
        Command::Move(m)
    }
}

/// Why a command was turned away. The session is untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("game is finished")]
    Finished,
    #[error("no moves left")]
    NoMovesLeft,
    #[error("board is still resolving")]
    NotSettled,
    #[error("no cell with that id")]
    UnknownCell,
    #[error("position is outside the board")]
    OutOfBounds,
    #[error("only idle cells can be tapped")]
    NotIdle,
    #[error("swipe would leave the board")]
    OffEdge,
}

impl CommandError {
    /// Coarse class used on the wire: `not_playable` or `invalid_command`
    pub fn code(self) -> &'static str {
        match self {
            CommandError::Finished | CommandError::NoMovesLeft | CommandError::NotSettled => {
                "not_playable"
            }
            CommandError::UnknownCell
            | CommandError::OutOfBounds
            | CommandError::NotIdle
            | CommandError::OffEdge => "invalid_command",
        }
    }
}

fn check_playable(session: &GameSession) -> Result<(), CommandError> {
    if session.is_finished() {
        return Err(CommandError::Finished);
    }
    if session.moves_left() < 1 {
        return Err(CommandError::NoMovesLeft);
    }
    if !session.is_settled() {
        return Err(CommandError::NotSettled);
    }
    Ok(())
}

fn resolve(session: &GameSession, command: &Command) -> Result<(CellId, Option<Direction>), CommandError> {
    match *command {
        Command::Click(id) => Ok((id, None)),
        Command::Swipe(id, direction) => Ok((id, Some(direction))),
        Command::Move(m) => session
            .matrix()
            .get(m.x as usize, m.y as usize)
            .map(|cell| (cell.id, m.direction))
            .ok_or(CommandError::OutOfBounds),
    }
}

/// Apply a command, explaining why it was rejected.
///
/// The session itself only reports accept/reject; this classifies the rejection
/// for clients. The session is untouched on error.
pub fn apply_command(session: &mut GameSession, command: &Command) -> Result<(), CommandError> {
    check_playable(session)?;
    let (id, direction) = resolve(session, command)?;

    let matrix = session.matrix();
    let (x, y) = matrix.position_of(id).ok_or(CommandError::UnknownCell)?;

    let accepted = match direction {
        None => {
            let idle = matrix
                .get(x, y)
                .map(|c| c.state == CellState::Idle)
                .unwrap_or(false);
            if !idle {
                return Err(CommandError::NotIdle);
            }
            session.click(id)
        }
        Some(direction) => {
            let (dx, dy) = direction.offset();
            if !matrix.contains(x as isize + dx as isize, y as isize + dy as isize) {
                return Err(CommandError::OffEdge);
            }
            session.swipe(id, direction)
        }
    };

    debug_assert!(accepted);
    Ok(())
}
