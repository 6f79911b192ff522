//! Replay playback.
//!
//! A replay is a seed plus a move log. Playback rebuilds the session from the
//! seed and feeds the logged moves back in, one at a time, whenever the board is
//! ready for input. Moves that no longer apply are skipped rather than aborting
//! the replay.

use std::collections::VecDeque;

use crate::core::{decode_moves, DecodeError, GameSession};
use crate::types::{Move, REPLAY_MOVE_DELAY_MS};
use crate::Scheduler;

/// Tick limit for [`replay_to_end`]; far beyond any real game.
const MAX_TICKS: u32 = 1_000_000;

/// Paced playback of a move log on a fresh session.
#[derive(Debug, Clone)]
pub struct ReplayPlayer {
    scheduler: Scheduler,
    moves: Vec<Move>,
    pending: VecDeque<Move>,
    move_delay_ms: u32,
    waited_ms: u32,
    skipped: u32,
}

impl ReplayPlayer {
    pub fn new(session: GameSession, moves: Vec<Move>) -> Self {
        Self {
            scheduler: Scheduler::new(session),
            pending: moves.iter().copied().collect(),
            moves,
            move_delay_ms: REPLAY_MOVE_DELAY_MS,
            waited_ms: 0,
            skipped: 0,
        }
    }

    /// Replay an encoded move log on the default board
    pub fn from_encoded(seed: &str, encoded: &str, budget: u32) -> Result<Self, DecodeError> {
        let moves = decode_moves(encoded)?;
        Ok(Self::new(GameSession::new(seed, budget), moves))
    }

    pub fn with_move_delay_ms(mut self, delay_ms: u32) -> Self {
        self.move_delay_ms = delay_ms;
        self
    }

    pub fn session(&self) -> &GameSession {
        self.scheduler.session()
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Moves not yet applied or skipped
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Moves the session refused
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// Every move has been fed and the board has nothing left to do
    pub fn is_done(&self) -> bool {
        self.pending.is_empty() && !self.session().needs_tick()
    }

    /// Feed elapsed wall-clock time.
    ///
    /// The board ticks as usual; the next move is applied once the session accepts
    /// input and has done so for the move delay.
    pub fn advance(&mut self, elapsed_ms: u32) {
        let was_ready = self.session().accepts_input();
        self.scheduler.advance(elapsed_ms);

        if self.pending.is_empty() {
            return;
        }
        if self.session().is_finished() {
            self.skip_remaining();
            return;
        }
        if !self.session().accepts_input() || !was_ready {
            // The delay starts from the moment the board became ready.
            self.waited_ms = 0;
            return;
        }

        self.waited_ms = self.waited_ms.saturating_add(elapsed_ms);
        if self.waited_ms >= self.move_delay_ms {
            self.waited_ms = 0;
            self.apply_next();
        }
    }

    /// Apply the next pending move immediately; returns whether it was accepted
    fn apply_next(&mut self) -> bool {
        let Some(m) = self.pending.pop_front() else {
            return false;
        };
        match self.scheduler.apply(&m.into()) {
            Ok(()) => true,
            Err(err) => {
                log::warn!(
                    "replay: skipping move {}{}{} ({})",
                    m.x,
                    m.y,
                    m.direction.map(|d| d.code()).unwrap_or(0),
                    err
                );
                self.skipped += 1;
                false
            }
        }
    }

    fn skip_remaining(&mut self) {
        let n = self.pending.len() as u32;
        if n > 0 {
            log::warn!("replay: game finished with {} moves unplayed", n);
            self.skipped += n;
            self.pending.clear();
        }
    }

    /// Start the replay over from the first move
    pub fn restart(&mut self) {
        self.scheduler.restart();
        self.pending = self.moves.iter().copied().collect();
        self.waited_ms = 0;
        self.skipped = 0;
    }

    /// Run the rest of the replay without pacing
    pub fn run_to_end(&mut self) {
        let mut ticks = 0u32;
        loop {
            while self.session().needs_tick() && !self.session().accepts_input() {
                self.tick_once(&mut ticks);
                if ticks >= MAX_TICKS {
                    log::warn!("replay: tick limit reached");
                    return;
                }
            }
            if self.pending.is_empty() {
                break;
            }
            if self.session().is_finished() {
                self.skip_remaining();
                break;
            }
            self.apply_next();
        }
    }

    fn tick_once(&mut self, ticks: &mut u32) {
        let interval = self.scheduler.interval_ms().unwrap_or(0);
        self.scheduler.advance(interval);
        *ticks += 1;
    }

    pub fn into_session(self) -> GameSession {
        self.scheduler.into_session()
    }
}

/// Replay `moves` on a fresh `seed` session and return the final session.
pub fn replay_to_end(seed: &str, moves: &[Move], budget: u32) -> GameSession {
    let mut player = ReplayPlayer::new(GameSession::new(seed, budget), moves.to_vec());
    player.run_to_end();
    player.into_session()
}
