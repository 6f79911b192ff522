//! Wall-clock pacing for a [`GameSession`].
//!
//! The session only knows discrete ticks. The scheduler owns it and converts
//! elapsed milliseconds into ticks:
//!
//! | Session state | Interval |
//! |---------------|----------|
//! | dirty | `tick_ms` (300ms) |
//! | settled, out of moves | `finish_delay_ms` (1000ms), then one finishing tick |
//! | settled, moves left / finished | idle, no ticks |
//!
//! While idle the clock does not accumulate, so the first tick after a command
//! lands one full interval later.

use crate::command::{apply_command, Command, CommandError};
use crate::core::GameSession;
use crate::types::TickEvent;

#[derive(Debug, Clone)]
pub struct Scheduler {
    session: GameSession,
    elapsed_ms: u32,
}

impl Scheduler {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            elapsed_ms: 0,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn into_session(self) -> GameSession {
        self.session
    }

    /// Interval until the next tick, or `None` while idle
    pub fn interval_ms(&self) -> Option<u32> {
        let config = self.session.config();
        if self.session.finish_pending() {
            Some(config.finish_delay_ms)
        } else if self.session.needs_tick() {
            Some(config.tick_ms)
        } else {
            None
        }
    }

    /// Time left before the next tick is due (for sleeping/polling)
    pub fn until_next_tick_ms(&self) -> Option<u32> {
        self.interval_ms()
            .map(|interval| interval.saturating_sub(self.elapsed_ms))
    }

    /// Feed elapsed wall-clock time; returns the number of ticks run.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        self.advance_with(elapsed_ms, |_| {})
    }

    /// Like [`advance`](Self::advance), calling `on_tick` right after every tick.
    ///
    /// A long step can run several ticks, and each one replaces the session's
    /// last event; the callback is the place to collect them.
    pub fn advance_with<F>(&mut self, elapsed_ms: u32, mut on_tick: F) -> u32
    where
        F: FnMut(&mut GameSession),
    {
        let Some(mut interval) = self.interval_ms() else {
            self.elapsed_ms = 0;
            return 0;
        };

        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        let mut ticks = 0;
        while self.elapsed_ms >= interval {
            self.elapsed_ms -= interval;
            let was_pending = self.session.finish_pending();
            self.session.tick();
            ticks += 1;
            on_tick(&mut self.session);

            match self.interval_ms() {
                Some(next) => {
                    // The finish delay counts from the tick that settled the board.
                    if self.session.finish_pending() && !was_pending {
                        self.elapsed_ms = 0;
                    }
                    interval = next;
                }
                None => {
                    self.elapsed_ms = 0;
                    break;
                }
            }
        }
        ticks
    }

    /// Apply a command between ticks
    pub fn apply(&mut self, command: &Command) -> Result<(), CommandError> {
        let was_idle = self.interval_ms().is_none();
        apply_command(&mut self.session, command)?;
        if was_idle {
            self.elapsed_ms = 0;
        }
        Ok(())
    }

    pub fn take_last_event(&mut self) -> Option<TickEvent> {
        self.session.take_last_event()
    }

    /// Restart the owned session (same seed, next episode)
    pub fn restart(&mut self) {
        self.session.restart();
        self.elapsed_ms = 0;
    }

    /// Swap in a different session, returning the old one
    pub fn replace(&mut self, session: GameSession) -> GameSession {
        self.elapsed_ms = 0;
        std::mem::replace(&mut self.session, session)
    }
}
