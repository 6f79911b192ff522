//! Session module - the game facade
//!
//! [`GameSession`] owns the matrix, the spawner and all scoring state. It is driven
//! by two kinds of input:
//!
//! - **Commands** (`click`, `swipe`, `apply_move`): accepted only while the board is
//!   settled, the game is not finished and moves remain. Each accepted command
//!   spends one move and is appended to the move log.
//! - **Ticks** (`tick`): one atomic simulation step. The caller decides the pacing;
//!   see `needs_tick` for when a tick would do anything.
//!
//! # Tick order
//!
//! 1. Every cell transitions against the pre-tick matrix
//! 2. Scores of exiting cells are collected
//! 3. Columns drop exiting/clicked cells and refill from the top
//! 4. At most one ignited bomb detonates, and only on a calm board
//! 5. Out of moves: every dormant bomb is ignited
//!
//! Once the board settles with no moves left, the next tick finishes the game.

use thiserror::Error;

use crate::bomb::detonate_bombs;
use crate::cell::{CellState, Spawner};
use crate::graveyard::Graveyard;
use crate::matrix::Matrix;
use crate::moves::MoveLog;
use crate::snapshot::{CellView, SessionSnapshot};
use crate::types::{
    CellId, Direction, Move, TickEvent, DEFAULT_COLS, DEFAULT_MOVES, DEFAULT_ROWS,
    FINISH_DELAY_MS, MAX_DIMENSION, TICK_MS,
};

/// Errors produced while validating a [`GameConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must be between 1x1 and {max}x{max}, got {cols}x{rows}", max = MAX_DIMENSION)]
    InvalidDimensions { cols: u8, rows: u8 },
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
}

/// Board shape, move budget and pacing of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub cols: u8,
    pub rows: u8,
    pub moves: u32,
    /// Interval between ticks while the board is dirty
    pub tick_ms: u32,
    /// Delay before the finishing tick
    pub finish_delay_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            moves: DEFAULT_MOVES,
            tick_ms: TICK_MS,
            finish_delay_ms: FINISH_DELAY_MS,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = 1..=MAX_DIMENSION;
        if !valid.contains(&self.cols) || !valid.contains(&self.rows) {
            return Err(ConfigError::InvalidDimensions {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    seed: String,
    matrix: Matrix,
    spawner: Spawner,
    score: u32,
    moves_left: u32,
    /// Set by accepted commands, cleared once a tick leaves the board settled.
    ///
    /// Tracked explicitly because a swap leaves every cell `Idle`.
    dirty: bool,
    finished: bool,
    move_log: MoveLog,
    graveyard: Graveyard,
    /// Summary of the latest tick (consumed by observers).
    last_event: Option<TickEvent>,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
}

impl GameSession {
    /// Default 5x8 board with the given move budget
    pub fn new(seed: impl Into<String>, moves: u32) -> Self {
        let config = GameConfig {
            moves,
            ..GameConfig::default()
        };
        Self::build(seed.into(), config)
    }

    pub fn with_config(seed: impl Into<String>, config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(seed.into(), config))
    }

    /// Start from a prepared matrix; refills still draw from `seed`.
    ///
    /// Used to set up specific board situations. The matrix must fit the same
    /// bounds as [`GameConfig`]; refilled cells continue after its highest id.
    pub fn with_matrix(
        seed: impl Into<String>,
        matrix: Matrix,
        moves: u32,
    ) -> Result<Self, ConfigError> {
        let config = GameConfig {
            cols: u8::try_from(matrix.cols()).unwrap_or(u8::MAX),
            rows: u8::try_from(matrix.rows()).unwrap_or(u8::MAX),
            moves,
            ..GameConfig::default()
        };
        config.validate()?;

        let seed = seed.into();
        let next_id = matrix
            .iter()
            .map(|(_, _, cell)| cell.id.get())
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        let dirty = matrix.is_dirty();
        Ok(Self {
            config,
            spawner: Spawner::from_seed(&seed).with_next_id(next_id),
            seed,
            matrix,
            score: 0,
            moves_left: moves,
            dirty,
            finished: false,
            move_log: MoveLog::new(),
            graveyard: Graveyard::new(),
            last_event: None,
            episode_id: 0,
        })
    }

    fn build(seed: String, config: GameConfig) -> Self {
        let mut spawner = Spawner::from_seed(&seed);
        let matrix = Matrix::generate(config.cols as usize, config.rows as usize, &mut spawner);
        log::debug!(
            "new session seed={:?} {}x{} moves={}",
            seed,
            config.cols,
            config.rows,
            config.moves
        );
        Self {
            config,
            seed,
            matrix,
            spawner,
            score: 0,
            moves_left: config.moves,
            dirty: true,
            finished: false,
            move_log: MoveLog::new(),
            graveyard: Graveyard::new(),
            last_event: None,
            episode_id: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn move_log(&self) -> &[Move] {
        self.move_log.as_slice()
    }

    /// Replay id of the moves accepted so far
    pub fn encoded_moves(&self) -> String {
        self.move_log.encode()
    }

    pub fn graveyard(&self) -> &Graveyard {
        &self.graveyard
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn is_settled(&self) -> bool {
        !self.dirty
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Commands would be accepted right now
    pub fn accepts_input(&self) -> bool {
        !self.dirty && !self.finished && self.moves_left > 0
    }

    /// A tick would change something: the board is dirty or a finish is pending
    pub fn needs_tick(&self) -> bool {
        !self.finished && (self.dirty || self.moves_left < 1)
    }

    /// Settled, out of moves, waiting for the finishing tick
    pub fn finish_pending(&self) -> bool {
        !self.finished && !self.dirty && self.moves_left < 1
    }

    pub fn take_last_event(&mut self) -> Option<TickEvent> {
        self.last_event.take()
    }

    /// Advance the simulation by one step.
    ///
    /// Returns false when there was nothing to do.
    pub fn tick(&mut self) -> bool {
        if self.finished {
            return false;
        }

        if !self.dirty {
            if self.moves_left < 1 {
                self.finished = true;
                log::info!(
                    "game finished: seed={:?} score={} moves={}",
                    self.seed,
                    self.score,
                    self.move_log.len()
                );
                return true;
            }
            return false;
        }

        let mutated = self.matrix.mutate();
        let mut event = TickEvent::default();
        for ((_, _, before), (_, _, after)) in self.matrix.iter().zip(mutated.iter()) {
            if before.state == after.state {
                continue;
            }
            match after.state {
                CellState::Fusion { .. } => event.fused += 1,
                CellState::Bomb => event.bombs_formed += 1,
                CellState::BombIgnited => event.bombs_ignited += 1,
                _ => {}
            }
        }

        event.score_gained = mutated.collect_score();
        for (_, _, cell) in mutated.iter() {
            if matches!(cell.state, CellState::ScoreExit { .. }) {
                self.graveyard.record_cleared(cell.color);
            }
        }
        self.score += event.score_gained;

        let (filled, spawned) = mutated.fill_gaps(&mut self.spawner);
        event.spawned = spawned;

        let (mut next, detonation) = detonate_bombs(filled);
        if let Some(d) = detonation {
            if let Some(bomb) = next.get(d.x, d.y) {
                self.graveyard.record_detonated(bomb.color);
            }
            event.detonation = Some((d.x as u8, d.y as u8));
            event.bombs_ignited += d.chained;
        }

        if self.moves_left < 1 {
            let (ignited, count) = next.ignite_all_bombs();
            next = ignited;
            event.bombs_ignited += count;
        }

        self.matrix = next;
        self.dirty = self.matrix.is_dirty();
        log::trace!("tick: {:?} dirty={}", event, self.dirty);
        self.last_event = Some(event);
        true
    }

    /// Tap a cell. Only `Idle` cells accept a tap.
    pub fn click(&mut self, id: CellId) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some((x, y)) = self.matrix.position_of(id) else {
            return false;
        };
        let Some(cell) = self.matrix.get(x, y).copied() else {
            return false;
        };
        if cell.state != CellState::Idle {
            return false;
        }

        self.matrix.set(x, y, cell.with_state(CellState::Clicked));
        self.commit(Move::tap(x as u8, y as u8));
        true
    }

    /// Swap a cell with its neighbor in `direction`.
    ///
    /// Swiping off the edge of the board is a no-op.
    pub fn swipe(&mut self, id: CellId, direction: Direction) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some((x, y)) = self.matrix.position_of(id) else {
            return false;
        };
        let (dx, dy) = direction.offset();
        let (tx, ty) = (x as isize + dx as isize, y as isize + dy as isize);
        if !self.matrix.contains(tx, ty) {
            return false;
        }

        self.matrix.swap((x, y), (tx as usize, ty as usize));
        self.commit(Move::swipe(x as u8, y as u8, direction));
        true
    }

    /// Apply a positional move to whichever cell occupies `(x, y)`
    pub fn apply_move(&mut self, m: &Move) -> bool {
        let Some(id) = self.matrix.get(m.x as usize, m.y as usize).map(|c| c.id) else {
            return false;
        };
        match m.direction {
            None => self.click(id),
            Some(direction) => self.swipe(id, direction),
        }
    }

    fn commit(&mut self, m: Move) {
        log::debug!("move accepted: {:?}", m);
        self.move_log.push(m);
        self.moves_left -= 1;
        self.dirty = true;
    }

    /// Cells with positions, sorted by id
    pub fn cells(&self) -> Vec<CellView> {
        let mut cells: Vec<CellView> = self
            .matrix
            .iter()
            .map(|(x, y, cell)| CellView::new(cell, x, y))
            .collect();
        cells.sort_by_key(|c| c.id);
        cells
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            seed: self.seed.clone(),
            episode_id: self.episode_id,
            cols: self.config.cols,
            rows: self.config.rows,
            score: self.score,
            moves_left: self.moves_left,
            settled: !self.dirty,
            finished: self.finished,
            cells: self.cells(),
            moves: self.move_log.encode(),
        }
    }

    /// Start over with the same seed and configuration
    pub fn restart(&mut self) {
        let next_episode = self.episode_id.wrapping_add(1);
        *self = Self::build(std::mem::take(&mut self.seed), self.config);
        self.episode_id = next_episode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::test_support::matrix_from_rows;
    use crate::types::Color;

    /// No runs anywhere, in either orientation
    const CALM: [&str; 4] = ["BGYP", "GYPB", "YPBG", "PBGY"];

    fn settle(session: &mut GameSession) -> usize {
        let mut ticks = 0;
        while session.needs_tick() && !session.finish_pending() {
            assert!(session.tick());
            ticks += 1;
            assert!(ticks < 10_000, "board never settled");
        }
        ticks
    }

    #[test]
    fn test_new_session() {
        let session = GameSession::new("2024-1-1", 30);
        assert_eq!(session.score(), 0);
        assert_eq!(session.moves_left(), 30);
        assert!(!session.is_settled());
        assert!(!session.is_finished());
        assert!(!session.accepts_input());
        assert_eq!(session.cells().len(), 40);
        assert_eq!(session.encoded_moves(), "");
    }

    #[test]
    fn test_config_validation() {
        let bad = GameConfig {
            cols: 11,
            ..GameConfig::default()
        };
        assert_eq!(
            GameSession::with_config("x", bad).err(),
            Some(ConfigError::InvalidDimensions { cols: 11, rows: 8 })
        );
        let bad = GameConfig {
            rows: 0,
            ..GameConfig::default()
        };
        assert!(GameSession::with_config("x", bad).is_err());
        let bad = GameConfig {
            tick_ms: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            GameSession::with_config("x", bad).err(),
            Some(ConfigError::ZeroTickInterval)
        );
        let small = GameConfig {
            cols: 3,
            rows: 3,
            ..GameConfig::default()
        };
        let session = GameSession::with_config("x", small).unwrap();
        assert_eq!(session.cells().len(), 9);
    }

    #[test]
    fn test_opening_cascade_settles() {
        let mut session = GameSession::new("2024-1-1", 30);
        settle(&mut session);
        assert!(session.is_settled());
        assert!(session.accepts_input());
        assert!(!session.tick());
        assert!(session
            .matrix()
            .iter()
            .all(|(_, _, c)| matches!(c.state, CellState::Idle | CellState::Bomb)));
    }

    #[test]
    fn test_click_idle_cell() {
        let mut session = GameSession::with_matrix("click", matrix_from_rows(&CALM), 5).unwrap();
        let id = session.matrix().get(2, 1).unwrap().id;
        assert!(session.click(id));
        assert_eq!(session.moves_left(), 4);
        assert_eq!(session.move_log(), &[Move::tap(2, 1)]);
        assert_eq!(session.encoded_moves(), "210");
        assert!(!session.is_settled());
        assert_eq!(session.matrix().get(2, 1).unwrap().state, CellState::Clicked);

        // Dirty board rejects further input.
        let other = session.matrix().get(0, 0).unwrap().id;
        assert!(!session.click(other));
        assert_eq!(session.moves_left(), 4);
    }

    #[test]
    fn test_click_non_idle_changes_nothing() {
        let mut m = matrix_from_rows(&CALM);
        let bomb = m.get(1, 1).unwrap().with_state(CellState::Bomb);
        m.set(1, 1, bomb);
        let mut session = GameSession::with_matrix("bomb", m.clone(), 5).unwrap();
        assert!(!session.click(bomb.id));
        assert_eq!(session.moves_left(), 5);
        assert!(session.move_log().is_empty());
        assert_eq!(session.matrix(), &m);
    }

    #[test]
    fn test_click_unknown_id() {
        let mut session = GameSession::with_matrix("u", matrix_from_rows(&CALM), 5).unwrap();
        assert!(!session.click(CellId::new(9_999)));
        assert_eq!(session.moves_left(), 5);
    }

    #[test]
    fn test_swipe_swaps_and_logs() {
        let mut session = GameSession::with_matrix("swipe", matrix_from_rows(&CALM), 5).unwrap();
        let a = *session.matrix().get(1, 1).unwrap();
        let b = *session.matrix().get(2, 1).unwrap();
        assert!(session.swipe(a.id, Direction::Right));
        assert_eq!(session.matrix().get(2, 1), Some(&a));
        assert_eq!(session.matrix().get(1, 1), Some(&b));
        assert_eq!(session.encoded_moves(), "114");
        assert_eq!(session.moves_left(), 4);
        // Nothing is moving, but the board still needs a tick to re-evaluate.
        assert!(session.needs_tick());
    }

    #[test]
    fn test_swipe_off_edge_is_noop() {
        let mut session = GameSession::with_matrix("edge", matrix_from_rows(&CALM), 5).unwrap();
        let corner = session.matrix().get(0, 0).unwrap().id;
        assert!(!session.swipe(corner, Direction::Up));
        assert!(!session.swipe(corner, Direction::Left));
        assert_eq!(session.moves_left(), 5);
        assert!(session.move_log().is_empty());
        assert!(session.accepts_input());
    }

    #[test]
    fn test_swipe_into_run_scores() {
        // Swiping the Blue at (2,0) down to (2,1) lines up B B B on row 1.
        let rows = ["GYBP", "BBGY", "PGYP", "YPBG"];
        let mut session = GameSession::with_matrix("run", matrix_from_rows(&rows), 5).unwrap();
        let blue = session.matrix().get(2, 0).unwrap().id;
        assert!(session.swipe(blue, Direction::Down));
        assert!(session.tick());
        let event = session.take_last_event().unwrap();
        assert_eq!(event.fused, 3);
        assert!(session.take_last_event().is_none());
        settle(&mut session);
        assert!(session.score() >= 3);
        assert!(session.graveyard().cleared(Color::Blue) >= 3);
    }

    #[test]
    fn test_apply_move_dispatches() {
        let mut session = GameSession::with_matrix("apply", matrix_from_rows(&CALM), 5).unwrap();
        assert!(!session.apply_move(&Move::tap(9, 9)));
        assert!(session.apply_move(&Move::tap(3, 3)));
        assert_eq!(session.move_log(), &[Move::tap(3, 3)]);
    }

    #[test]
    fn test_columns_stay_full_every_tick() {
        let mut session = GameSession::new("columns", 30);
        for _ in 0..200 {
            session.tick();
            assert!(session.matrix().is_well_formed());
            if session.is_settled() {
                assert!(!session.matrix().is_dirty());
            }
        }
    }

    #[test]
    fn test_ids_never_reused() {
        let mut session = GameSession::new("ids", 30);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            session.tick();
            for (_, _, c) in session.matrix().iter() {
                seen.insert(c.id);
            }
            if session.accepts_input() {
                let target = session.matrix().find(|c| c.state == CellState::Idle);
                if let Some((_, _, c)) = target {
                    let id = c.id;
                    session.click(id);
                }
            }
        }
        let minted = session.spawner.minted() as usize;
        assert_eq!(seen.len(), minted);
    }

    #[test]
    fn test_finish_after_last_move() {
        let mut session = GameSession::with_matrix("finish", matrix_from_rows(&CALM), 1).unwrap();
        let id = session.matrix().get(0, 0).unwrap().id;
        assert!(session.click(id));
        assert_eq!(session.moves_left(), 0);
        settle(&mut session);
        assert!(session.finish_pending());
        assert!(!session.is_finished());
        assert!(session.tick());
        assert!(session.is_finished());
        assert!(!session.tick());
        assert!(!session.needs_tick());
    }

    #[test]
    fn test_zero_moves_ignites_bombs_before_finish() {
        let mut m = matrix_from_rows(&CALM);
        let bomb = m.get(1, 1).unwrap().with_state(CellState::Bomb);
        m.set(1, 1, bomb);
        let mut session = GameSession::with_matrix("ignite", m, 0).unwrap();
        // Settled with a dormant bomb; force a cascade so the ignition pass runs.
        session.dirty = true;
        assert!(session.tick());
        assert_eq!(
            session.matrix().get(1, 1).unwrap().state,
            CellState::BombIgnited
        );
        settle(&mut session);
        assert!(session.tick());
        assert!(session.is_finished());
        assert_eq!(session.graveyard().detonated(bomb.color), 1);
        assert!(session.score() >= 100);
    }

    #[test]
    fn test_out_of_moves_while_dirty_resolves_every_bomb() {
        // 2x2 can never fuse, so refills add no score of their own.
        let mut m = matrix_from_rows(&["BG", "GP"]);
        for (x, y, state) in [
            (0, 0, CellState::Bomb),
            (1, 1, CellState::Bomb),
            (0, 1, CellState::Dropped),
        ] {
            let cell = m.get(x, y).unwrap().with_state(state);
            m.set(x, y, cell);
        }
        let mut session = GameSession::with_matrix("chain", m, 0).unwrap();
        assert!(!session.is_settled());

        assert!(session.tick());
        let event = session.take_last_event().unwrap();
        assert_eq!(event.bombs_ignited, 2);
        assert_eq!(session.matrix().count(|c| c.state == CellState::BombIgnited), 2);

        let mut detonations = Vec::new();
        while !session.is_finished() {
            assert!(session.tick());
            if let Some((x, y)) = session.take_last_event().and_then(|e| e.detonation) {
                detonations.push((x, y));
            }
            assert!(detonations.len() <= 2);
        }

        // Blue bomb first (scan order) catching two greens; the pink bomb it
        // leaves ignited goes off once the refills calm down, catching three.
        assert_eq!(detonations, vec![(0, 0), (1, 1)]);
        assert_eq!(session.score(), 2 * 100 + 5 * 10);
        let graveyard = session.graveyard();
        assert_eq!(graveyard.detonated(Color::Blue), 1);
        assert_eq!(graveyard.detonated(Color::Pink), 1);
        assert_eq!(graveyard.total_detonated(), 2);
        assert_eq!(graveyard.total_cleared(), 7);
        assert!(graveyard.cleared(Color::Green) >= 2);
        assert!(session
            .matrix()
            .iter()
            .all(|(_, _, c)| c.state == CellState::Idle));
    }

    #[test]
    fn test_with_matrix_bounds_and_serial() {
        let wide = matrix_from_rows(&["BGYPUBGYPUB"]);
        assert_eq!(
            GameSession::with_matrix("wide", wide, 5).err(),
            Some(ConfigError::InvalidDimensions { cols: 11, rows: 1 })
        );

        let mut session = GameSession::with_matrix("serial", matrix_from_rows(&CALM), 1).unwrap();
        let id = session.matrix().get(0, 0).unwrap().id;
        assert!(session.click(id));
        assert!(session.tick());
        // Refill continues after the 16 prepared ids.
        assert_eq!(session.matrix().get(0, 0).unwrap().id, CellId::new(17));
    }

    #[test]
    fn test_restart_same_board() {
        let mut session = GameSession::new("again", 30);
        let before = session.snapshot();
        settle(&mut session);
        session.restart();
        assert_eq!(session.episode_id(), 1);
        let after = session.snapshot();
        assert_eq!(after.cells, before.cells);
        assert_eq!(after.seed, "again");
        assert_eq!(after.score, 0);
    }

    #[test]
    fn test_snapshot_cells_sorted() {
        let session = GameSession::new("sorted", 30);
        let snap = session.snapshot();
        assert!(snap.cells.windows(2).all(|w| w[0].id < w[1].id));
        let first = snap.cells[0];
        assert_eq!(snap.cell(first.id), Some(&first));
        assert_eq!(snap.cell_at(first.x, first.y), Some(&first));
        assert!(!snap.playable());
    }
}
