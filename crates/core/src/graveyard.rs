//! Graveyard - per-color tally of what left play
//!
//! Feeds end-of-game summaries. Cells are counted when they exit through
//! `ScoreExit`; bombs are additionally counted when they detonate (a detonated
//! bomb later exits like any scored cell, so it shows up in both tallies).

use crate::types::Color;

/// Which tally a [`GraveyardStat`] comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tomb {
    Cell,
    Bomb,
}

impl Tomb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tomb::Cell => "cell",
            Tomb::Bomb => "bomb",
        }
    }
}

/// One row of the end-of-game summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraveyardStat {
    pub tomb: Tomb,
    pub color: Color,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Graveyard {
    cleared: [u32; Color::COUNT],
    detonated: [u32; Color::COUNT],
}

impl Graveyard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cleared(&mut self, color: Color) {
        self.cleared[color.index()] += 1;
    }

    pub fn record_detonated(&mut self, color: Color) {
        self.detonated[color.index()] += 1;
    }

    pub fn cleared(&self, color: Color) -> u32 {
        self.cleared[color.index()]
    }

    pub fn detonated(&self, color: Color) -> u32 {
        self.detonated[color.index()]
    }

    pub fn total_cleared(&self) -> u32 {
        self.cleared.iter().sum()
    }

    pub fn total_detonated(&self) -> u32 {
        self.detonated.iter().sum()
    }

    /// Summary rows: bombs first, then cells, each in [`Color::ALL`] order.
    pub fn stats(&self) -> Vec<GraveyardStat> {
        let bombs = Color::ALL.iter().map(|&color| GraveyardStat {
            tomb: Tomb::Bomb,
            color,
            count: self.detonated(color),
        });
        let cells = Color::ALL.iter().map(|&color| GraveyardStat {
            tomb: Tomb::Cell,
            color,
            count: self.cleared(color),
        });
        bombs.chain(cells).collect()
    }
}
