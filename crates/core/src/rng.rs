//! RNG module - seeded, string-keyed random stream
//!
//! Boards must be reproducible from a seed string (daily puzzles, replays), so the
//! generator is fully deterministic: the seed is folded into a 32-bit state with
//! the xmur3 string mixer, then mulberry32 produces one float per call.
//!
//! Also provides the daily-seed date formatting and a wall-clock seed for free play.

use std::time::{SystemTime, UNIX_EPOCH};

/// Fold a string into a 32-bit state (xmur3).
///
/// Operates on UTF-16 code units so that non-ASCII seeds hash the same way they
/// do in browser builds of the game.
fn xmur3(seed: &str) -> u32 {
    let len = seed.encode_utf16().count() as u32;
    let mut h: u32 = 1779033703 ^ len;
    for unit in seed.encode_utf16() {
        h = (h ^ unit as u32).wrapping_mul(3432918353);
        h = h.rotate_left(13);
    }

    // First draw of the xmur3 stream.
    h = (h ^ (h >> 16)).wrapping_mul(2246822507);
    h = (h ^ (h >> 13)).wrapping_mul(3266489909);
    h ^ (h >> 16)
}

/// mulberry32 generator keyed from a seed string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a generator from an arbitrary seed string
    pub fn from_seed(seed: &str) -> Self {
        Self { state: xmur3(seed) }
    }

    /// Create a generator from a raw 32-bit state
    pub fn from_state(state: u32) -> Self {
        Self { state }
    }

    /// Current internal state (for diagnostics and tests)
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Generate next float in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4294967296.0
    }

    /// Pick an index in [0, len) as `floor(next_f64() * len)`
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}

/// Format a calendar date as a daily seed.
///
/// Month and day are not zero-padded: `2024-1-1`, `2024-12-31`.
pub fn daily_seed(year: i32, month: u32, day: u32) -> String {
    format!("{}-{}-{}", year, month, day)
}

/// Today's daily seed in UTC.
pub fn today_seed() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let (y, m, d) = civil_from_days((secs / 86_400) as i64);
    daily_seed(y, m, d)
}

/// Seed for free-play games, derived from the wall clock.
pub fn clock_seed() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    millis.to_string()
}

/// Convert days since 1970-01-01 into a proleptic Gregorian (year, month, day).
pub fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year as i32, month, day)
}
