//! fusegrid command-line runner.
//!
//! - `serve`: host a session for TCP clients (see `fusegrid_adapter`)
//! - `replay`: run a replay id to the end and print the result
//! - `seed`: print today's daily seed

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fusegrid::adapter::{Adapter, ServerConfig, ServerState, SessionHost};
use fusegrid::core::{clock_seed, today_seed, GameSession};
use fusegrid::engine::ReplayPlayer;
use fusegrid::types::DEFAULT_MOVES;

/// Upper bound on how long the serve loop sleeps between command polls
const POLL_MS: u64 = 10;

#[derive(Debug, Parser)]
#[command(name = "fusegrid", version, about = "Tile-fusing puzzle engine")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Host a session over TCP (FUSEGRID_* environment variables configure the socket)
    Serve {
        /// Board seed; defaults to today's daily seed
        #[arg(long, conflicts_with = "free")]
        seed: Option<String>,

        /// Seed from the clock instead of the date
        #[arg(long)]
        free: bool,

        /// Move budget
        #[arg(long, default_value_t = DEFAULT_MOVES)]
        moves: u32,

        /// Override FUSEGRID_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Replay a move log from its seed and print the outcome
    Replay {
        /// Seed of the replayed game, e.g. a daily seed like 2024-1-1
        seed: String,

        /// Replay id: dash-separated moves such as 012-340
        moves: String,

        /// Move budget the game was played with
        #[arg(long, default_value_t = DEFAULT_MOVES)]
        budget: u32,
    },
    /// Print today's daily seed
    Seed,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Cmd::Serve {
            seed,
            free,
            moves,
            port,
        } => {
            let seed = match (seed, free) {
                (Some(seed), _) => seed,
                (None, true) => clock_seed(),
                (None, false) => today_seed(),
            };
            serve(seed, moves, port)
        }
        Cmd::Replay {
            seed,
            moves,
            budget,
        } => replay(&seed, &moves, budget),
        Cmd::Seed => {
            println!("{}", today_seed());
            Ok(())
        }
    }
}

fn serve(seed: String, moves: u32, port: Option<u16>) -> Result<()> {
    if ServerState::is_disabled() {
        anyhow::bail!("adapter disabled via FUSEGRID_DISABLED; nothing to serve");
    }

    let mut config = ServerConfig::from_env();
    if let Some(port) = port {
        config.port = port;
    }
    let mut adapter = Adapter::start(config).context("failed to start adapter")?;
    log::info!(
        "serving seed {:?} with {} moves on {}",
        seed,
        moves,
        adapter.local_addr()
    );

    let mut host = SessionHost::new(GameSession::new(seed, moves));
    let mut last = Instant::now();
    let mut was_finished = false;

    loop {
        while let Some(inbound) = adapter.try_recv() {
            for msg in host.handle(inbound) {
                adapter.send(msg);
            }
        }

        let elapsed = consume_elapsed(&mut last, Instant::now());
        if elapsed > 0 {
            for msg in host.advance(elapsed) {
                adapter.send(msg);
            }
        }

        let finished = host.session().is_finished();
        if finished && !was_finished {
            let session = host.session();
            log::info!(
                "episode {} finished: score {} replay {}",
                session.episode_id(),
                session.score(),
                session.encoded_moves()
            );
        }
        was_finished = finished;

        let wait = host
            .scheduler()
            .until_next_tick_ms()
            .map(|ms| (ms as u64).min(POLL_MS))
            .unwrap_or(POLL_MS);
        std::thread::sleep(Duration::from_millis(wait.max(1)));
    }
}

/// Whole milliseconds from `last` to `now`; moves `last` forward by exactly
/// that much so the sub-millisecond remainder carries into the next poll.
fn consume_elapsed(last: &mut Instant, now: Instant) -> u32 {
    let ms = u32::try_from(now.saturating_duration_since(*last).as_millis()).unwrap_or(u32::MAX);
    *last += Duration::from_millis(u64::from(ms));
    ms
}

fn replay(seed: &str, moves: &str, budget: u32) -> Result<()> {
    let mut player = ReplayPlayer::from_encoded(seed, moves, budget)
        .with_context(|| format!("invalid replay id {:?}", moves))?;
    player.run_to_end();

    let session = player.session();
    println!("seed: {}", session.seed());
    println!("score: {}", session.score());
    println!("finished: {}", session.is_finished());
    println!("moves played: {}", session.move_log().len());
    println!("moves skipped: {}", player.skipped());
    for stat in session.graveyard().stats() {
        println!("  {} {}: {}", stat.tomb.as_str(), stat.color.as_str(), stat.count);
    }
    Ok(())
}
