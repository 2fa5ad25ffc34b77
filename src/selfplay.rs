//! Self-play game generation.
//!
//! Plays batches of games on one layout. Player 1 always follows the
//! evaluator's best cell; Player 2 either does the same or moves uniformly
//! at random. Records are written as JSONL for offline analysis.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::accel::NativeSolver;
use crate::board::{presets, random_layout, BoardLayout, HexState, MoveError, Position, Winner};
use crate::eval::{EvalConfig, EvalError, Evaluator};

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Preset index; `None` draws a random layout per game.
    pub layout: Option<usize>,
    /// Evaluation budget per hinted move (milliseconds).
    pub movetime_ms: u64,
    /// Player 2 follows hints too instead of moving at random.
    pub both_hint: bool,
    /// Attach the native accelerated solver to each evaluator.
    pub accelerated: bool,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            layout: Some(0),
            movetime_ms: 1000,
            both_hint: false,
            accelerated: false,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error("unknown layout {0}")]
    UnknownLayout(usize),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("failed to build thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// One finished game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub layout: String,
    /// Moves as `[x, y]`, `y` counted from the bottom row.
    pub moves: Vec<[i32; 2]>,
    pub final_sum: i32,
    /// `p1`, `p2` or `draw`.
    pub winner: String,
    /// Evaluator calls made during the game.
    pub evaluations: u32,
    pub elapsed_ms: u64,
}

/// Aggregate results of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub games: usize,
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub draws: usize,
    pub avg_moves: f64,
}

fn seeded(seed: u64) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed)
    } else {
        SmallRng::from_entropy()
    }
}

fn pick_layout(config: &SelfPlayConfig, rng: &mut SmallRng) -> Result<BoardLayout, SelfPlayError> {
    match config.layout {
        Some(index) => presets()
            .into_iter()
            .nth(index)
            .ok_or(SelfPlayError::UnknownLayout(index)),
        None => Ok(random_layout(rng)),
    }
}

/// Plays a single game to completion.
pub fn play_game(config: &SelfPlayConfig, game_id: usize, rng: &mut SmallRng) -> Result<GameRecord, SelfPlayError> {
    let started = Instant::now();
    let layout = pick_layout(config, rng)?;
    let eval_config = EvalConfig {
        budget: Duration::from_millis(config.movetime_ms),
        ..EvalConfig::default()
    };
    let mut evaluator = Evaluator::new(eval_config).with_seed(rng.gen());
    if config.accelerated {
        evaluator = evaluator.with_accelerated(Box::new(NativeSolver::new()));
    }

    let mut position = Position::new(&layout);
    let mut moves = Vec::new();
    let mut evaluations = 0;
    while !position.is_over() {
        let cell = if position.player_one_to_move() || config.both_hint {
            evaluations += 1;
            evaluator.evaluate(&position)?.best_cell(&position)
        } else {
            position.empty_cells().choose(rng).copied()
        };
        let Some((x, row)) = cell else {
            break;
        };
        let y = position.external_y(row);
        position = position.play(x as i32, y)?;
        moves.push([x as i32, y]);
    }

    let winner = position
        .check_winner()
        .unwrap_or_else(|| Winner::from_sum(position.sum()));
    Ok(GameRecord {
        game_id,
        layout: layout.name,
        moves,
        final_sum: position.sum(),
        winner: winner.label().to_string(),
        evaluations,
        elapsed_ms: started.elapsed().as_millis() as u64,
    })
}

fn log_game(config: &SelfPlayConfig, done: usize, game: &GameRecord) {
    if !config.quiet {
        info!(
            game = done,
            of = config.num_games,
            layout = %game.layout,
            winner = %game.winner,
            sum = game.final_sum,
            ms = game.elapsed_ms,
            "game finished"
        );
    }
}

/// Runs self-play generation, producing one record per game.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
/// Game `i` of a seeded batch uses seed `seed + i`, so a batch is
/// reproducible whatever the thread count.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    if config.threads > 1 {
        run_self_play_parallel(config)
    } else {
        run_self_play_sequential(config)
    }
}

fn game_rng(config: &SelfPlayConfig, i: usize) -> SmallRng {
    if config.seed != 0 {
        seeded(config.seed.wrapping_add(i as u64))
    } else {
        seeded(0)
    }
}

fn run_self_play_sequential(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    let mut games = Vec::with_capacity(config.num_games);
    for i in 0..config.num_games {
        let game = play_game(config, i, &mut game_rng(config, i))?;
        log_game(config, i + 1, &game);
        games.push(game);
    }
    Ok(games)
}

fn run_self_play_parallel(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    use rayon::prelude::*;

    let completed = AtomicUsize::new(0);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    pool.install(|| {
        (0..config.num_games)
            .into_par_iter()
            .map(|i| {
                let game = play_game(config, i, &mut game_rng(config, i))?;
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                log_game(config, done, &game);
                Ok(game)
            })
            .collect()
    })
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Tallies a batch.
pub fn summarize(games: &[GameRecord]) -> Summary {
    let count = |label: &str| games.iter().filter(|g| g.winner == label).count();
    let total_moves: usize = games.iter().map(|g| g.moves.len()).sum();
    Summary {
        games: games.len(),
        p1_wins: count(Winner::PlayerOne.label()),
        p2_wins: count(Winner::PlayerTwo.label()),
        draws: count(Winner::Draw.label()),
        avg_moves: total_moves as f64 / games.len().max(1) as f64,
    }
}
