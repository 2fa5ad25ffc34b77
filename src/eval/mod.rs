//! Move evaluation.
//!
//! [`Evaluator::evaluate`] scores every empty cell of a position: the
//! outcome of playing there, either exact (`-1`, `0`, `1`) or a sampled
//! estimate shifted by [`ESTIMATE_OFFSET`] so it lands in `[2, 4]`.
//! Non-empty cells score 0.
//!
//! Strategies are tried in order: the accelerated solver when one is
//! attached and the board qualifies, then an exact pass over every move
//! with half the budget, then a sampling pass with the rest.

pub mod budget;

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::accel::{accelerated_options, AcceleratedSolver, GAVE_UP};
use crate::board::{Cell, ConversionError, EndgamePosition, Grid, HexState, Position, Winner};
use crate::search::{ExactSolver, SamplingSolver, SearchError, SearchOutcome, TimeLimit};

pub use budget::SamplingConfig;

/// Added to sampled means before they are stored.
pub const ESTIMATE_OFFSET: f64 = 3.0;

/// Evaluation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Total wall-clock budget of one evaluation.
    pub budget: Duration,
    /// Largest playable-cell count handed to the accelerated solver.
    pub accel_ceiling: usize,
    /// Accelerated return codes at or beyond this magnitude are discarded.
    pub accel_code_bound: i32,
    pub sampling: SamplingConfig,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            budget: Duration::from_millis(3000),
            accel_ceiling: 101,
            accel_code_bound: GAVE_UP,
            sampling: SamplingConfig::default(),
        }
    }
}

/// A failed evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// How an evaluation was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    Accelerated,
    Exact,
    Sampled,
}

/// Reading of one evaluated cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellEval {
    Exact(Winner),
    /// Mean outcome in `[-1, 1]`.
    Estimate(f64),
}

impl CellEval {
    /// Decodes a stored value. Values of 2 and above are shifted estimates.
    pub fn from_value(value: f64) -> CellEval {
        if value >= ESTIMATE_OFFSET - 1.0 {
            CellEval::Estimate(value - ESTIMATE_OFFSET)
        } else {
            CellEval::Exact(Winner::from_score(value.round() as i32))
        }
    }
}

/// Per-cell evaluation of a position.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub grid: Grid<f64>,
    pub strategy: Strategy,
    pub elapsed: Duration,
}

impl Evaluation {
    /// The reading for `(x, row)`, or `None` if the cell was not empty.
    pub fn cell(&self, board: &Grid<Cell>, x: usize, row: usize) -> Option<CellEval> {
        if board.get(x, row).is_empty() {
            Some(CellEval::from_value(*self.grid.get(x, row)))
        } else {
            None
        }
    }

    /// Highest-rated empty cell for the side to move, exact results first.
    pub fn best_cell<S: HexState>(&self, state: &S) -> Option<(usize, usize)> {
        let sign = if state.player_one_to_move() { -1.0 } else { 1.0 };
        let rank = |value: f64| match CellEval::from_value(value) {
            CellEval::Exact(w) => f64::from(w.score()) * sign * 10.0,
            CellEval::Estimate(mean) => mean * sign,
        };
        state
            .empty_cells()
            .into_iter()
            .map(|(x, r)| (x, r, rank(*self.grid.get(x, r))))
            .fold(None, |best: Option<(usize, usize, f64)>, cand| match best {
                Some(b) if b.2 >= cand.2 => Some(b),
                _ => Some(cand),
            })
            .map(|(x, r, _)| (x, r))
    }
}

/// Evaluates positions within a time budget.
pub struct Evaluator {
    config: EvalConfig,
    accelerated: Option<Box<dyn AcceleratedSolver + Send>>,
    rng: SmallRng,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        Evaluator {
            config,
            accelerated: None,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn with_accelerated(mut self, solver: Box<dyn AcceleratedSolver + Send>) -> Self {
        self.accelerated = Some(solver);
        self
    }

    pub fn set_accelerated(&mut self, solver: Option<Box<dyn AcceleratedSolver + Send>>) {
        self.accelerated = solver;
    }

    pub fn has_accelerated(&self) -> bool {
        self.accelerated.is_some()
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn set_budget(&mut self, budget: Duration) {
        self.config.budget = budget;
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// Scores every empty cell of `position`.
    pub fn evaluate(&mut self, position: &Position) -> Result<Evaluation, EvalError> {
        let started = Instant::now();
        let budget = self.config.budget;

        if let Some(solver) = self.accelerated.as_deref_mut() {
            if !position.is_over()
                && position.playable_count() <= self.config.accel_ceiling
                && position.is_single_hole()
            {
                if let Some(grid) =
                    accelerated_options(solver, position, budget, self.config.accel_code_bound)
                {
                    info!(name = position.name(), "evaluated with accelerated solver");
                    return Ok(Evaluation {
                        grid,
                        strategy: Strategy::Accelerated,
                        elapsed: started.elapsed(),
                    });
                }
            }
        }

        if position.is_single_hole() {
            let endgame = EndgamePosition::try_from(position)?;
            self.evaluate_moves(&endgame, started)
        } else {
            self.evaluate_moves(position, started)
        }
    }

    fn evaluate_moves<S: HexState>(&mut self, state: &S, started: Instant) -> Result<Evaluation, EvalError> {
        let budget = self.config.budget;
        let board = state.board();
        let mut grid = Grid::new(board.rows(), board.cols(), 0.0);
        let known = state.check_winner();

        // Moves whose outcome needs a search.
        let mut open = Vec::new();
        for (x, r) in state.empty_cells() {
            match state.play(x as i32, state.external_y(r)) {
                Err(_) => grid.set(x, r, f64::from(known.map_or(0, Winner::score))),
                Ok(child) => match child.check_winner() {
                    Some(winner) => grid.set(x, r, f64::from(winner.score())),
                    None => open.push((x, r, child)),
                },
            }
        }

        let half = budget / 2;
        let mut measured = Vec::with_capacity(open.len());
        let mut timed_out = false;
        for (x, r, child) in &open {
            let limit = half.saturating_sub(started.elapsed());
            let report = ExactSolver::new(child, TimeLimit::Limited(limit)).solve();
            measured.push(report.states);
            match report.outcome {
                SearchOutcome::Solved(value) => {
                    debug!(x, row = r, value, states = report.states, "exact move result");
                    grid.set(*x, *r, f64::from(value));
                }
                SearchOutcome::TimedOut => {
                    timed_out = true;
                    break;
                }
            }
        }

        if !timed_out {
            info!(name = state.name(), moves = open.len(), "evaluated exactly");
            return Ok(Evaluation {
                grid,
                strategy: Strategy::Exact,
                elapsed: started.elapsed(),
            });
        }

        let exact_elapsed = started.elapsed();
        let throughput = budget::states_per_ms(measured.iter().sum(), exact_elapsed);
        warn!(
            name = state.name(),
            measured = measured.len(),
            moves = open.len(),
            ms = exact_elapsed.as_millis() as u64,
            "exact pass timed out, sampling"
        );

        let weights = budget::sampling_weights(&measured, open.len());
        let mut weight_left: u64 = weights.iter().sum();
        let sampling = self.config.sampling;
        for ((x, r, child), weight) in open.iter().zip(weights) {
            let remaining = budget.saturating_sub(started.elapsed());
            let slice = budget::slice(remaining, weight, weight_left, sampling.min_slice);
            weight_left -= weight;
            let depth = budget::switch_depth(throughput, slice, child.empty_count(), &sampling);
            let report = SamplingSolver::new(child, depth, slice)?.run(&mut self.rng)?;
            debug!(
                x,
                row = r,
                mean = report.mean,
                samples = report.samples,
                depth,
                "sampled move estimate"
            );
            grid.set(*x, *r, report.mean + ESTIMATE_OFFSET);
        }

        Ok(Evaluation {
            grid,
            strategy: Strategy::Sampled,
            elapsed: started.elapsed(),
        })
    }
}
