//! Randomized playout estimation.
//!
//! Each sample plays uniformly random moves until only `switch_depth`
//! empty cells remain, then solves the residual position exactly. The
//! estimate is the mean of the sampled outcomes. When `switch_depth > 1`,
//! a fair coin decides whether to play one extra random move, so the side
//! to move at the hand-off alternates between samples.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::board::HexState;

use super::exact::{ExactSolver, SearchOutcome};
use super::limit::TimeLimit;
use super::SearchError;

/// Result of a sampling run.
#[derive(Debug, Clone, Copy)]
pub struct SampleReport {
    /// Mean outcome in `[-1, 1]`.
    pub mean: f64,
    pub samples: u32,
    /// Positions visited by the residual exact searches.
    pub states: u64,
    pub elapsed: Duration,
}

/// One-shot sampling solver.
pub struct SamplingSolver<'a, S> {
    root: &'a S,
    empty: usize,
    switch_depth: usize,
    budget: Duration,
}

impl<'a, S: HexState> SamplingSolver<'a, S> {
    /// Prepares a run. The root must have at least two empty cells.
    pub fn new(root: &'a S, switch_depth: usize, budget: Duration) -> Result<Self, SearchError> {
        let empty = root.empty_count();
        if empty < 2 {
            return Err(SearchError::TooFewEmptyCells(empty));
        }
        Ok(SamplingSolver {
            root,
            empty,
            switch_depth,
            budget,
        })
    }

    /// Empty cells at the root.
    pub fn empty_cells(&self) -> usize {
        self.empty
    }

    /// Samples until the budget is spent. Fails if no sample completed.
    pub fn run<R: Rng + ?Sized>(self, rng: &mut R) -> Result<SampleReport, SearchError> {
        let started = Instant::now();
        let mut total = 0i64;
        let mut samples = 0u32;
        let mut states = 0u64;

        while started.elapsed() < self.budget {
            let mut target = self.switch_depth;
            if target > 1 && rng.gen_bool(0.5) {
                target -= 1;
            }

            let mut state = self.root.clone();
            let mut empties = self.root.empty_cells();
            while empties.len() > target && !state.is_over() {
                let (x, row) = empties.swap_remove(rng.gen_range(0..empties.len()));
                state = match state.play(x as i32, state.external_y(row)) {
                    Ok(next) => next,
                    Err(_) => break,
                };
            }

            let report = ExactSolver::new(&state, TimeLimit::Unlimited).solve();
            states += report.states;
            if let SearchOutcome::Solved(value) = report.outcome {
                total += i64::from(value);
                samples += 1;
            }
        }

        if samples == 0 {
            return Err(SearchError::NoSamples);
        }
        Ok(SampleReport {
            mean: total as f64 / f64::from(samples),
            samples,
            states,
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{presets, Position};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn line_after(moves: &[i32]) -> Position {
        moves
            .iter()
            .fold(Position::new(&presets()[3]), |pos, &x| pos.play(x, 0).unwrap())
    }

    #[test]
    fn rejects_nearly_full_boards() {
        let pos = line_after(&[0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(matches!(
            SamplingSolver::new(&pos, 1, Duration::from_millis(10)),
            Err(SearchError::TooFewEmptyCells(1))
        ));
    }

    #[test]
    fn zero_budget_yields_no_samples() {
        let pos = line_after(&[4]);
        let solver = SamplingSolver::new(&pos, 3, Duration::ZERO).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(solver.run(&mut rng), Err(SearchError::NoSamples)));
    }

    #[test]
    fn mean_stays_in_range() {
        let pos = line_after(&[4, 3]);
        let solver = SamplingSolver::new(&pos, 3, Duration::from_millis(30)).unwrap();
        assert_eq!(solver.empty_cells(), 7);
        let mut rng = SmallRng::seed_from_u64(2);
        let report = solver.run(&mut rng).unwrap();
        assert!(report.samples > 0);
        assert!((-1.0..=1.0).contains(&report.mean));
        assert!(report.states >= u64::from(report.samples));
    }

    #[test]
    fn switch_depth_at_root_is_exact() {
        // A switch depth at or above the root's empty count skips every
        // random move, so each sample is the exact outcome.
        let pos = line_after(&[0, 1, 2, 3, 4, 5]);
        let exact = ExactSolver::new(&pos, TimeLimit::Unlimited).solve().outcome;
        let SearchOutcome::Solved(expected) = exact else {
            panic!("unlimited search timed out");
        };
        let solver = SamplingSolver::new(&pos, 4, Duration::from_millis(20)).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let report = solver.run(&mut rng).unwrap();
        assert_eq!(report.mean, f64::from(expected));
    }
}
