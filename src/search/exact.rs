//! Exact backtracking search.
//!
//! Plain minimax over every legal move, with one pruning rule: once the
//! side to move has found its best possible result (a win), the remaining
//! siblings are skipped. The wall clock is polled at every node; a timeout
//! anywhere makes the whole search return [`SearchOutcome::TimedOut`].
//!
//! Player 1 minimizes the outcome (-1 is a Player 1 win) and Player 2
//! maximizes it.

use std::time::Duration;

use crate::board::{HexState, Winner};

use super::limit::{Deadline, TimeLimit};

/// Result of a search: a game-theoretic outcome or a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// -1, 0 or 1, as in [`Winner::score`].
    Solved(i32),
    TimedOut,
}

impl SearchOutcome {
    pub fn winner(self) -> Option<Winner> {
        match self {
            SearchOutcome::Solved(v) => Some(Winner::from_score(v)),
            SearchOutcome::TimedOut => None,
        }
    }
}

/// Everything a finished search reports.
#[derive(Debug, Clone, Copy)]
pub struct SolveReport {
    pub outcome: SearchOutcome,
    /// Positions visited, terminal or not.
    pub states: u64,
    pub elapsed: Duration,
    /// First root move `(x, row)` achieving the outcome; `None` on timeout
    /// or when the root is terminal.
    pub best_move: Option<(usize, usize)>,
}

/// Which side a ply belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mover {
    Minimizer,
    Maximizer,
}

impl Mover {
    fn for_move(current_move: u32) -> Mover {
        if current_move % 2 == 0 {
            Mover::Minimizer
        } else {
            Mover::Maximizer
        }
    }

    fn flip(self) -> Mover {
        match self {
            Mover::Minimizer => Mover::Maximizer,
            Mover::Maximizer => Mover::Minimizer,
        }
    }

    fn worst(self) -> i32 {
        match self {
            Mover::Minimizer => 1,
            Mover::Maximizer => -1,
        }
    }

    fn best(self) -> i32 {
        -self.worst()
    }

    fn improves(self, candidate: i32, current: i32) -> bool {
        match self {
            Mover::Minimizer => candidate < current,
            Mover::Maximizer => candidate > current,
        }
    }
}

/// Outcome and work done for one subtree.
struct Visit {
    outcome: SearchOutcome,
    states: u64,
    best_move: Option<(usize, usize)>,
}

/// One-shot exact solver. [`ExactSolver::solve`] consumes it, so an
/// instance cannot run twice.
pub struct ExactSolver<'a, S> {
    root: &'a S,
    limit: TimeLimit,
}

impl<'a, S: HexState> ExactSolver<'a, S> {
    pub fn new(root: &'a S, limit: TimeLimit) -> Self {
        ExactSolver { root, limit }
    }

    pub fn solve(self) -> SolveReport {
        let deadline = self.limit.start();
        let mover = Mover::for_move(self.root.current_move());
        let visit = search(self.root, mover, &deadline);
        SolveReport {
            outcome: visit.outcome,
            states: visit.states,
            elapsed: deadline.elapsed(),
            best_move: visit.best_move,
        }
    }
}

fn search<S: HexState>(state: &S, mover: Mover, deadline: &Deadline) -> Visit {
    debug_assert_eq!(mover, Mover::for_move(state.current_move()));
    let mut states = 1;
    if deadline.expired() {
        return Visit {
            outcome: SearchOutcome::TimedOut,
            states,
            best_move: None,
        };
    }
    if let Some(winner) = state.check_winner() {
        return Visit {
            outcome: SearchOutcome::Solved(winner.score()),
            states,
            best_move: None,
        };
    }

    let mut best = mover.worst();
    let mut best_move = None;
    for (x, row, cell) in state.board().iter() {
        if !cell.is_empty() {
            continue;
        }
        let Ok(child) = state.play(x as i32, state.external_y(row)) else {
            continue;
        };
        let visit = search(&child, mover.flip(), deadline);
        states += visit.states;
        let SearchOutcome::Solved(value) = visit.outcome else {
            return Visit {
                outcome: SearchOutcome::TimedOut,
                states,
                best_move: None,
            };
        };
        let improved = mover.improves(value, best);
        if improved {
            best = value;
        }
        if improved || best_move.is_none() {
            best_move = Some((x, row));
        }
        if best == mover.best() {
            break;
        }
    }

    Visit {
        outcome: SearchOutcome::Solved(best),
        states,
        best_move,
    }
}
