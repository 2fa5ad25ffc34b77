//! Search and solving.
//!
//! Exact minimax for positions small enough to finish in time, and a
//! sampling estimator that reduces larger positions to small residual ones.
//! Both poll a wall-clock budget cooperatively.

pub mod exact;
pub mod limit;
pub mod sampling;

pub use exact::{ExactSolver, SearchOutcome, SolveReport};
pub use limit::{Deadline, TimeLimit};
pub use sampling::{SampleReport, SamplingSolver};

/// Misuse of a solver. These abort the calling operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("sampling needs at least 2 empty cells, got {0}")]
    TooFewEmptyCells(usize),

    #[error("sampling finished without a single sample")]
    NoSamples,
}
