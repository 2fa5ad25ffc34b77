//! hexsum engine library.
//!
//! Exposes the board representation, positions, solvers, the move
//! evaluator and the protocol modules for use by integration tests and the
//! binary entry points.

pub mod accel;
pub mod board;
pub mod engine;
pub mod eval;
pub mod protocol;
pub mod search;
pub mod selfplay;
