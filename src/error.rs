//! Error taxonomy for the heuristic engine (spec section 7).
//!
//! Mirrors [`crate::linalg::solver::LinearSolverError`](../linalg/solver/index.html)-style
//! closed enums elsewhere in the wider `copters` family: a small, matchable set of
//! variants for errors the engine itself can diagnose. I/O-boundary failures (text
//! parsing) are instead carried as `problemo::Problem`, same split the teacher crate
//! draws between its solver errors and its loader errors.

use derive_more::{Display, Error};

#[derive(Debug, Display, Error, PartialEq, Clone)]
pub enum SolverError {
    #[display("invalid parameter: {_0}")]
    InvalidParameter(String),

    #[display("shape mismatch: {_0}")]
    ShapeMismatch(String),

    #[display("invalid input: {_0}")]
    InvalidInput(String),

    #[display("degenerate row {row}: fewer than two variables fall inside the bound interval")]
    DegenerateRow { row: usize },

    #[display("no solution found within {iterations} iterations")]
    NoSolution { iterations: usize },

    #[display("solve terminated early after {iterations} iteration(s) before feasibility")]
    TimedOut { iterations: usize },
}
