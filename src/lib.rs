//! A 0-1 integer linear programming solver built around the Wedelin Lagrangean
//! heuristic (see `SPEC_FULL.md` for the full component breakdown).
//!
//! The crate is organized leaf-first, same layout as the wider `copters` family this
//! was pulled out of: dense linear algebra at the bottom (`linalg`), problem data
//! types above that (`problem`), the two heuristic engines (`engine`), and the
//! driver/I/O/error/observability layers that tie them together at the top.

pub type E = f64;

pub mod callback;
pub mod driver;
pub mod engine;
pub mod error;
pub mod io;
pub mod linalg;
pub mod problem;
pub mod terminators;

#[cfg(test)]
pub mod tests;

pub use driver::{Config, SolveResult, solve};
pub use error::SolverError;
pub use problem::{Bound, EqualityProblem, ProblemInstance, SignedProblem};
