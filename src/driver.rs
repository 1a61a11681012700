//! Bounded outer loop, feasibility packaging, and configuration (spec section 4.5).
//!
//! `solve` is the crate's single public entry point: it validates the problem
//! shape, builds the right engine for the problem's variant, and runs the
//! budgeted sweep loop, matching the driver shape spec section 2 describes
//! ("the driver constructs an engine from a problem instance; each call to
//! `engine.step()` updates infeasible rows, then checks global feasibility").

use crate::E;
use crate::callback::{Callback, NoOpCallback};
use crate::engine::equality::EqualityEngine;
use crate::engine::signed::SignedEngine;
use crate::engine::{EngineParams, HeuristicEngine};
use crate::error::SolverError;
use crate::problem::ProblemInstance;
use crate::terminators::{NoOpTerminator, Terminator};

/// Configuration recognized at each solve (spec section 6, the configuration
/// table). Defaults match the table exactly: `limit=100`, `kappa=0.001`,
/// `ell=0.0001`, `theta=0.001`.
pub struct Config {
    pub limit: usize,
    pub kappa: E,
    pub ell: E,
    pub theta: E,
    pub callback: Box<dyn Callback>,
    pub terminator: Box<dyn Terminator>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limit: 100,
            kappa: 0.001,
            ell: 0.0001,
            theta: 0.001,
            callback: Box::new(NoOpCallback),
            terminator: Box::new(NoOpTerminator),
        }
    }
}

/// Output of a successful solve (spec section 6, "Result output").
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub x: Vec<bool>,
    pub iterations: usize,
}

fn validate_shape(problem: &ProblemInstance) -> Result<(), SolverError> {
    match problem {
        ProblemInstance::Equality(p) => {
            if p.b().is_empty() || p.c().nrows() == 0 {
                return Err(SolverError::InvalidInput(
                    "b and c must be non-empty".to_string(),
                ));
            }
            if p.a().rows() * p.a().cols() != p.m() * p.n() {
                return Err(SolverError::InvalidInput(format!(
                    "|A| = {} does not equal m*n = {}",
                    p.a().rows() * p.a().cols(),
                    p.m() * p.n()
                )));
            }
        }
        ProblemInstance::Signed(p) => {
            if p.b().is_empty() || p.c().nrows() == 0 {
                return Err(SolverError::InvalidInput(
                    "b and c must be non-empty".to_string(),
                ));
            }
            if p.a().rows() * p.a().cols() != p.m() * p.n() {
                return Err(SolverError::InvalidInput(format!(
                    "|A| = {} does not equal m*n = {}",
                    p.a().rows() * p.a().cols(),
                    p.m() * p.n()
                )));
            }
        }
    }
    Ok(())
}

/// Runs the bounded outer loop (spec section 4.5) for an already-constructed
/// engine, consulting `config.callback`/`config.terminator` between sweeps (spec
/// section 5: the terminator is checked only between whole sweeps, never inside a
/// row update).
fn run<Eng: HeuristicEngine>(
    engine: &mut Eng,
    config: &mut Config,
) -> Result<SolveResult, SolverError> {
    config.terminator.initialize();
    for it in 0..config.limit {
        if engine.step() {
            return Ok(SolveResult {
                x: engine.assignment().to_vec(),
                iterations: it,
            });
        }
        config.callback.call(it, engine);
        if config.terminator.should_terminate() {
            return Err(SolverError::TimedOut { iterations: it + 1 });
        }
    }
    Err(SolverError::NoSolution {
        iterations: config.limit,
    })
}

/// Validates the problem, builds the variant-appropriate engine, and runs the
/// bounded outer loop (spec section 4.5).
pub fn solve(
    problem: &ProblemInstance,
    config: &mut Config,
) -> Result<SolveResult, SolverError> {
    validate_shape(problem)?;
    let params = EngineParams::new(config.kappa, config.ell, config.theta)?;

    match problem {
        ProblemInstance::Equality(p) => {
            let mut engine = EqualityEngine::new(p, params)?;
            run(&mut engine, config)
        }
        ProblemInstance::Signed(p) => {
            let mut engine = SignedEngine::new(p, params)?;
            run(&mut engine, config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::dense::IntMatrix;
    use crate::problem::{Bound, EqualityProblem, SignedProblem};
    use faer::Col;

    fn default_config() -> Config {
        Config {
            limit: 50,
            ..Config::default()
        }
    }

    #[test]
    fn solves_trivial_single_variable() {
        let a = IntMatrix::from_row_major(1, 1, vec![1]);
        let mut c = Col::zeros(1);
        c[0] = 1.0;
        let problem = ProblemInstance::Equality(EqualityProblem::new(1, 1, a, vec![1], c));
        let mut config = Config {
            limit: 10,
            kappa: 0.1,
            ell: 0.01,
            theta: 0.5,
            ..Config::default()
        };
        let result = solve(&problem, &mut config).unwrap();
        assert_eq!(result.x, vec![true]);
        assert!(result.iterations <= 1);
    }

    #[test]
    fn picks_two_cheapest_of_three() {
        let a = IntMatrix::from_row_major(1, 3, vec![1, 1, 1]);
        let mut c = Col::zeros(3);
        c[0] = 1.0;
        c[1] = 2.0;
        c[2] = 3.0;
        let problem = ProblemInstance::Equality(EqualityProblem::new(1, 3, a, vec![2], c));
        let mut config = default_config();
        let result = solve(&problem, &mut config).unwrap();
        assert_eq!(result.x, vec![true, true, false]);
    }

    #[test]
    fn over_constrained_problem_reports_no_solution() {
        let a = IntMatrix::from_row_major(1, 2, vec![1, 1]);
        let mut c = Col::zeros(2);
        c[0] = 1.0;
        c[1] = 1.0;
        let problem = ProblemInstance::Equality(EqualityProblem::new(1, 2, a, vec![3], c));
        let mut config = Config {
            limit: 20,
            ..Config::default()
        };
        match solve(&problem, &mut config) {
            Err(SolverError::NoSolution { iterations }) => assert_eq!(iterations, 20),
            other => panic!("expected NoSolution, got {other:?}"),
        }
    }

    #[test]
    fn rejects_kappa_at_one_with_zero_iterations() {
        let a = IntMatrix::from_row_major(1, 2, vec![1, 1]);
        let c = Col::zeros(2);
        let problem = ProblemInstance::Equality(EqualityProblem::new(1, 2, a, vec![1], c));
        let mut config = Config {
            kappa: 1.0,
            ..Config::default()
        };
        assert!(matches!(
            solve(&problem, &mut config),
            Err(SolverError::InvalidParameter(_))
        ));
    }

    #[test]
    fn signed_variant_satisfies_interval() {
        let a = IntMatrix::from_row_major(1, 3, vec![1, -1, 1]);
        let mut c = Col::zeros(3);
        c[0] = 1.0;
        c[1] = -2.0;
        c[2] = 1.0;
        let problem = ProblemInstance::Signed(SignedProblem::new(
            1,
            3,
            a,
            vec![Bound::new(0.0, 1.0)],
            c,
        ));
        let mut config = Config {
            limit: 20,
            ..Config::default()
        };
        let result = solve(&problem, &mut config).unwrap();
        let sum = result.x[0] as i64 - result.x[1] as i64 + result.x[2] as i64;
        assert!((0..=1).contains(&sum));
    }
}
