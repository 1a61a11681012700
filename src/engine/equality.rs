//! Equality variant (spec section 4.3): `A in {0,1}^(m x n)`, rows `sum_j A(i,j) x(j) = b(i)`.

use faer::Col;

use crate::E;
use crate::engine::{EngineParams, HeuristicEngine, DualUpdateRule};
use crate::error::SolverError;
use crate::linalg::dense::{IntMatrix, RealMatrix};
use crate::problem::EqualityProblem;

/// Per-row bookkeeping: which columns participate, their current reduced-cost
/// ranking, and the row's target count. `scores` is reused across calls to
/// [`EqualityEngine::update_row`] purely to avoid reallocating every sweep.
#[derive(Debug, Clone)]
struct RowRecord {
    cols: Vec<usize>,
    scores: Vec<(E, usize)>,
    target: usize,
}

impl RowRecord {
    fn new(row: usize, a: &IntMatrix, target: i64) -> Result<Self, SolverError> {
        let cols: Vec<usize> = (0..a.cols()).filter(|&j| a.get(row, j) != 0).collect();
        if target < 1 {
            return Err(SolverError::InvalidInput(format!(
                "row {row}: b={target} must be positive"
            )));
        }
        // `target` may exceed `cols.len()` (spec section 8 scenario 4: the maximum
        // attainable sum is less than b_k). That row is over-constrained, not
        // ill-posed: it can never become feasible, which the driver's iteration
        // budget discovers on its own (NoSolution), so construction must not reject
        // it. `update_row` clamps its ranking-boundary reads accordingly.
        let scores = vec![(0.0, 0); cols.len()];
        Ok(Self {
            cols,
            scores,
            target: target as usize,
        })
    }
}

/// Engine state for the equality variant (spec section 4.3): the constraint
/// matrix/targets/costs, the candidate assignment, the dual vector `pi`, and the
/// penalty matrix `P`.
pub struct EqualityEngine {
    a: IntMatrix,
    b: Vec<i64>,
    c: Col<E>,
    x: Vec<bool>,
    pi: Col<E>,
    p: RealMatrix,
    rows: Vec<RowRecord>,
    params: EngineParams,
    m: usize,
    n: usize,
}

impl EqualityEngine {
    pub fn new(problem: &EqualityProblem, params: EngineParams) -> Result<Self, SolverError> {
        let m = problem.m();
        let n = problem.n();
        if problem.a().rows() != m || problem.a().cols() != n {
            return Err(SolverError::ShapeMismatch(format!(
                "A is {}x{}, expected {m}x{n}",
                problem.a().rows(),
                problem.a().cols()
            )));
        }
        if problem.b().len() != m {
            return Err(SolverError::ShapeMismatch(format!(
                "b has {} entries, expected {m}",
                problem.b().len()
            )));
        }
        if problem.c().nrows() != n {
            return Err(SolverError::ShapeMismatch(format!(
                "c has {} entries, expected {n}",
                problem.c().nrows()
            )));
        }

        let mut rows = Vec::with_capacity(m);
        for k in 0..m {
            rows.push(RowRecord::new(k, problem.a(), problem.b()[k])?);
        }

        let c = problem.c().clone();
        let x: Vec<bool> = (0..n).map(|j| c[j] <= 0.0).collect();

        Ok(Self {
            a: problem.a().clone(),
            b: problem.b().to_vec(),
            c,
            x,
            pi: Col::zeros(m),
            p: RealMatrix::zeros(m, n),
            rows,
            params,
            m,
            n,
        })
    }

    pub fn row_feasible(&self, k: usize) -> bool {
        let sum: i64 = self
            .a
            .row(k)
            .iter()
            .zip(self.x.iter())
            .filter(|(_, &xj)| xj)
            .map(|(&a, _)| a as i64)
            .sum();
        sum == self.b[k]
    }

    pub fn feasible(&self) -> bool {
        (0..self.m).all(|k| self.row_feasible(k))
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn n(&self) -> usize {
        self.n
    }

    fn update_row(&mut self, k: usize) {
        self.p.scale_row(k, self.params.theta);

        let mut record = self.rows[k].clone();
        if record.cols.is_empty() {
            self.rows[k] = record;
            return;
        }
        for (pos, &j) in record.cols.iter().enumerate() {
            let mut sum_a_pi = 0.0;
            let mut sum_a_p = 0.0;
            for h in 0..self.m {
                let a_hj = self.a.get(h, j);
                if a_hj != 0 {
                    sum_a_pi += a_hj as E * self.pi[h];
                    sum_a_p += a_hj as E * self.p.get(h, j);
                }
            }
            record.scores[pos] = (self.c[j] - sum_a_pi - sum_a_p, j);
        }
        record
            .scores
            .sort_by(|lhs, rhs| lhs.0.partial_cmp(&rhs.0).unwrap().then(lhs.1.cmp(&rhs.1)));

        let bk = record.target;
        let len = record.scores.len();
        // `bk` may exceed `len` for an over-constrained row (spec section 8
        // scenario 4): there is no b_k-th ranking element, so clamp onto the last
        // one instead of indexing past the end. Every entry then ranks as "should
        // be 1" (see the assignment loop below), and the row's attainable sum
        // still falls short of `bk`, so it stays infeasible forever, which is the
        // correct outcome for an unsatisfiable row.
        let r_plus = record.scores[(bk - 1).min(len - 1)].0;
        // When b_k spans every variable in the row there is no "should be 0" side
        // to rank against; collapse r_minus onto r_plus so the dual/delta formulas
        // degrade to pi(k) += r_plus, delta = ell instead of indexing past the end.
        let r_minus = if bk < len {
            record.scores[bk].0
        } else {
            r_plus
        };

        self.pi[k] += match self.params.dual_update {
            DualUpdateRule::Corrected => (r_plus + r_minus) / 2.0,
            DualUpdateRule::SourceVerbatim => r_plus + r_minus / 2.0,
        };

        let delta =
            (self.params.kappa / (1.0 - self.params.kappa)) * (r_plus - r_minus) + self.params.ell;

        for (idx, &(_, j)) in record.scores.iter().enumerate() {
            if idx < bk {
                self.x[j] = true;
                let v = self.p.get(k, j);
                self.p.set(k, j, v - delta);
            } else {
                self.x[j] = false;
                let v = self.p.get(k, j);
                self.p.set(k, j, v + delta);
            }
        }

        self.rows[k] = record;
    }
}

impl HeuristicEngine for EqualityEngine {
    fn step(&mut self) -> bool {
        for k in 0..self.m {
            if !self.row_feasible(k) {
                self.update_row(k);
            }
        }
        self.feasible()
    }

    fn assignment(&self) -> &[bool] {
        &self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::dense::IntMatrix;

    fn params() -> EngineParams {
        EngineParams::new(0.001, 0.0001, 0.001).unwrap()
    }

    #[test]
    fn rejects_shape_mismatch() {
        let a = IntMatrix::from_row_major(1, 2, vec![1, 1]);
        let problem = EqualityProblem::new(1, 2, a, vec![1, 1], Col::zeros(2));
        assert!(matches!(
            EqualityEngine::new(&problem, params()),
            Err(SolverError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn rejects_nonpositive_target() {
        let a = IntMatrix::from_row_major(1, 2, vec![1, 1]);
        let problem = EqualityProblem::new(1, 2, a, vec![0], Col::zeros(2));
        assert!(matches!(
            EqualityEngine::new(&problem, params()),
            Err(SolverError::InvalidInput(_))
        ));
    }

    /// Spec section 8 scenario 4: a row whose target exceeds the number of
    /// variables that appear in it is over-constrained, not ill-posed — it must
    /// construct successfully and simply never reach feasibility.
    #[test]
    fn over_constrained_row_constructs_and_never_becomes_feasible() {
        let a = IntMatrix::from_row_major(1, 2, vec![1, 1]);
        let mut c = Col::zeros(2);
        c[0] = 1.0;
        c[1] = 1.0;
        let problem = EqualityProblem::new(1, 2, a, vec![3], c);
        let mut engine = EqualityEngine::new(&problem, params()).unwrap();
        for _ in 0..20 {
            assert!(!engine.step());
        }
        assert_eq!(engine.assignment(), &[true, true]);
    }

    #[test]
    fn greedy_seed_selects_nonpositive_cost_columns() {
        let a = IntMatrix::from_row_major(1, 3, vec![1, 1, 1]);
        let mut c = Col::zeros(3);
        c[0] = -1.0;
        c[1] = 1.0;
        c[2] = 0.0;
        let problem = EqualityProblem::new(1, 3, a, vec![1], c);
        let engine = EqualityEngine::new(&problem, params()).unwrap();
        assert_eq!(engine.assignment(), &[true, false, true]);
    }

    #[test]
    fn converges_on_trivial_single_row() {
        let a = IntMatrix::from_row_major(1, 3, vec![1, 1, 1]);
        let mut c = Col::zeros(3);
        c[0] = 5.0;
        c[1] = 1.0;
        c[2] = 3.0;
        let problem = EqualityProblem::new(1, 3, a, vec![1], c);
        let mut engine = EqualityEngine::new(&problem, params()).unwrap();
        let mut feasible = engine.feasible();
        for _ in 0..100 {
            if feasible {
                break;
            }
            feasible = engine.step();
        }
        assert!(feasible);
        assert_eq!(engine.assignment().iter().filter(|&&b| b).count(), 1);
    }
}
