//! Signed (interval) variant (spec section 4.4): `A in {-1,0,1}^(m x n)`, rows
//! `lo(i) <= sum_j A(i,j) x(j) <= hi(i)`.
//!
//! A row with a `-1` entry is handled by the classic substitution `y(j) = 1 - x(j)`:
//! within the row, a negative-coefficient column is ranked on `-r(j)` instead of
//! `r(j)`, which turns the row into an ordinary "pick the best `d` columns" decision
//! like the equality variant. The source mutates the shared `A(k, j)` entry in place
//! for the duration of the row update and restores it afterward; here the sign flip
//! is folded into the per-row score computation instead, which gets the same number
//! without a window where the shared matrix holds a transiently wrong value.
//!
//! `negated` stores *positions* into `cols`, not raw column indices — the source
//! indexes the sign flip by column id directly, which silently corrupts the
//! computation on any row that doesn't span every column. Position-indexing sidesteps
//! that.

use faer::Col;

use crate::E;
use crate::engine::{DualUpdateRule, EngineParams, HeuristicEngine, RowUpdatePolarity};
use crate::error::SolverError;
use crate::linalg::dense::{IntMatrix, RealMatrix};
use crate::problem::{Bound, SignedProblem};

#[derive(Debug, Clone)]
struct RowRecord {
    cols: Vec<usize>,
    negated: Vec<usize>,
    scores: Vec<(E, usize)>,
    lo_eff: usize,
    hi_eff: usize,
}

impl RowRecord {
    fn new(row: usize, a: &IntMatrix, bound: Bound) -> Result<Self, SolverError> {
        let mut cols = Vec::new();
        let mut negated = Vec::new();
        for j in 0..a.cols() {
            let entry = a.get(row, j);
            if entry != 0 {
                if entry < 0 {
                    negated.push(cols.len());
                }
                cols.push(j);
            }
        }
        if cols.len() < 2 {
            return Err(SolverError::DegenerateRow { row });
        }

        let n_neg = negated.len() as E;
        let lo_eff = (bound.lo + n_neg).ceil();
        let hi_eff = (bound.hi + n_neg).floor();
        let lo_eff = lo_eff.max(0.0) as usize;
        let hi_eff = (hi_eff.max(0.0) as usize).min(cols.len());
        if lo_eff > hi_eff {
            return Err(SolverError::InvalidInput(format!(
                "row {row}: bound [{}, {}] is unsatisfiable for a {}-variable row with {} negated entries",
                bound.lo,
                bound.hi,
                cols.len(),
                negated.len()
            )));
        }
        // The largest "inside" set this row can ever select has size hi_eff; if
        // that is already below 2 the top-two selection in `update` (spec section
        // 4.2(c)) can never be satisfied, so the row is degenerate for every
        // possible sweep, not just this one.
        if hi_eff < 2 {
            return Err(SolverError::DegenerateRow { row });
        }

        let scores = vec![(0.0, 0); cols.len()];
        Ok(Self {
            cols,
            negated,
            scores,
            lo_eff,
            hi_eff,
        })
    }
}

/// Engine state for the signed/interval variant (spec section 4.4).
pub struct SignedEngine {
    a: IntMatrix,
    b: Vec<Bound>,
    c: Col<E>,
    x: Vec<bool>,
    pi: Col<E>,
    p: RealMatrix,
    rows: Vec<RowRecord>,
    params: EngineParams,
    m: usize,
    n: usize,
}

impl SignedEngine {
    pub fn new(problem: &SignedProblem, params: EngineParams) -> Result<Self, SolverError> {
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
        self.b[k].contains(sum as E)
    }

    /// Whether every row currently satisfies its interval (spec section 4.4 adds
    /// this as the variant's own notion of global feasibility, since there is no
    /// single fixed target per row to compare against).
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
            let raw = self.c[j] - sum_a_pi - sum_a_p;
            record.scores[pos] = (raw, j);
        }
        for &pos in &record.negated {
            record.scores[pos].0 = -record.scores[pos].0;
        }
        record
            .scores
            .sort_by(|lhs, rhs| lhs.0.partial_cmp(&rhs.0).unwrap().then(lhs.1.cmp(&rhs.1)));

        let below_zero = record.scores.partition_point(|&(score, _)| score < 0.0);
        let d = below_zero.clamp(record.lo_eff, record.hi_eff);

        let r_plus = record.scores[d.saturating_sub(1).min(record.scores.len() - 1)].0;
        let r_minus = record.scores[d.min(record.scores.len() - 1)].0;

        self.pi[k] += match self.params.dual_update {
            DualUpdateRule::Corrected => (r_plus + r_minus) / 2.0,
            DualUpdateRule::SourceVerbatim => r_plus + r_minus / 2.0,
        };

        let delta =
            (self.params.kappa / (1.0 - self.params.kappa)) * (r_plus - r_minus) + self.params.ell;

        let negated_positions: std::collections::HashSet<usize> =
            record.negated.iter().copied().collect();
        for (idx, &(_, j)) in record.scores.iter().enumerate() {
            let pos = record.cols.iter().position(|&col| col == j).unwrap();
            let selected = idx < d;
            self.x[j] = if negated_positions.contains(&pos) {
                !selected
            } else {
                selected
            };
            let v = self.p.get(k, j);
            if self.x[j] {
                self.p.set(k, j, v - delta);
            } else {
                self.p.set(k, j, v + delta);
            }
        }

        self.rows[k] = record;
    }
}

impl HeuristicEngine for SignedEngine {
    fn step(&mut self) -> bool {
        for k in 0..self.m {
            let row_is_feasible = self.row_feasible(k);
            let should_update = match self.params.row_update_polarity {
                RowUpdatePolarity::Corrected => !row_is_feasible,
                RowUpdatePolarity::SourceVerbatim => row_is_feasible,
            };
            if should_update {
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
    fn rejects_degenerate_single_variable_row() {
        let a = IntMatrix::from_row_major(1, 2, vec![1, 0]);
        let problem = SignedProblem::new(1, 2, a, vec![Bound::new(0.0, 1.0)], Col::zeros(2));
        assert!(matches!(
            SignedEngine::new(&problem, params()),
            Err(SolverError::DegenerateRow { row: 0 })
        ));
    }

    #[test]
    fn rejects_unsatisfiable_bound() {
        let a = IntMatrix::from_row_major(1, 2, vec![1, 1]);
        let problem = SignedProblem::new(1, 2, a, vec![Bound::new(5.0, 6.0)], Col::zeros(2));
        assert!(matches!(
            SignedEngine::new(&problem, params()),
            Err(SolverError::InvalidInput(_))
        ));
    }

    #[test]
    fn converges_on_ternary_row() {
        let a = IntMatrix::from_row_major(1, 3, vec![1, -1, 1]);
        let mut c = Col::zeros(3);
        c[0] = 3.0;
        c[1] = 1.0;
        c[2] = 2.0;
        let problem = SignedProblem::new(1, 3, a, vec![Bound::new(0.0, 1.0)], c);
        let mut engine = SignedEngine::new(&problem, params()).unwrap();
        let mut feasible = engine.feasible();
        for _ in 0..200 {
            if feasible {
                break;
            }
            feasible = engine.step();
        }
        assert!(feasible);
    }

    #[test]
    fn source_verbatim_polarity_updates_rows_already_inside_interval() {
        // With the source's literal (inverted) predicate, a row that starts out
        // inside its interval gets touched on the very first sweep even though
        // `row_feasible` reports it satisfied already.
        let a = IntMatrix::from_row_major(1, 3, vec![1, -1, 1]);
        let mut c = Col::zeros(3);
        c[0] = 1.0;
        c[1] = 1.0;
        c[2] = 1.0;
        let problem = SignedProblem::new(1, 3, a, vec![Bound::new(-1.0, 1.0)], c);
        let params = params().with_row_update_polarity(RowUpdatePolarity::SourceVerbatim);
        let mut engine = SignedEngine::new(&problem, params).unwrap();
        assert!(engine.row_feasible(0));
        let pi_before = engine.pi[0];
        engine.step();
        assert_ne!(engine.pi[0], pi_before);
    }
}
