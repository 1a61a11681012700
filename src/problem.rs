//! Problem-instance input types (spec section 3, "Problem instance").
//!
//! These are plain data containers, deliberately free of validation logic: shape and
//! parameter validation is the responsibility of the layer that owns it per spec
//! section 7 ("Parameter and input validation happens once, at engine construction") —
//! [`crate::driver::solve`] checks the coarse, early-exit conditions (non-empty `b`/`c`,
//! `|A| == m * n`) before an engine is even built, and [`crate::engine`] re-checks the
//! finer-grained shape and parameter constraints when it builds its own buffers.

use faer::Col;

use crate::linalg::dense::IntMatrix;
use crate::E;

/// Per-row lower/upper bound for the signed variant (`b_k.lo <= sum <= b_k.hi`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub lo: E,
    pub hi: E,
}

impl Bound {
    pub fn new(lo: E, hi: E) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, value: E) -> bool {
        self.lo <= value && value <= self.hi
    }
}

/// Equality-variant input: `A in {0,1}^(m x n)`, `b in Z^m`, single-row equalities
/// `sum_j A(i,j) x(j) = b(i)`.
#[derive(Debug, Clone)]
pub struct EqualityProblem {
    m: usize,
    n: usize,
    a: IntMatrix,
    b: Vec<i64>,
    c: Col<E>,
}

impl EqualityProblem {
    pub fn new(m: usize, n: usize, a: IntMatrix, b: Vec<i64>, c: Col<E>) -> Self {
        Self { m, n, a, b, c }
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn a(&self) -> &IntMatrix {
        &self.a
    }

    pub fn b(&self) -> &[i64] {
        &self.b
    }

    pub fn c(&self) -> &Col<E> {
        &self.c
    }
}

/// Signed-variant input: `A in {-1,0,1}^(m x n)`, `b` given as per-row `(lo, hi)`
/// bounds, `lo(i) <= sum_j A(i,j) x(j) <= hi(i)`.
#[derive(Debug, Clone)]
pub struct SignedProblem {
    m: usize,
    n: usize,
    a: IntMatrix,
    b: Vec<Bound>,
    c: Col<E>,
}

impl SignedProblem {
    pub fn new(m: usize, n: usize, a: IntMatrix, b: Vec<Bound>, c: Col<E>) -> Self {
        Self { m, n, a, b, c }
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn a(&self) -> &IntMatrix {
        &self.a
    }

    pub fn b(&self) -> &[Bound] {
        &self.b
    }

    pub fn c(&self) -> &Col<E> {
        &self.c
    }
}

/// Dispatch wrapper the driver uses to pick an engine without the caller needing to
/// know the engine types (spec section 6, the `variant` configuration field).
#[derive(Debug, Clone)]
pub enum ProblemInstance {
    Equality(EqualityProblem),
    Signed(SignedProblem),
}

impl ProblemInstance {
    pub fn m(&self) -> usize {
        match self {
            ProblemInstance::Equality(p) => p.m(),
            ProblemInstance::Signed(p) => p.m(),
        }
    }

    pub fn n(&self) -> usize {
        match self {
            ProblemInstance::Equality(p) => p.n(),
            ProblemInstance::Signed(p) => p.n(),
        }
    }
}
