//! Row-major dense storage for the Wedelin heuristic.
//!
//! The engines sweep rows repeatedly and scale whole rows of the penalty matrix in
//! place, so row-major layout is mandatory: a row is a contiguous slice, and no
//! factorization or decomposition support is needed (see `copters::linalg` for that
//! kind of machinery; this solver has no use for it).

use crate::E;

/// Dense row-major matrix of small integers, used for the constraint matrix `A`.
///
/// Entries are `{0, 1}` in the equality variant and `{-1, 0, 1}` in the signed
/// variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntMatrix {
    rows: usize,
    cols: usize,
    data: Vec<i32>,
}

impl IntMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    pub fn from_row_major(rows: usize, cols: usize, data: Vec<i32>) -> Self {
        assert_eq!(data.len(), rows * cols, "data length must equal rows * cols");
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i32 {
        debug_assert!(i < self.rows && j < self.cols, "index out of bounds");
        self.data[i * self.cols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: i32) {
        debug_assert!(i < self.rows && j < self.cols, "index out of bounds");
        self.data[i * self.cols + j] = value;
    }

    /// Returns row `i` as a contiguous slice.
    pub fn row(&self, i: usize) -> &[i32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [i32] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Column `j` of the matrix, materialized (columns are not contiguous in
    /// row-major storage, so this allocates).
    pub fn column(&self, j: usize) -> Vec<i32> {
        (0..self.rows).map(|i| self.get(i, j)).collect()
    }
}

/// Dense row-major matrix of reals, used for the penalty matrix `P`.
#[derive(Debug, Clone, PartialEq)]
pub struct RealMatrix {
    rows: usize,
    cols: usize,
    data: Vec<E>,
}

impl RealMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> E {
        debug_assert!(i < self.rows && j < self.cols, "index out of bounds");
        self.data[i * self.cols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: E) {
        debug_assert!(i < self.rows && j < self.cols, "index out of bounds");
        self.data[i * self.cols + j] = value;
    }

    pub fn row(&self, i: usize) -> &[E] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [E] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Scales row `i` in place by `factor` (`P[k, :] *= theta`).
    pub fn scale_row(&mut self, i: usize, factor: E) {
        for value in self.row_mut(i) {
            *value *= factor;
        }
    }

    pub fn column(&self, j: usize) -> Vec<E> {
        (0..self.rows).map(|i| self.get(i, j)).collect()
    }
}

/// Computes `A * x` into an integer vector, treating `x` as `{0, 1}`.
pub fn matvec_bits(a: &IntMatrix, x: &[bool]) -> Vec<i64> {
    assert_eq!(a.cols(), x.len(), "shape mismatch in A * x");
    (0..a.rows())
        .map(|i| {
            a.row(i)
                .iter()
                .zip(x.iter())
                .filter(|(_, &xj)| xj)
                .map(|(&aij, _)| aij as i64)
                .sum()
        })
        .collect()
}

/// Elementwise equality of two integer vectors.
pub fn vec_eq(lhs: &[i64], rhs: &[i64]) -> bool {
    lhs == rhs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_matrix_row_major_layout() {
        let mut m = IntMatrix::zeros(2, 3);
        m.set(0, 0, 1);
        m.set(0, 2, -1);
        m.set(1, 1, 1);
        assert_eq!(m.row(0), &[1, 0, -1]);
        assert_eq!(m.row(1), &[0, 1, 0]);
        assert_eq!(m.column(1), vec![0, 1]);
    }

    #[test]
    fn real_matrix_row_scaling() {
        let mut p = RealMatrix::zeros(2, 2);
        p.set(0, 0, 2.0);
        p.set(0, 1, 4.0);
        p.set(1, 0, 8.0);
        p.scale_row(0, 0.5);
        assert_eq!(p.row(0), &[1.0, 2.0]);
        assert_eq!(p.row(1), &[8.0, 0.0]);
    }

    #[test]
    fn matvec_bits_selects_ones() {
        let a = IntMatrix::from_row_major(1, 3, vec![1, 1, 1]);
        let x = vec![true, false, true];
        assert_eq!(matvec_bits(&a, &x), vec![2]);
    }

    #[test]
    fn matvec_bits_handles_signed_entries() {
        let a = IntMatrix::from_row_major(1, 3, vec![1, -1, 1]);
        let x = vec![true, true, false];
        assert_eq!(matvec_bits(&a, &x), vec![0]);
    }

    #[test]
    fn vec_eq_detects_mismatch() {
        assert!(vec_eq(&[1, 2, 3], &[1, 2, 3]));
        assert!(!vec_eq(&[1, 2, 3], &[1, 2, 4]));
    }
}
