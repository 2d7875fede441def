//! Dense row-major `N×N` matrices of `f64`.
//!
//! Distances, structural weights, transition rates and traffic are all
//! stored this way. The row-major layout is also the wire format: a
//! caller's flattened buffer is adopted as-is by
//! [`SquareMatrix::from_row_major`].

use std::ops::{Index, IndexMut};

use crate::error::NetworkError;

/// A square matrix stored row-major in one contiguous buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct SquareMatrix {
    dim: usize,
    data: Vec<f64>,
}

impl SquareMatrix {
    /// A `dim × dim` matrix of zeros.
    pub fn zeros(dim: usize) -> Self {
        Self::filled(dim, 0.0)
    }

    /// A `dim × dim` matrix with every entry set to `value`.
    pub fn filled(dim: usize, value: f64) -> Self {
        Self {
            dim,
            data: vec![value; dim * dim],
        }
    }

    /// Adopt a flattened row-major buffer of length `dim * dim`.
    ///
    /// # Errors
    ///
    /// [`NetworkError::LengthMismatch`] if the buffer length is wrong.
    pub fn from_row_major(
        what: &'static str,
        dim: usize,
        data: Vec<f64>,
    ) -> Result<Self, NetworkError> {
        if data.len() != dim * dim {
            return Err(NetworkError::LengthMismatch {
                what,
                expected: dim * dim,
                actual: data.len(),
            });
        }
        Ok(Self { dim, data })
    }

    /// Build from nested rows. Every row must have `rows.len()` columns.
    ///
    /// # Errors
    ///
    /// [`NetworkError::RaggedRows`] for the first row of the wrong length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, NetworkError> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != dim {
                return Err(NetworkError::RaggedRows {
                    row,
                    expected: dim,
                    actual: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self { dim, data })
    }

    /// Build by evaluating `f(i, j)` for every entry.
    pub fn from_fn(dim: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(dim * dim);
        for i in 0..dim {
            for j in 0..dim {
                data.push(f(i, j));
            }
        }
        Self { dim, data }
    }

    /// Side length.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.dim + j]
    }

    /// Overwrite entry `(i, j)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.dim + j] = value;
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// The whole row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Set every entry to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Give back the row-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Sum of all entries.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Whether `m[i][j] == m[j][i]` within `tolerance` for every pair.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..self.dim).all(|i| {
            (i + 1..self.dim).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance)
        })
    }

    /// Iterate `(i, j, value)` over every entry in row-major order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(k, &v)| (k / self.dim, k % self.dim, v))
    }
}

impl Index<(usize, usize)> for SquareMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.dim + j]
    }
}

impl IndexMut<(usize, usize)> for SquareMatrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.dim + j]
    }
}
