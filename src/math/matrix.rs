use rand::prelude::*;
use serde::{Serialize, Deserialize};
use std::ops::Index;

use crate::error::{NnError, NnResult};

/// Dense row-major grid of `f64`.
///
/// Two families of operations are offered. Methods taking `&mut self`
/// (`randomize`, `map_in_place`, `add`, `add_scalar`, `hadamard`, `scale`)
/// mutate the receiver and hand it back for chaining. Everything else
/// (`mapped`, `transpose`, `product`, `subtract`, `from_array`, `copy`)
/// allocates a fresh matrix and leaves its inputs alone.
///
/// The grid is never ragged: `data` holds exactly `rows` rows of exactly
/// `cols` values. Fields are private so that invariant cannot be broken
/// from outside; snapshots are validated on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixSnapshot", into = "MatrixSnapshot")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

/// Structural snapshot of a matrix: `{ rows, cols, data }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    /// Zero-filled `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from nested rows, rejecting ragged input.
    pub fn from_data(data: Vec<Vec<f64>>) -> NnResult<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |row| row.len());
        if let Some(bad) = data.iter().position(|row| row.len() != cols) {
            return Err(NnError::MalformedSnapshot(format!(
                "row {bad} has {} values, expected {cols}",
                data[bad].len()
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Column vector (`N x 1`) holding `values` in order.
    pub fn from_array(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    /// Row-major flatten. Inverse of `from_array` for column vectors.
    pub fn to_array(&self) -> Vec<f64> {
        self.data.iter().flatten().copied().collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn data(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Deep copy with fresh storage.
    pub fn copy(&self) -> Matrix {
        self.clone()
    }

    /// Fills every element with a uniform sample in `[-range, range]`.
    pub fn randomize(&mut self, range: f64) -> &mut Self {
        self.randomize_with(range, &mut rand::thread_rng())
    }

    /// Same as `randomize`, drawing from the supplied generator.
    pub fn randomize_with<R: Rng + ?Sized>(&mut self, range: f64, rng: &mut R) -> &mut Self {
        self.map_in_place(|_, _, _| (rng.gen::<f64>() * 2.0 - 1.0) * range)
    }

    /// Replaces every element with `f(value, row, col)`.
    pub fn map_in_place<F>(&mut self, mut f: F) -> &mut Self
    where
        F: FnMut(f64, usize, usize) -> f64,
    {
        for (i, row) in self.data.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = f(*value, i, j);
            }
        }
        self
    }

    /// Non-mutating counterpart of `map_in_place`.
    pub fn mapped<F>(&self, mut f: F) -> Matrix
    where
        F: FnMut(f64, usize, usize) -> f64,
    {
        let data = self.data.iter().enumerate()
            .map(|(i, row)| row.iter().enumerate().map(|(j, &v)| f(v, i, j)).collect())
            .collect();
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    /// Elementwise `self += other`.
    pub fn add(&mut self, other: &Matrix) -> NnResult<&mut Self> {
        self.ensure_same_shape("add", other)?;
        Ok(self.map_in_place(|v, i, j| v + other.data[i][j]))
    }

    pub fn add_scalar(&mut self, n: f64) -> &mut Self {
        self.map_in_place(|v, _, _| v + n)
    }

    /// Elementwise (Hadamard) `self *= other`.
    pub fn hadamard(&mut self, other: &Matrix) -> NnResult<&mut Self> {
        self.ensure_same_shape("hadamard", other)?;
        Ok(self.map_in_place(|v, i, j| v * other.data[i][j]))
    }

    /// Scalar `self *= n`.
    pub fn scale(&mut self, n: f64) -> &mut Self {
        self.map_in_place(|v, _, _| v * n)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::new(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    /// Matrix product `a x b`; requires `a.cols == b.rows`.
    pub fn product(a: &Matrix, b: &Matrix) -> NnResult<Matrix> {
        if a.cols != b.rows {
            return Err(mismatch("product", a, b));
        }

        let mut res = Matrix::new(a.rows, b.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..a.cols {
                    sum += a.data[i][k] * b.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Elementwise `a - b` into a new matrix.
    pub fn subtract(a: &Matrix, b: &Matrix) -> NnResult<Matrix> {
        a.ensure_same_shape("subtract", b)?;
        Ok(a.mapped(|v, i, j| v - b.data[i][j]))
    }

    pub fn to_snapshot(&self) -> MatrixSnapshot {
        MatrixSnapshot {
            rows: self.rows,
            cols: self.cols,
            data: self.data.clone(),
        }
    }

    /// Rebuilds a matrix from a snapshot, checking the grid against the
    /// declared dimensions.
    pub fn from_snapshot(snapshot: MatrixSnapshot) -> NnResult<Matrix> {
        let MatrixSnapshot { rows, cols, data } = snapshot;
        if data.len() != rows {
            return Err(NnError::MalformedSnapshot(format!(
                "declared {rows} rows, grid has {}",
                data.len()
            )));
        }
        if let Some(bad) = data.iter().position(|row| row.len() != cols) {
            return Err(NnError::MalformedSnapshot(format!(
                "declared {cols} cols, row {bad} has {}",
                data[bad].len()
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    fn ensure_same_shape(&self, op: &'static str, other: &Matrix) -> NnResult<()> {
        if self.shape() != other.shape() {
            return Err(mismatch(op, self, other));
        }
        Ok(())
    }
}

fn mismatch(op: &'static str, left: &Matrix, right: &Matrix) -> NnError {
    tracing::debug!(op, left = ?left.shape(), right = ?right.shape(), "matrix shape mismatch");
    NnError::ShapeMismatch { op, left: left.shape(), right: right.shape() }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row][col]
    }
}

impl TryFrom<MatrixSnapshot> for Matrix {
    type Error = NnError;

    fn try_from(snapshot: MatrixSnapshot) -> NnResult<Matrix> {
        Matrix::from_snapshot(snapshot)
    }
}

impl From<Matrix> for MatrixSnapshot {
    fn from(m: Matrix) -> MatrixSnapshot {
        MatrixSnapshot { rows: m.rows, cols: m.cols, data: m.data }
    }
}
