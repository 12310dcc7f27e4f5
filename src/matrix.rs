//! Dense matrix value type used throughout the projection engine.
//!
//! `Matrix` wraps an `nalgebra::DMatrix<f64>` and adds the handful of
//! operations the chart needs: shape-checked multiplication and addition,
//! transpose, Gauss-Jordan inversion, and helpers for treating a one-column
//! matrix as a vector.
//!
//! Equality compares cells after rounding both operands to
//! [`DECIMALS`] decimal places, the same tolerance the inversion uses to
//! decide whether a pivot is zero.

use std::ops::{Add, Index, Mul};

use nalgebra::{DMatrix, Matrix3, Vector3};

use crate::error::GeometryError;

/// Decimal places used for pivot tests and matrix equality.
pub const DECIMALS: i32 = 6;

/// Round `value` to `decimals` decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn is_zero(value: f64) -> bool {
    round_to(value, DECIMALS) == 0.0
}

/// Rectangular matrix of `f64`, indexed `(row, col)`.
///
/// A vector is a matrix with exactly one column.
#[derive(Debug, Clone)]
pub struct Matrix {
    data: DMatrix<f64>,
}

impl Matrix {
    /// Build a matrix from row-major nested rows.
    ///
    /// Every row must have the length of the first one.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, GeometryError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != ncols)
        {
            return Err(GeometryError::Ragged {
                row,
                expected: ncols,
                found,
            });
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Ok(Self {
            data: DMatrix::from_row_slice(nrows, ncols, &flat),
        })
    }

    /// Build a matrix from a fixed-size array of rows.
    pub fn from_rows<const R: usize, const C: usize>(rows: [[f64; C]; R]) -> Self {
        Self {
            data: DMatrix::from_fn(R, C, |i, j| rows[i][j]),
        }
    }

    pub fn identity(n: usize) -> Self {
        Self {
            data: DMatrix::identity(n, n),
        }
    }

    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: DMatrix::zeros(nrows, ncols),
        }
    }

    /// Column vector from scalar components, in row order.
    pub fn vector(values: &[f64]) -> Self {
        Self {
            data: DMatrix::from_column_slice(values.len(), 1, values),
        }
    }

    /// Scalar components of the first column, in row order.
    pub fn unpack_vector(&self) -> Vec<f64> {
        if self.ncols() == 0 {
            return Vec::new();
        }
        self.data.column(0).iter().copied().collect()
    }

    /// Components of a 3-vector.
    pub fn unpack3(&self) -> Result<(f64, f64, f64), GeometryError> {
        if self.shape() != (3, 1) {
            return Err(GeometryError::NotAVector {
                expected: 3,
                rows: self.nrows(),
                cols: self.ncols(),
            });
        }
        Ok((self.data[(0, 0)], self.data[(1, 0)], self.data[(2, 0)]))
    }

    pub fn to_vector3(&self) -> Result<Vector3<f64>, GeometryError> {
        let (x, y, z) = self.unpack3()?;
        Ok(Vector3::new(x, y, z))
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    pub fn is_vector(&self) -> bool {
        self.ncols() == 1
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    /// Borrow the underlying nalgebra storage.
    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn transpose(&self) -> Self {
        Self {
            data: self.data.transpose(),
        }
    }

    /// Matrix product `self · other`.
    ///
    /// `other` is transposed first so each output cell is the dot product of
    /// a row of `self` with a row of `otherᵀ`. Requires
    /// `self.ncols() == other.nrows()`.
    pub fn multiply(&self, other: &Matrix) -> Result<Self, GeometryError> {
        if self.ncols() != other.nrows() {
            return Err(GeometryError::ShapeMismatch {
                op: "multiply",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let bt = other.transpose();
        let data = DMatrix::from_fn(self.nrows(), bt.nrows(), |i, j| {
            self.data.row(i).dot(&bt.data.row(j))
        });
        Ok(Self { data })
    }

    /// Element-wise sum; shapes must be identical.
    pub fn add(&self, other: &Matrix) -> Result<Self, GeometryError> {
        if self.shape() != other.shape() {
            return Err(GeometryError::ShapeMismatch {
                op: "add",
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(Self {
            data: &self.data + &other.data,
        })
    }

    /// Inverse of a square, non-singular matrix by Gauss-Jordan elimination.
    ///
    /// The matrix is augmented with the identity and reduced below the
    /// diagonal. The upper triangle is then cleared by turning both halves
    /// 180° and running the same downward elimination again, turning back,
    /// and finally dividing every row by its pivot.
    ///
    /// A pivot is treated as zero when it rounds to zero at [`DECIMALS`]
    /// places; a zero pivot triggers a row swap, and a column with no usable
    /// pivot yields [`GeometryError::Singular`].
    pub fn invert(&self) -> Result<Self, GeometryError> {
        let (rows, cols) = self.shape();
        if rows != cols {
            return Err(GeometryError::NotSquare { rows, cols });
        }

        let mut left = self.data.clone();
        let mut right = DMatrix::<f64>::identity(rows, rows);
        eliminate_below(&mut left, &mut right)?;
        if let Some(column) = (0..rows).find(|&i| is_zero(left[(i, i)])) {
            return Err(GeometryError::Singular { column });
        }

        let mut left = half_turn(&left);
        let mut right = half_turn(&right);
        eliminate_below(&mut left, &mut right)?;

        let left = half_turn(&left);
        let mut right = half_turn(&right);
        for i in 0..rows {
            let pivot = left[(i, i)];
            if is_zero(pivot) {
                return Err(GeometryError::Singular { column: i });
            }
            right.row_mut(i).unscale_mut(pivot);
        }
        Ok(Self { data: right })
    }

    /// Divide a 3-vector by its Euclidean norm.
    pub fn normalize(&self) -> Result<Self, GeometryError> {
        let (x, y, z) = self.unpack3()?;
        let rho = (x * x + y * y + z * z).sqrt();
        if rho == 0.0 {
            return Err(GeometryError::ZeroNorm);
        }
        Ok(Self::vector(&[x / rho, y / rho, z / rho]))
    }

    /// `true` when shapes match and every cell agrees at `decimals` places.
    pub fn approx_eq(&self, other: &Matrix, decimals: i32) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| round_to(*a, decimals) == round_to(*b, decimals))
    }
}

/// Zero every entry below the diagonal of `left`, mirroring each row
/// operation onto `right`.
fn eliminate_below(
    left: &mut DMatrix<f64>,
    right: &mut DMatrix<f64>,
) -> Result<(), GeometryError> {
    let n = left.nrows();
    for p in 0..n {
        if is_zero(left[(p, p)]) {
            let swap = (p + 1..n)
                .find(|&r| !is_zero(left[(r, p)]))
                .ok_or(GeometryError::Singular { column: p })?;
            left.swap_rows(p, swap);
            right.swap_rows(p, swap);
        }
        let pivot = left[(p, p)];
        for r in p + 1..n {
            let factor = left[(r, p)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in 0..n {
                left[(r, c)] -= factor * left[(p, c)];
                right[(r, c)] -= factor * right[(p, c)];
            }
            left[(r, p)] = 0.0;
        }
    }
    Ok(())
}

/// Rotate a matrix by 180°: `(i, j) -> (n-1-i, m-1-j)`.
fn half_turn(m: &DMatrix<f64>) -> DMatrix<f64> {
    let (rows, cols) = m.shape();
    DMatrix::from_fn(rows, cols, |i, j| m[(rows - 1 - i, cols - 1 - j)])
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, DECIMALS)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[index]
    }
}

/// # Panics
///
/// Panics when the operand shapes are incompatible; use
/// [`Matrix::multiply`] to get an error instead.
impl Mul<&Matrix> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        match self.multiply(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }
}

/// # Panics
///
/// Panics when the operand shapes differ; use [`Matrix::add`] to get an
/// error instead.
impl Add<&Matrix> for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: &Matrix) -> Matrix {
        match Matrix::add(self, rhs) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }
}

impl From<Matrix3<f64>> for Matrix {
    fn from(m: Matrix3<f64>) -> Self {
        Self {
            data: DMatrix::from_fn(3, 3, |i, j| m[(i, j)]),
        }
    }
}

impl From<Vector3<f64>> for Matrix {
    fn from(v: Vector3<f64>) -> Self {
        Self::vector(v.as_slice())
    }
}

impl From<DMatrix<f64>> for Matrix {
    fn from(data: DMatrix<f64>) -> Self {
        Self { data }
    }
}
