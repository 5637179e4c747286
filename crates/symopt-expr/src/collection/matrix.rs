//! Row-major matrices of a single scalar kind.

use std::collections::BTreeSet;

use nalgebra::DMatrix;

use crate::collection::vector::Vector;
use crate::dims::Dims;
use crate::error::ExprError;
use crate::scalar::{K, Monomial, Polynomial, PolynomialLikeScalar, ScalarExpr, Variable};

/// A `rows x cols` grid stored row-major. Both dimensions are at least 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: PolynomialLikeScalar> Matrix<T> {
    /// Build from nested rows. Rejects empty input and ragged rows.
    pub fn new(rows: Vec<Vec<T>>) -> Result<Self, ExprError> {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, Vec::len);
        if num_rows == 0 || num_cols == 0 {
            return Err(ExprError::EmptyCollection { kind: "matrix" });
        }
        let mut data = Vec::with_capacity(num_rows * num_cols);
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != num_cols {
                return Err(ExprError::RaggedMatrix {
                    row: idx,
                    expected: num_cols,
                    found: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            rows: num_rows,
            cols: num_cols,
            data,
        })
    }

    pub fn from_row_major(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, ExprError> {
        if rows == 0 || cols == 0 || data.is_empty() {
            return Err(ExprError::EmptyCollection { kind: "matrix" });
        }
        let dims = Dims::new(rows, cols);
        if data.len() != dims.len() {
            return Err(ExprError::LengthMismatch {
                kind: "matrix",
                dims,
                expected: dims.len(),
                found: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(rows * cols, data.len());
        Self { rows, cols, data }
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.rows, self.cols)
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// Elements in row-major order.
    pub fn elements(&self) -> &[T] {
        &self.data
    }

    pub fn into_elements(self) -> Vec<T> {
        self.data
    }

    pub fn at(&self, row: usize, col: usize) -> Result<&T, ExprError> {
        if row >= self.rows || col >= self.cols {
            return Err(ExprError::IndexOutOfRange {
                index: (row, col),
                dims: self.dims(),
            });
        }
        Ok(&self.data[row * self.cols + col])
    }

    pub fn row(&self, row: usize) -> Result<Vector<T>, ExprError> {
        if row >= self.rows {
            return Err(ExprError::IndexOutOfRange {
                index: (row, 0),
                dims: self.dims(),
            });
        }
        let start = row * self.cols;
        Ok(Vector::from_nonempty(
            self.data[start..start + self.cols].to_vec(),
        ))
    }

    pub fn col(&self, col: usize) -> Result<Vector<T>, ExprError> {
        if col >= self.cols {
            return Err(ExprError::IndexOutOfRange {
                index: (0, col),
                dims: self.dims(),
            });
        }
        Ok(Vector::from_nonempty(
            self.data
                .iter()
                .skip(col)
                .step_by(self.cols)
                .cloned()
                .collect(),
        ))
    }

    pub fn transpose(&self) -> Matrix<T> {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.data[r * self.cols + c].clone());
            }
        }
        Matrix::from_parts(self.cols, self.rows, data)
    }

    pub fn constant(&self) -> KMatrix {
        Matrix::from_parts(
            self.rows,
            self.cols,
            self.data.iter().map(|e| K(e.constant())).collect(),
        )
    }

    pub fn to_scalars(&self) -> Vec<ScalarExpr> {
        self.data.iter().map(PolynomialLikeScalar::to_scalar).collect()
    }

    pub(crate) fn max_degree(&self) -> u32 {
        self.data
            .iter()
            .map(|e| e.to_scalar().degree())
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn unique_variables(&self) -> Vec<Variable> {
        let mut set = BTreeSet::new();
        for element in &self.data {
            element.to_scalar().collect_variables(&mut set);
        }
        set.into_iter().collect()
    }

    pub(crate) fn check_elements(&self) -> Result<(), ExprError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ExprError::EmptyCollection { kind: "matrix" });
        }
        let dims = self.dims();
        if self.data.len() != dims.len() {
            return Err(ExprError::LengthMismatch {
                kind: "matrix",
                dims,
                expected: dims.len(),
                found: self.data.len(),
            });
        }
        self.data.iter().try_for_each(|e| e.to_scalar().check())
    }
}

pub type KMatrix = Matrix<K>;
pub type VariableMatrix = Matrix<Variable>;
pub type MonomialMatrix = Matrix<Monomial>;
pub type PolynomialMatrix = Matrix<Polynomial>;

impl KMatrix {
    pub fn from_values(rows: &[Vec<f64>]) -> Result<Self, ExprError> {
        Self::new(
            rows.iter()
                .map(|row| row.iter().copied().map(K).collect())
                .collect(),
        )
    }

    pub fn zeros(rows: usize, cols: usize) -> Result<Self, ExprError> {
        Self::from_row_major(rows, cols, vec![K::ZERO; rows * cols])
    }

    pub fn ones(rows: usize, cols: usize) -> Result<Self, ExprError> {
        Self::from_row_major(rows, cols, vec![K::ONE; rows * cols])
    }

    pub fn identity(size: usize) -> Result<Self, ExprError> {
        if size == 0 {
            return Err(ExprError::EmptyCollection { kind: "matrix" });
        }
        Ok(Self::from_dmatrix_unchecked(&DMatrix::identity(size, size)))
    }

    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_iterator(self.rows, self.cols, self.data.iter().map(|k| k.0))
    }

    pub fn from_dmatrix(values: &DMatrix<f64>) -> Result<Self, ExprError> {
        if values.is_empty() {
            return Err(ExprError::EmptyCollection { kind: "matrix" });
        }
        Ok(Self::from_dmatrix_unchecked(values))
    }

    fn from_dmatrix_unchecked(values: &DMatrix<f64>) -> Self {
        let (rows, cols) = values.shape();
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            data.extend(values.row(r).iter().copied().map(K));
        }
        Self { rows, cols, data }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (r, row) in self.data.chunks(self.cols.max(1)).enumerate() {
            if r > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (c, element) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{element}")?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::ids::VariableId;

    fn var(i: u64) -> Variable {
        Variable::continuous(VariableId::new(i))
    }

    fn sample() -> KMatrix {
        KMatrix::from_values(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = KMatrix::from_values(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            ExprError::RaggedMatrix {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(KMatrix::new(Vec::new()).unwrap_err().code(), "EXPR_EMPTY_COLLECTION");
    }

    #[test]
    fn row_major_length_must_match() {
        let err = KMatrix::from_row_major(2, 3, vec![K::ONE; 5]).unwrap_err();
        assert_eq!(
            err,
            ExprError::LengthMismatch {
                kind: "matrix",
                dims: Dims::new(2, 3),
                expected: 6,
                found: 5,
            }
        );
        assert!(KMatrix::from_row_major(2, 3, vec![K::ONE; 6]).is_ok());
    }

    #[test]
    fn row_major_layout() {
        let m = sample();
        assert_eq!(m.dims(), Dims::new(2, 3));
        assert_eq!(*m.at(1, 0).unwrap(), K(4.0));
        assert_eq!(m.row(0).unwrap().values(), vec![1.0, 2.0, 3.0]);
        assert_eq!(m.col(2).unwrap().values(), vec![3.0, 6.0]);
        assert!(m.at(2, 0).is_err());
        assert!(m.col(3).is_err());
    }

    #[test]
    fn transpose_swaps_indices() {
        let t = sample().transpose();
        assert_eq!(t.dims(), Dims::new(3, 2));
        assert_eq!(*t.at(2, 1).unwrap(), K(6.0));
        assert_eq!(t.transpose(), sample());
    }

    #[test]
    fn identity_and_nalgebra_roundtrip() {
        let id = KMatrix::identity(3).unwrap();
        assert_eq!(*id.at(1, 1).unwrap(), K::ONE);
        assert_eq!(*id.at(0, 1).unwrap(), K::ZERO);
        assert!(KMatrix::identity(0).is_err());

        let dm = sample().to_dmatrix();
        assert_eq!(dm[(1, 2)], 6.0);
        assert_eq!(KMatrix::from_dmatrix(&dm).unwrap(), sample());
    }

    #[test]
    fn unique_variables_sorted() {
        let m = Matrix::new(vec![vec![var(3), var(1)], vec![var(1), var(2)]]).unwrap();
        let ids: Vec<u64> = m.unique_variables().iter().map(|v| v.id.inner()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn display_nests_rows() {
        let m = KMatrix::from_values(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.to_string(), "[[1, 2], [3, 4]]");
    }
}
