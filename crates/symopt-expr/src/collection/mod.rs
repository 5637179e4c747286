//! Vector and matrix lifts of the scalar kinds.
//!
//! - `vector`: `Vector<T>` and the `KVector`.. `PolynomialVector` aliases
//! - `matrix`: `Matrix<T>` and the `KMatrix`.. `PolynomialMatrix` aliases
//! - `concretize`: tightest-kind selection for computed grids

pub mod concretize;
pub mod matrix;
pub mod vector;

pub use matrix::{KMatrix, Matrix, MonomialMatrix, PolynomialMatrix, VariableMatrix};
pub use vector::{KVector, MonomialVector, PolynomialVector, Vector, VariableVector};

use crate::collection::concretize::{Lowered, lower};
use crate::dims::Dims;
use crate::error::ExprError;
use crate::scalar::{ExprKind, ScalarExpr, Variable};

/// Apply `$body` to the inner collection whatever its kind.
macro_rules! each_kind {
    ($value:expr, $enum:ident, $inner:ident => $body:expr) => {
        match $value {
            $enum::K($inner) => $body,
            $enum::Variable($inner) => $body,
            $enum::Monomial($inner) => $body,
            $enum::Polynomial($inner) => $body,
        }
    };
}

/// Like `each_kind!`, rewrapping the result in the same kind of `$to`.
macro_rules! map_kind {
    ($value:expr, $from:ident => $to:ident, $inner:ident => $body:expr) => {
        match $value {
            $from::K($inner) => $to::K($body),
            $from::Variable($inner) => $to::Variable($body),
            $from::Monomial($inner) => $to::Monomial($body),
            $from::Polynomial($inner) => $to::Polynomial($body),
        }
    };
}

/// Closed sum of the vector lifts.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorExpr {
    K(KVector),
    Variable(VariableVector),
    Monomial(MonomialVector),
    Polynomial(PolynomialVector),
}

impl VectorExpr {
    /// Concretize a non-empty list of scalars to the tightest vector kind.
    pub fn from_scalars(data: &[ScalarExpr]) -> Result<Self, ExprError> {
        Ok(match lower(data) {
            Lowered::K(v) => VectorExpr::K(Vector::new(v)?),
            Lowered::Variable(v) => VectorExpr::Variable(Vector::new(v)?),
            Lowered::Monomial(v) => VectorExpr::Monomial(Vector::new(v)?),
            Lowered::Polynomial(v) => VectorExpr::Polynomial(Vector::new(v)?),
        })
    }

    pub fn kind(&self) -> ExprKind {
        match self {
            VectorExpr::K(_) => ExprKind::K,
            VectorExpr::Variable(_) => ExprKind::Variable,
            VectorExpr::Monomial(_) => ExprKind::Monomial,
            VectorExpr::Polynomial(_) => ExprKind::Polynomial,
        }
    }

    pub fn len(&self) -> usize {
        each_kind!(self, VectorExpr, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.len(), 1)
    }

    pub fn at_vec(&self, index: usize) -> Result<ScalarExpr, ExprError> {
        each_kind!(self, VectorExpr, v => v.at_vec(index).map(|e| e.clone().into()))
    }

    pub fn to_scalars(&self) -> Vec<ScalarExpr> {
        each_kind!(self, VectorExpr, v => v.to_scalars())
    }

    pub fn constant(&self) -> KVector {
        each_kind!(self, VectorExpr, v => v.constant())
    }

    pub fn sum(&self) -> ScalarExpr {
        each_kind!(self, VectorExpr, v => v.sum())
    }

    pub fn degree(&self) -> u32 {
        each_kind!(self, VectorExpr, v => v.max_degree())
    }

    pub fn variables(&self) -> Vec<Variable> {
        each_kind!(self, VectorExpr, v => v.unique_variables())
    }

    pub fn check(&self) -> Result<(), ExprError> {
        each_kind!(self, VectorExpr, v => v.check_elements())
    }

    /// The `1 x n` row matrix of the same kind.
    pub fn transpose(&self) -> MatrixExpr {
        map_kind!(self, VectorExpr => MatrixExpr, v => v.transpose())
    }
}

/// Closed sum of the matrix lifts.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixExpr {
    K(KMatrix),
    Variable(VariableMatrix),
    Monomial(MonomialMatrix),
    Polynomial(PolynomialMatrix),
}

impl MatrixExpr {
    /// Concretize a row-major grid of scalars to the tightest matrix kind.
    pub fn from_scalars(rows: usize, cols: usize, data: &[ScalarExpr]) -> Result<Self, ExprError> {
        Ok(match lower(data) {
            Lowered::K(v) => MatrixExpr::K(Matrix::from_row_major(rows, cols, v)?),
            Lowered::Variable(v) => MatrixExpr::Variable(Matrix::from_row_major(rows, cols, v)?),
            Lowered::Monomial(v) => MatrixExpr::Monomial(Matrix::from_row_major(rows, cols, v)?),
            Lowered::Polynomial(v) => {
                MatrixExpr::Polynomial(Matrix::from_row_major(rows, cols, v)?)
            }
        })
    }

    pub fn kind(&self) -> ExprKind {
        match self {
            MatrixExpr::K(_) => ExprKind::K,
            MatrixExpr::Variable(_) => ExprKind::Variable,
            MatrixExpr::Monomial(_) => ExprKind::Monomial,
            MatrixExpr::Polynomial(_) => ExprKind::Polynomial,
        }
    }

    pub fn dims(&self) -> Dims {
        each_kind!(self, MatrixExpr, m => m.dims())
    }

    pub fn at(&self, row: usize, col: usize) -> Result<ScalarExpr, ExprError> {
        each_kind!(self, MatrixExpr, m => m.at(row, col).map(|e| e.clone().into()))
    }

    pub fn row(&self, row: usize) -> Result<VectorExpr, ExprError> {
        Ok(map_kind!(self, MatrixExpr => VectorExpr, m => m.row(row)?))
    }

    pub fn col(&self, col: usize) -> Result<VectorExpr, ExprError> {
        Ok(map_kind!(self, MatrixExpr => VectorExpr, m => m.col(col)?))
    }

    /// Elements in row-major order.
    pub fn to_scalars(&self) -> Vec<ScalarExpr> {
        each_kind!(self, MatrixExpr, m => m.to_scalars())
    }

    pub fn constant(&self) -> KMatrix {
        each_kind!(self, MatrixExpr, m => m.constant())
    }

    pub fn degree(&self) -> u32 {
        each_kind!(self, MatrixExpr, m => m.max_degree())
    }

    pub fn variables(&self) -> Vec<Variable> {
        each_kind!(self, MatrixExpr, m => m.unique_variables())
    }

    pub fn check(&self) -> Result<(), ExprError> {
        each_kind!(self, MatrixExpr, m => m.check_elements())
    }

    pub fn transpose(&self) -> MatrixExpr {
        map_kind!(self, MatrixExpr => MatrixExpr, m => m.transpose())
    }
}

macro_rules! impl_collection_from {
    ($($ty:ty => $enum:ident::$variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for $enum {
                fn from(value: $ty) -> Self {
                    $enum::$variant(value)
                }
            }
        )*
    };
}

impl_collection_from!(
    KVector => VectorExpr::K,
    VariableVector => VectorExpr::Variable,
    MonomialVector => VectorExpr::Monomial,
    PolynomialVector => VectorExpr::Polynomial,
    KMatrix => MatrixExpr::K,
    VariableMatrix => MatrixExpr::Variable,
    MonomialMatrix => MatrixExpr::Monomial,
    PolynomialMatrix => MatrixExpr::Polynomial,
);

impl std::fmt::Display for VectorExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        each_kind!(self, VectorExpr, v => write!(f, "{v}"))
    }
}

impl std::fmt::Display for MatrixExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        each_kind!(self, MatrixExpr, m => write!(f, "{m}"))
    }
}
