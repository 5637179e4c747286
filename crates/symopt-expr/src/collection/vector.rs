//! Column vectors of a single scalar kind.

use std::collections::BTreeSet;

use nalgebra::DVector;

use crate::collection::matrix::Matrix;
use crate::dims::Dims;
use crate::error::ExprError;
use crate::scalar::{K, PolynomialLikeScalar, ScalarExpr, Variable};

/// An `n x 1` vector. Always holds at least one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T> {
    elements: Vec<T>,
}

impl<T: PolynomialLikeScalar> Vector<T> {
    pub fn new(elements: Vec<T>) -> Result<Self, ExprError> {
        if elements.is_empty() {
            return Err(ExprError::EmptyCollection { kind: "vector" });
        }
        Ok(Self { elements })
    }

    pub(crate) fn from_nonempty(elements: Vec<T>) -> Self {
        debug_assert!(!elements.is_empty());
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false; vectors are never empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<T> {
        self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.elements.len(), 1)
    }

    pub fn at_vec(&self, index: usize) -> Result<&T, ExprError> {
        self.elements
            .get(index)
            .ok_or(ExprError::IndexOutOfRange {
                index: (index, 0),
                dims: self.dims(),
            })
    }

    /// Constant part of every element.
    pub fn constant(&self) -> KVector {
        Vector::from_nonempty(self.elements.iter().map(|e| K(e.constant())).collect())
    }

    /// Sum of all elements.
    pub fn sum(&self) -> ScalarExpr {
        let mut iter = self.elements.iter().map(PolynomialLikeScalar::to_scalar);
        let first = iter.next().unwrap_or(ScalarExpr::K(K::ZERO));
        iter.fold(first, |acc, e| acc.plus_scalar(&e))
    }

    /// The `1 x n` row matrix holding the same elements.
    pub fn transpose(&self) -> Matrix<T> {
        Matrix::from_parts(1, self.elements.len(), self.elements.clone())
    }

    /// The `n x 1` matrix holding the same elements.
    pub fn to_column(&self) -> Matrix<T> {
        Matrix::from_parts(self.elements.len(), 1, self.elements.clone())
    }

    pub fn to_scalars(&self) -> Vec<ScalarExpr> {
        self.elements.iter().map(PolynomialLikeScalar::to_scalar).collect()
    }

    pub(crate) fn max_degree(&self) -> u32 {
        self.elements
            .iter()
            .map(|e| e.to_scalar().degree())
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn unique_variables(&self) -> Vec<Variable> {
        let mut set = BTreeSet::new();
        for element in &self.elements {
            element.to_scalar().collect_variables(&mut set);
        }
        set.into_iter().collect()
    }

    pub(crate) fn check_elements(&self) -> Result<(), ExprError> {
        if self.elements.is_empty() {
            return Err(ExprError::EmptyCollection { kind: "vector" });
        }
        self.elements.iter().try_for_each(|e| e.to_scalar().check())
    }
}

pub type KVector = Vector<K>;
pub type VariableVector = Vector<Variable>;
pub type MonomialVector = Vector<crate::scalar::Monomial>;
pub type PolynomialVector = Vector<crate::scalar::Polynomial>;

impl KVector {
    pub fn from_values(values: &[f64]) -> Result<Self, ExprError> {
        Self::new(values.iter().copied().map(K).collect())
    }

    pub fn zeros(len: usize) -> Result<Self, ExprError> {
        Self::new(vec![K::ZERO; len])
    }

    pub fn ones(len: usize) -> Result<Self, ExprError> {
        Self::new(vec![K::ONE; len])
    }

    pub fn values(&self) -> Vec<f64> {
        self.elements.iter().map(|k| k.0).collect()
    }

    pub fn to_dvector(&self) -> DVector<f64> {
        DVector::from_iterator(self.elements.len(), self.elements.iter().map(|k| k.0))
    }

    pub fn from_dvector(values: &DVector<f64>) -> Result<Self, ExprError> {
        Self::new(values.iter().copied().map(K).collect())
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (idx, element) in self.elements.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{element}")?;
        }
        write!(f, "]")
    }
}
