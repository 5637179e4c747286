//! Projection of affine expressions onto numeric coefficient rows.

use std::collections::BTreeSet;

use nalgebra::{DMatrix, DVector};

use crate::error::ExprError;
use crate::scalar::{ScalarExpr, Variable};

/// Rows of `coefficients * x (<=|=) constants`, with columns following the
/// caller's variable ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearForm {
    pub coefficients: DMatrix<f64>,
    pub constants: DVector<f64>,
}

impl LinearForm {
    pub fn num_rows(&self) -> usize {
        self.constants.len()
    }

    pub fn num_cols(&self) -> usize {
        self.coefficients.ncols()
    }

    pub(crate) fn from_rows(rows: Vec<(Vec<f64>, f64)>, num_cols: usize) -> Self {
        let num_rows = rows.len();
        let mut coefficients = DMatrix::zeros(num_rows, num_cols);
        let mut constants = DVector::zeros(num_rows);
        for (r, (row, constant)) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                coefficients[(r, c)] = value;
            }
            constants[r] = constant;
        }
        Self {
            coefficients,
            constants,
        }
    }

    /// `-A, -b`: turns `A x >= b` into `-A x <= -b`.
    pub fn negated(&self) -> Self {
        Self {
            coefficients: -&self.coefficients,
            constants: -&self.constants,
        }
    }
}

/// A column ordering may name each variable once.
fn check_ordering(wrt: &[Variable]) -> Result<(), ExprError> {
    let mut seen = BTreeSet::new();
    match wrt.iter().find(|v| !seen.insert(v.id)) {
        Some(duplicate) => Err(ExprError::DuplicateInOrdering { id: duplicate.id }),
        None => Ok(()),
    }
}

/// Coefficient of every variable of `wrt` in an affine scalar expression.
///
/// Works on the simplified form, so cancelled terms are neither counted
/// towards the degree nor required to appear in `wrt`. Constant terms are
/// ignored. A variable listed twice in `wrt` is rejected.
pub fn linear_coeff(expr: &ScalarExpr, wrt: &[Variable]) -> Result<Vec<f64>, ExprError> {
    check_ordering(wrt)?;
    let polynomial = expr.to_polynomial().simplify();
    let degree = polynomial.total_degree();
    if degree > 1 {
        return Err(ExprError::NonLinear {
            operation: "linear_coeff",
            side: "expression",
            degree,
        });
    }
    if let Some(missing) = polynomial.variables().into_iter().find(|v| !wrt.contains(v)) {
        return Err(ExprError::VariableNotInOrdering { id: missing.id });
    }
    Ok(wrt
        .iter()
        .map(|v| polynomial.linear_coefficient_of(v))
        .collect())
}

/// One coefficient row per element, stacked into a matrix.
pub fn linear_coeff_rows(
    exprs: &[ScalarExpr],
    wrt: &[Variable],
) -> Result<DMatrix<f64>, ExprError> {
    check_ordering(wrt)?;
    let rows = exprs
        .iter()
        .map(|e| linear_coeff(e, wrt).map(|row| (row, 0.0)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LinearForm::from_rows(rows, wrt.len()).coefficients)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::ids::VariableId;

    fn var(i: u64) -> Variable {
        Variable::continuous(VariableId::new(i))
    }

    #[test]
    fn coefficients_follow_ordering() {
        let expr = 2.0 * var(0) + 3.0 * var(1) + 1.0;
        assert_eq!(linear_coeff(&expr, &[var(1), var(0)]).unwrap(), vec![3.0, 2.0]);
        assert_eq!(
            linear_coeff(&expr, &[var(0), var(1), var(2)]).unwrap(),
            vec![2.0, 3.0, 0.0]
        );
    }

    #[test]
    fn repeated_terms_are_merged() {
        let expr = var(0) + var(0) + var(1);
        assert_eq!(linear_coeff(&expr, &[var(0), var(1)]).unwrap(), vec![2.0, 1.0]);
    }

    #[test]
    fn nonlinear_rejected() {
        let square = ScalarExpr::from(var(0))
            .multiply_scalar(&ScalarExpr::from(var(0)))
            .unwrap();
        let err = linear_coeff(&square, &[var(0)]).unwrap_err();
        assert_eq!(err.code(), "EXPR_LINEAR_REQUIRED");
    }

    #[test]
    fn variable_outside_ordering_rejected() {
        let err = linear_coeff(&(var(0) + var(5)), &[var(0)]).unwrap_err();
        assert_eq!(
            err,
            ExprError::VariableNotInOrdering {
                id: VariableId::new(5)
            }
        );
    }

    #[test]
    fn repeated_ordering_variable_rejected() {
        let expr = 2.0 * var(0) + var(1);
        let err = linear_coeff(&expr, &[var(0), var(1), var(0)]).unwrap_err();
        assert_eq!(
            err,
            ExprError::DuplicateInOrdering {
                id: VariableId::new(0)
            }
        );
        let err = linear_coeff_rows(&[expr], &[var(1), var(1)]).unwrap_err();
        assert_eq!(err.code(), "EXPR_DUPLICATE_IN_ORDERING");
    }

    #[test]
    fn stacked_rows() {
        let rows = linear_coeff_rows(
            &[ScalarExpr::from(var(0)), 4.0 * var(1) - var(0)],
            &[var(0), var(1)],
        )
        .unwrap();
        assert_eq!(rows.shape(), (2, 2));
        assert_eq!(rows[(1, 0)], -1.0);
        assert_eq!(rows[(1, 1)], 4.0);
    }
}
