//! Concretization: picking the tightest representation for a grid of
//! scalar results.
//!
//! Elements are classified in strict precedence
//! `Polynomial > Monomial > Variable-only > Constant-only`. A grid mixing
//! constants and bare variables has no common lower kind and lands on
//! `Monomial`. The shape collapses too: `1 x 1` becomes a scalar and
//! `n x 1` a vector.

use crate::collection::{MatrixExpr, VectorExpr};
use crate::dims::Dims;
use crate::error::ExprError;
use crate::expression::Expression;
use crate::scalar::{ExprKind, K, Monomial, Polynomial, ScalarExpr, Variable};

/// Grid elements lowered to one concrete kind.
pub(crate) enum Lowered {
    K(Vec<K>),
    Variable(Vec<Variable>),
    Monomial(Vec<Monomial>),
    Polynomial(Vec<Polynomial>),
}

impl Lowered {
    pub(crate) fn kind(&self) -> ExprKind {
        match self {
            Lowered::K(_) => ExprKind::K,
            Lowered::Variable(_) => ExprKind::Variable,
            Lowered::Monomial(_) => ExprKind::Monomial,
            Lowered::Polynomial(_) => ExprKind::Polynomial,
        }
    }
}

pub(crate) fn lower(data: &[ScalarExpr]) -> Lowered {
    let constants: Option<Vec<K>> = data
        .iter()
        .map(|s| match s {
            ScalarExpr::K(k) => Some(*k),
            _ => None,
        })
        .collect();
    if let Some(ks) = constants {
        return Lowered::K(ks);
    }

    let variables: Option<Vec<Variable>> = data
        .iter()
        .map(|s| match s {
            ScalarExpr::Variable(v) => Some(*v),
            _ => None,
        })
        .collect();
    if let Some(vs) = variables {
        return Lowered::Variable(vs);
    }

    let monomials: Option<Vec<Monomial>> = data.iter().map(ScalarExpr::to_monomial).collect();
    if let Some(ms) = monomials {
        return Lowered::Monomial(ms);
    }

    Lowered::Polynomial(data.iter().map(ScalarExpr::to_polynomial).collect())
}

/// Kind a grid of scalars concretizes to.
pub fn concretized_kind(data: &[ScalarExpr]) -> ExprKind {
    lower(data).kind()
}

/// Build the most specific expression holding `data` (row-major) with
/// shape `dims`.
pub fn concretize(dims: Dims, data: Vec<ScalarExpr>) -> Result<Expression, ExprError> {
    if data.is_empty() || dims.len() == 0 {
        return Err(ExprError::EmptyCollection { kind: "expression" });
    }
    if data.len() != dims.len() {
        return Err(ExprError::LengthMismatch {
            kind: "expression",
            dims,
            expected: dims.len(),
            found: data.len(),
        });
    }
    if dims.is_scalar() {
        let mut data = data;
        return match data.pop() {
            Some(scalar) => Ok(Expression::Scalar(scalar)),
            None => Err(ExprError::EmptyCollection { kind: "expression" }),
        };
    }
    if dims.cols == 1 {
        return VectorExpr::from_scalars(&data).map(Expression::Vector);
    }
    MatrixExpr::from_scalars(dims.rows, dims.cols, &data).map(Expression::Matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::VariableId;

    fn var(i: u64) -> ScalarExpr {
        ScalarExpr::Variable(Variable::continuous(VariableId::new(i)))
    }

    #[test]
    fn precedence_of_kinds() {
        assert_eq!(concretized_kind(&[ScalarExpr::from(1.0)]), ExprKind::K);
        assert_eq!(concretized_kind(&[var(0), var(1)]), ExprKind::Variable);
        assert_eq!(
            concretized_kind(&[var(0), ScalarExpr::from(2.0)]),
            ExprKind::Monomial
        );
        let poly = var(0).plus_scalar(&var(1));
        assert_eq!(
            concretized_kind(&[var(0), poly, ScalarExpr::from(1.0)]),
            ExprKind::Polynomial
        );
    }

    #[test]
    fn shape_collapses() {
        let scalar = concretize(Dims::SCALAR, vec![var(0)]).unwrap();
        assert!(matches!(scalar, Expression::Scalar(ScalarExpr::Variable(_))));

        let vector = concretize(Dims::new(2, 1), vec![var(0), var(1)]).unwrap();
        assert!(matches!(vector, Expression::Vector(VectorExpr::Variable(_))));

        let matrix = concretize(Dims::new(1, 2), vec![var(0), ScalarExpr::from(3.0)]).unwrap();
        assert!(matches!(matrix, Expression::Matrix(MatrixExpr::Monomial(_))));
    }

    #[test]
    fn length_must_match_dims() {
        assert_eq!(
            concretize(Dims::new(2, 2), vec![var(0)]).unwrap_err(),
            ExprError::LengthMismatch {
                kind: "expression",
                dims: Dims::new(2, 2),
                expected: 4,
                found: 1,
            }
        );
        let err = concretize(Dims::new(2, 3), vec![var(0); 7]).unwrap_err();
        assert_eq!(err.code(), "EXPR_LENGTH_MISMATCH");
        assert!(concretize(Dims::new(1, 1), Vec::new()).is_err());
    }
}
