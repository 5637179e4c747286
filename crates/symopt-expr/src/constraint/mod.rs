//! Constraints: two expressions related by a sense.
//!
//! - `scalar`: ScalarConstraint and linear extraction of a single row
//! - `collection`: VectorConstraint and MatrixConstraint, one row per entry
//! - `implication`: best-effort "does satisfying A imply B" checks

mod collection;
mod implication;
mod scalar;

pub use collection::{MatrixConstraint, VectorConstraint};
pub use scalar::ScalarConstraint;

use crate::collection::{MatrixExpr, VectorExpr};
use crate::dims::{Dims, check_dimensions_in_addition};
use crate::error::ExprError;
use crate::expression::Expression;
use crate::linear::LinearForm;
use crate::scalar::{ScalarExpr, Variable};

/// Relational operator of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstrSense {
    Equal,
    LessThanEqual,
    GreaterThanEqual,
}

impl ConstrSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ConstrSense::Equal => "eq",
            ConstrSense::LessThanEqual => "le",
            ConstrSense::GreaterThanEqual => "ge",
        }
    }

    pub fn is_inequality(self) -> bool {
        !matches!(self, ConstrSense::Equal)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ConstrSense::Equal => "=",
            ConstrSense::LessThanEqual => "<=",
            ConstrSense::GreaterThanEqual => ">=",
        }
    }
}

impl std::fmt::Display for ConstrSense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl TryFrom<&str> for ConstrSense {
    type Error = ExprError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "=" | "==" => Ok(ConstrSense::Equal),
            "<=" | "<" => Ok(ConstrSense::LessThanEqual),
            ">=" | ">" => Ok(ConstrSense::GreaterThanEqual),
            other => Err(ExprError::InvalidSense {
                found: other.to_string(),
            }),
        }
    }
}

impl TryFrom<u8> for ConstrSense {
    type Error = ExprError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            b'=' => Ok(ConstrSense::Equal),
            b'<' => Ok(ConstrSense::LessThanEqual),
            b'>' => Ok(ConstrSense::GreaterThanEqual),
            other => Err(ExprError::InvalidSense {
                found: char::from(other).escape_default().to_string(),
            }),
        }
    }
}

/// A constraint of any arity.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Scalar(ScalarConstraint),
    Vector(VectorConstraint),
    Matrix(MatrixConstraint),
}

impl Constraint {
    /// Relate `lhs` and `rhs` by `sense`.
    ///
    /// A scalar side is broadcast over the other side. The result is a
    /// matrix constraint when either side is a matrix, a vector constraint
    /// when either side is a vector, and a scalar constraint otherwise.
    pub fn new(lhs: Expression, rhs: Expression, sense: ConstrSense) -> Result<Self, ExprError> {
        let (left, right) = (lhs.dims(), rhs.dims());
        if let Err(err) = check_dimensions_in_addition("compare", left, right) {
            tracing::warn!(
                component = "constraint",
                operation = "new",
                status = "rejected",
                left = %left,
                right = %right,
                "Constraint sides have incompatible dimensions"
            );
            return Err(err);
        }
        let dims = if left.is_scalar() { right } else { left };

        match (&lhs, &rhs) {
            (Expression::Scalar(l), Expression::Scalar(r)) => Ok(Constraint::Scalar(
                ScalarConstraint::new(l.clone(), r.clone(), sense),
            )),
            (Expression::Matrix(_), _) | (_, Expression::Matrix(_)) => {
                let l = MatrixExpr::from_scalars(dims.rows, dims.cols, &expand(&lhs, dims))?;
                let r = MatrixExpr::from_scalars(dims.rows, dims.cols, &expand(&rhs, dims))?;
                MatrixConstraint::new(l, r, sense).map(Constraint::Matrix)
            }
            _ => {
                let l = VectorExpr::from_scalars(&expand(&lhs, dims))?;
                let r = VectorExpr::from_scalars(&expand(&rhs, dims))?;
                VectorConstraint::new(l, r, sense).map(Constraint::Vector)
            }
        }
    }

    pub fn sense(&self) -> ConstrSense {
        match self {
            Constraint::Scalar(c) => c.sense(),
            Constraint::Vector(c) => c.sense(),
            Constraint::Matrix(c) => c.sense(),
        }
    }

    pub fn dims(&self) -> Dims {
        match self {
            Constraint::Scalar(_) => Dims::SCALAR,
            Constraint::Vector(c) => c.dims(),
            Constraint::Matrix(c) => c.dims(),
        }
    }

    /// Number of scalar rows the constraint expands to.
    pub fn num_rows(&self) -> usize {
        self.dims().len()
    }

    pub fn lhs(&self) -> Expression {
        match self {
            Constraint::Scalar(c) => Expression::Scalar(c.lhs().clone()),
            Constraint::Vector(c) => Expression::Vector(c.lhs().clone()),
            Constraint::Matrix(c) => Expression::Matrix(c.lhs().clone()),
        }
    }

    pub fn rhs(&self) -> Expression {
        match self {
            Constraint::Scalar(c) => Expression::Scalar(c.rhs().clone()),
            Constraint::Vector(c) => Expression::Vector(c.rhs().clone()),
            Constraint::Matrix(c) => Expression::Matrix(c.rhs().clone()),
        }
    }

    pub fn check(&self) -> Result<(), ExprError> {
        match self {
            Constraint::Scalar(c) => c.check(),
            Constraint::Vector(c) => c.check(),
            Constraint::Matrix(c) => c.check(),
        }
    }

    pub fn is_linear(&self) -> bool {
        match self {
            Constraint::Scalar(c) => c.is_linear(),
            Constraint::Vector(c) => c.is_linear(),
            Constraint::Matrix(c) => c.is_linear(),
        }
    }

    /// Unique variables of both sides in ascending ID order.
    pub fn variables(&self) -> Vec<Variable> {
        let mut vars = self.lhs().variables();
        vars.extend(self.rhs().variables());
        vars.sort();
        vars.dedup();
        vars
    }

    /// Entry `(row, col)` as a scalar constraint.
    pub fn at(&self, row: usize, col: usize) -> Result<ScalarConstraint, ExprError> {
        match self {
            Constraint::Scalar(c) => c.at(row, col),
            Constraint::Vector(c) if col == 0 => c.at_vec(row),
            Constraint::Vector(c) => Err(ExprError::IndexOutOfRange {
                index: (row, col),
                dims: c.dims(),
            }),
            Constraint::Matrix(c) => c.at(row, col),
        }
    }

    /// Every entry as a scalar constraint, row-major.
    pub fn scalar_constraints(&self) -> Vec<ScalarConstraint> {
        match self {
            Constraint::Scalar(c) => vec![c.clone()],
            Constraint::Vector(c) => c.scalar_constraints(),
            Constraint::Matrix(c) => c.scalar_constraints(),
        }
    }

    /// Variables on the left, constants on the right.
    pub fn simplify(&self) -> Result<Constraint, ExprError> {
        Ok(match self {
            Constraint::Scalar(c) => Constraint::Scalar(c.simplify()),
            Constraint::Vector(c) => Constraint::Vector(c.simplify()?),
            Constraint::Matrix(c) => Constraint::Matrix(c.simplify()?),
        })
    }

    /// `(A, b)` with `A x <= b`; `>=` rows are negated.
    pub fn linear_inequality_constraint_representation(
        &self,
        wrt: &[Variable],
    ) -> Result<LinearForm, ExprError> {
        match self {
            Constraint::Scalar(c) => c.linear_inequality_constraint_representation(wrt),
            Constraint::Vector(c) => c.linear_inequality_constraint_representation(wrt),
            Constraint::Matrix(c) => c.linear_inequality_constraint_representation(wrt),
        }
    }

    /// `(C, d)` with `C x = d`.
    pub fn linear_equality_constraint_representation(
        &self,
        wrt: &[Variable],
    ) -> Result<LinearForm, ExprError> {
        match self {
            Constraint::Scalar(c) => c.linear_equality_constraint_representation(wrt),
            Constraint::Vector(c) => c.linear_equality_constraint_representation(wrt),
            Constraint::Matrix(c) => c.linear_equality_constraint_representation(wrt),
        }
    }

    /// True when every point satisfying `self` is known to satisfy `other`.
    ///
    /// Sound but incomplete: each entry of `other` must be implied by a
    /// single entry of `self`, and non-linear constraints never qualify.
    pub fn implies_this_is_also_satisfied(&self, other: &Constraint) -> bool {
        implication::implies_all(&self.scalar_constraints(), &other.scalar_constraints())
    }
}

/// `expr` repeated or copied into `dims.len()` row-major scalars.
fn expand(expr: &Expression, dims: Dims) -> Vec<ScalarExpr> {
    match expr.to_scalars() {
        scalars if scalars.len() == dims.len() => scalars,
        scalars => {
            let value = scalars
                .into_iter()
                .next()
                .unwrap_or(ScalarExpr::from(0.0));
            vec![value; dims.len()]
        }
    }
}

impl From<ScalarConstraint> for Constraint {
    fn from(value: ScalarConstraint) -> Self {
        Constraint::Scalar(value)
    }
}

impl From<VectorConstraint> for Constraint {
    fn from(value: VectorConstraint) -> Self {
        Constraint::Vector(value)
    }
}

impl From<MatrixConstraint> for Constraint {
    fn from(value: MatrixConstraint) -> Self {
        Constraint::Matrix(value)
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Scalar(c) => write!(f, "{c}"),
            Constraint::Vector(c) => write!(f, "{c}"),
            Constraint::Matrix(c) => write!(f, "{c}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::collection::{KVector, Matrix, Vector};
    use crate::expression::ExpressionLike;
    use crate::ids::VariableId;
    use crate::scalar::K;

    fn var(i: u64) -> Variable {
        Variable::continuous(VariableId::new(i))
    }

    #[test]
    fn sense_parsing() {
        assert_eq!(ConstrSense::try_from("<=").unwrap(), ConstrSense::LessThanEqual);
        assert_eq!(ConstrSense::try_from(" == ").unwrap(), ConstrSense::Equal);
        assert_eq!(ConstrSense::try_from(b'>').unwrap(), ConstrSense::GreaterThanEqual);
        assert_eq!(
            ConstrSense::try_from("!=").unwrap_err().code(),
            "EXPR_INVALID_SENSE"
        );
        assert!(ConstrSense::try_from(b'x').is_err());
        assert_eq!(ConstrSense::GreaterThanEqual.to_string(), ">=");
    }

    #[test]
    fn comparison_arity_follows_operands() {
        let scalar = var(0).less_eq(&1.0_f64).unwrap();
        assert!(matches!(scalar, Constraint::Scalar(_)));

        let x = Vector::new(vec![var(0), var(1)]).unwrap();
        let vector = x.less_eq(&KVector::ones(2).unwrap()).unwrap();
        assert!(matches!(vector, Constraint::Vector(_)));
        assert_eq!(vector.num_rows(), 2);

        let column = Matrix::new(vec![vec![K(1.0)], vec![K(2.0)]]).unwrap();
        let matrix = x.less_eq(&column).unwrap();
        assert!(matches!(matrix, Constraint::Matrix(_)));
        assert_eq!(matrix.dims(), Dims::new(2, 1));
    }

    #[test]
    fn scalar_side_broadcasts() {
        let x = Vector::new(vec![var(0), var(1), var(2)]).unwrap();
        let c = x.greater_eq(&0.0_f64).unwrap();
        assert_eq!(c.num_rows(), 3);
        let entry = c.at(2, 0).unwrap();
        assert_eq!(entry.lhs(), &ScalarExpr::from(var(2)));
        assert_eq!(entry.rhs(), &ScalarExpr::from(0.0));
        assert!(c.at(3, 0).is_err());
    }

    #[test]
    fn mismatched_sides_rejected() {
        let x = Vector::new(vec![var(0), var(1), var(2)]).unwrap();
        let err = x.equal_to(&KVector::ones(2).unwrap()).unwrap_err();
        assert!(err.is_dimension_error());
    }

    #[test]
    fn variables_span_both_sides() {
        let c = var(4).less_eq(&var(1)).unwrap();
        let ids: Vec<u64> = c.variables().iter().map(|v| v.id.inner()).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(c.to_string(), "x_4 <= x_1");
    }
}
