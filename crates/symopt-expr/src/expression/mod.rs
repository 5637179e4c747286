//! Shape-aware expression dispatch.
//!
//! [`Expression`] is the closed sum of scalar, vector and matrix values.
//! [`ExpressionLike`] is implemented by every concrete kind and every sum
//! type; its provided methods validate both operands with `check` and then
//! route through the `Expression` engine in [`arithmetic`].

mod arithmetic;

use std::collections::HashMap;

use crate::collection::{Matrix, MatrixExpr, Vector, VectorExpr};
use crate::constraint::{ConstrSense, Constraint};
use crate::dims::Dims;
use crate::error::ExprError;
use crate::scalar::{ExprKind, K, Monomial, Polynomial, PolynomialLikeScalar, ScalarExpr, Variable};

/// Any expression value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Scalar(ScalarExpr),
    Vector(VectorExpr),
    Matrix(MatrixExpr),
}

impl Expression {
    pub fn dims(&self) -> Dims {
        match self {
            Expression::Scalar(_) => Dims::SCALAR,
            Expression::Vector(v) => v.dims(),
            Expression::Matrix(m) => m.dims(),
        }
    }

    /// Kind of the elements.
    pub fn kind(&self) -> ExprKind {
        match self {
            Expression::Scalar(s) => s.kind(),
            Expression::Vector(v) => v.kind(),
            Expression::Matrix(m) => m.kind(),
        }
    }

    /// Highest degree over all elements.
    pub fn degree(&self) -> u32 {
        match self {
            Expression::Scalar(s) => s.degree(),
            Expression::Vector(v) => v.degree(),
            Expression::Matrix(m) => m.degree(),
        }
    }

    /// Unique variables in ascending ID order.
    pub fn variables(&self) -> Vec<Variable> {
        match self {
            Expression::Scalar(s) => {
                let mut vars = s.variables();
                vars.sort();
                vars.dedup();
                vars
            }
            Expression::Vector(v) => v.variables(),
            Expression::Matrix(m) => m.variables(),
        }
    }

    pub fn check(&self) -> Result<(), ExprError> {
        match self {
            Expression::Scalar(s) => s.check(),
            Expression::Vector(v) => v.check(),
            Expression::Matrix(m) => m.check(),
        }
    }

    /// Elements in row-major order.
    pub fn to_scalars(&self) -> Vec<ScalarExpr> {
        match self {
            Expression::Scalar(s) => vec![s.clone()],
            Expression::Vector(v) => v.to_scalars(),
            Expression::Matrix(m) => m.to_scalars(),
        }
    }

    /// Element `(row, col)`. A scalar answers only `(0, 0)`.
    pub fn at(&self, row: usize, col: usize) -> Result<ScalarExpr, ExprError> {
        match self {
            Expression::Scalar(s) if row == 0 && col == 0 => Ok(s.clone()),
            Expression::Vector(v) if col == 0 => v.at_vec(row),
            Expression::Matrix(m) => m.at(row, col),
            _ => Err(ExprError::IndexOutOfRange {
                index: (row, col),
                dims: self.dims(),
            }),
        }
    }

    /// Constant part of every element, row-major.
    pub fn constants(&self) -> Vec<f64> {
        self.to_scalars().iter().map(ScalarExpr::constant).collect()
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Expression::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<&ScalarExpr> {
        match self {
            Expression::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn operand_name(&self) -> &'static str {
        match self {
            Expression::Scalar(_) => "scalar",
            Expression::Vector(_) => "vector",
            Expression::Matrix(_) => "matrix",
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Scalar(s) => write!(f, "{s}"),
            Expression::Vector(v) => write!(f, "{v}"),
            Expression::Matrix(m) => write!(f, "{m}"),
        }
    }
}

/// Operations shared by every expression kind.
///
/// Each provided method validates its operands first, so invalid input is
/// reported as an error before any result is built.
pub trait ExpressionLike: Clone + Into<Expression> {
    fn dims(&self) -> Dims;

    /// Unique variables in ascending ID order.
    fn variables(&self) -> Vec<Variable>;

    fn degree(&self) -> u32;

    fn check(&self) -> Result<(), ExprError>;

    fn to_expression(&self) -> Expression {
        self.clone().into()
    }

    fn plus<R: ExpressionLike>(&self, rhs: &R) -> Result<Expression, ExprError> {
        self.check()?;
        rhs.check()?;
        self.to_expression().plus_expr(&rhs.to_expression())
    }

    fn minus<R: ExpressionLike>(&self, rhs: &R) -> Result<Expression, ExprError> {
        self.check()?;
        rhs.check()?;
        self.to_expression().minus_expr(&rhs.to_expression())
    }

    fn multiply<R: ExpressionLike>(&self, rhs: &R) -> Result<Expression, ExprError> {
        self.check()?;
        rhs.check()?;
        self.to_expression().multiply_expr(&rhs.to_expression())
    }

    fn power(&self, exponent: i64) -> Result<Expression, ExprError> {
        self.check()?;
        self.to_expression().power_expr(exponent)
    }

    fn transpose(&self) -> Result<Expression, ExprError> {
        self.check()?;
        self.to_expression().transpose_expr()
    }

    fn derivative_wrt(&self, variable: &Variable) -> Result<Expression, ExprError> {
        self.check()?;
        variable.check()?;
        self.to_expression().derivative_expr(variable)
    }

    /// Replace `variable` by `value` everywhere.
    fn substitute(
        &self,
        variable: &Variable,
        value: impl Into<ScalarExpr>,
    ) -> Result<Expression, ExprError> {
        self.check()?;
        let value = value.into();
        value.check()?;
        self.to_expression()
            .substitute_all_expr(&HashMap::from([(*variable, value)]))
    }

    /// Replace every mapped variable at once; map order does not matter.
    fn substitute_according_to(
        &self,
        substitutions: &HashMap<Variable, ScalarExpr>,
    ) -> Result<Expression, ExprError> {
        self.check()?;
        substitutions.values().try_for_each(ScalarExpr::check)?;
        self.to_expression().substitute_all_expr(substitutions)
    }

    fn comparison<R: ExpressionLike>(
        &self,
        rhs: &R,
        sense: ConstrSense,
    ) -> Result<Constraint, ExprError> {
        self.check()?;
        rhs.check()?;
        Constraint::new(self.to_expression(), rhs.to_expression(), sense)
    }

    fn less_eq<R: ExpressionLike>(&self, rhs: &R) -> Result<Constraint, ExprError> {
        self.comparison(rhs, ConstrSense::LessThanEqual)
    }

    fn greater_eq<R: ExpressionLike>(&self, rhs: &R) -> Result<Constraint, ExprError> {
        self.comparison(rhs, ConstrSense::GreaterThanEqual)
    }

    fn equal_to<R: ExpressionLike>(&self, rhs: &R) -> Result<Constraint, ExprError> {
        self.comparison(rhs, ConstrSense::Equal)
    }
}

impl From<ScalarExpr> for Expression {
    fn from(value: ScalarExpr) -> Self {
        Expression::Scalar(value)
    }
}

impl From<VectorExpr> for Expression {
    fn from(value: VectorExpr) -> Self {
        Expression::Vector(value)
    }
}

impl From<MatrixExpr> for Expression {
    fn from(value: MatrixExpr) -> Self {
        Expression::Matrix(value)
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::Scalar(ScalarExpr::from(value))
    }
}

macro_rules! impl_scalar_expression {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Expression {
                fn from(value: $ty) -> Self {
                    Expression::Scalar(ScalarExpr::from(value))
                }
            }

            impl From<Vector<$ty>> for Expression {
                fn from(value: Vector<$ty>) -> Self {
                    Expression::Vector(VectorExpr::from(value))
                }
            }

            impl From<Matrix<$ty>> for Expression {
                fn from(value: Matrix<$ty>) -> Self {
                    Expression::Matrix(MatrixExpr::from(value))
                }
            }

            impl ExpressionLike for $ty {
                fn dims(&self) -> Dims {
                    Dims::SCALAR
                }

                fn variables(&self) -> Vec<Variable> {
                    self.to_scalar().variables()
                }

                fn degree(&self) -> u32 {
                    self.to_scalar().degree()
                }

                fn check(&self) -> Result<(), ExprError> {
                    self.to_scalar().check()
                }
            }

            impl ExpressionLike for Vector<$ty> {
                fn dims(&self) -> Dims {
                    Vector::dims(self)
                }

                fn variables(&self) -> Vec<Variable> {
                    self.unique_variables()
                }

                fn degree(&self) -> u32 {
                    self.max_degree()
                }

                fn check(&self) -> Result<(), ExprError> {
                    self.check_elements()
                }
            }

            impl ExpressionLike for Matrix<$ty> {
                fn dims(&self) -> Dims {
                    Matrix::dims(self)
                }

                fn variables(&self) -> Vec<Variable> {
                    self.unique_variables()
                }

                fn degree(&self) -> u32 {
                    self.max_degree()
                }

                fn check(&self) -> Result<(), ExprError> {
                    self.check_elements()
                }
            }
        )*
    };
}

impl_scalar_expression!(K, Variable, Monomial, Polynomial);

impl ExpressionLike for f64 {
    fn dims(&self) -> Dims {
        Dims::SCALAR
    }

    fn variables(&self) -> Vec<Variable> {
        Vec::new()
    }

    fn degree(&self) -> u32 {
        0
    }

    fn check(&self) -> Result<(), ExprError> {
        Ok(())
    }
}

impl ExpressionLike for ScalarExpr {
    fn dims(&self) -> Dims {
        Dims::SCALAR
    }

    fn variables(&self) -> Vec<Variable> {
        Expression::Scalar(self.clone()).variables()
    }

    fn degree(&self) -> u32 {
        ScalarExpr::degree(self)
    }

    fn check(&self) -> Result<(), ExprError> {
        ScalarExpr::check(self)
    }
}

macro_rules! impl_sum_expression {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ExpressionLike for $ty {
                fn dims(&self) -> Dims {
                    <$ty>::dims(self)
                }

                fn variables(&self) -> Vec<Variable> {
                    <$ty>::variables(self)
                }

                fn degree(&self) -> u32 {
                    <$ty>::degree(self)
                }

                fn check(&self) -> Result<(), ExprError> {
                    <$ty>::check(self)
                }
            }
        )*
    };
}

impl_sum_expression!(VectorExpr, MatrixExpr, Expression);
