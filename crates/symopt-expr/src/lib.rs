//! Symbolic expressions for optimization models: constants, variables,
//! monomials and polynomials, their vector and matrix lifts, and the
//! constraints built by comparing them.

pub mod collection;
pub mod constraint;
pub mod dims;
pub mod error;
pub mod expression;
pub mod ids;
pub mod linear;
pub mod scalar;

pub use collection::{
    KMatrix, KVector, Matrix, MatrixExpr, MonomialMatrix, MonomialVector, PolynomialMatrix,
    PolynomialVector, VariableMatrix, VariableVector, Vector, VectorExpr,
};
pub use constraint::{ConstrSense, Constraint, MatrixConstraint, ScalarConstraint, VectorConstraint};
pub use dims::{Dims, check_dimensions_in_addition, check_dimensions_in_multiplication};
pub use error::ExprError;
pub use expression::{Expression, ExpressionLike};
pub use ids::VariableId;
pub use linear::{LinearForm, linear_coeff};
pub use scalar::{
    Bounds, ExprKind, K, Monomial, Polynomial, PolynomialLikeScalar, ScalarExpr, VarType, Variable,
};
