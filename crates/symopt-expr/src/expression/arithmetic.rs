//! The `Expression` engine: broadcasting, matrix products, powers and
//! entrywise calculus, each result re-concretized to its tightest kind.

use std::collections::HashMap;
use std::time::Instant;

use crate::collection::concretize::concretize;
use crate::collection::{KMatrix, MatrixExpr, VectorExpr};
use crate::dims::{Dims, check_dimensions_in_addition, check_dimensions_in_multiplication};
use crate::error::ExprError;
use crate::expression::Expression;
use crate::scalar::{ScalarExpr, Variable};

impl Expression {
    pub fn plus_expr(&self, rhs: &Expression) -> Result<Expression, ExprError> {
        self.broadcast("plus", rhs, |a, b| Ok(a.plus_scalar(b)))
    }

    pub fn minus_expr(&self, rhs: &Expression) -> Result<Expression, ExprError> {
        self.broadcast("minus", rhs, |a, b| Ok(a.minus_scalar(b)))
    }

    /// Matrix product, or entrywise scaling when either side is a scalar.
    pub fn multiply_expr(&self, rhs: &Expression) -> Result<Expression, ExprError> {
        let (left, right) = (self.dims(), rhs.dims());
        if left.is_scalar() || right.is_scalar() {
            return self.broadcast("multiply", rhs, ScalarExpr::multiply_scalar);
        }
        check_dimensions_in_multiplication("multiply", left, right)?;

        let start = Instant::now();
        let result = match (constant_matrix(self), constant_matrix(rhs)) {
            (Some(a), Some(b)) => {
                let product = KMatrix::from_dmatrix(&(a.to_dmatrix() * b.to_dmatrix()))?;
                concretize(product.dims(), product.to_scalars())?
            }
            _ => symbolic_product(self, rhs, left, right)?,
        };

        tracing::debug!(
            component = "expr",
            operation = "multiply",
            status = "success",
            rows = left.rows,
            inner = left.cols,
            cols = right.cols,
            result_kind = result.kind().as_str(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Multiplied expressions"
        );
        Ok(result)
    }

    /// `self^exponent`. Scalars use the scalar lattice; square matrices use
    /// repeated squaring with `M^0 = I`; vectors are rejected.
    pub fn power_expr(&self, exponent: i64) -> Result<Expression, ExprError> {
        if exponent < 0 {
            return Err(ExprError::NegativeExponent { exponent });
        }
        match self {
            Expression::Scalar(s) => s.power_scalar(exponent).map(Expression::Scalar),
            Expression::Vector(_) => Err(ExprError::UnsupportedOperand {
                operation: "power",
                operand: self.operand_name(),
            }),
            Expression::Matrix(m) => {
                let dims = m.dims();
                if !dims.is_square() {
                    return Err(ExprError::DimensionMismatch {
                        operation: "power",
                        left: dims,
                        right: dims,
                    });
                }
                if exponent == 0 {
                    let identity = KMatrix::identity(dims.rows)?;
                    return concretize(dims, MatrixExpr::K(identity).to_scalars());
                }
                // Square-and-multiply over the bits of `exponent`.
                let mut acc: Option<Expression> = None;
                let mut base = self.clone();
                let mut remaining = exponent;
                loop {
                    if remaining & 1 == 1 {
                        acc = Some(match acc {
                            Some(acc) => acc.multiply_expr(&base)?,
                            None => base.clone(),
                        });
                    }
                    remaining >>= 1;
                    if remaining == 0 {
                        break;
                    }
                    base = base.multiply_expr(&base)?;
                }
                Ok(acc.unwrap_or(base))
            }
        }
    }

    pub fn transpose_expr(&self) -> Result<Expression, ExprError> {
        match self {
            Expression::Scalar(_) => Ok(self.clone()),
            Expression::Vector(v) => {
                let row = v.transpose();
                concretize(row.dims(), row.to_scalars())
            }
            Expression::Matrix(m) => {
                let t = m.transpose();
                concretize(t.dims(), t.to_scalars())
            }
        }
    }

    /// Entrywise partial derivative.
    pub fn derivative_expr(&self, variable: &Variable) -> Result<Expression, ExprError> {
        self.map_entries(|s| Ok(s.derivative_scalar(variable)))
    }

    /// Entrywise simultaneous substitution.
    pub fn substitute_all_expr(
        &self,
        substitutions: &HashMap<Variable, ScalarExpr>,
    ) -> Result<Expression, ExprError> {
        self.map_entries(|s| s.substitute_all(substitutions))
    }

    fn map_entries(
        &self,
        f: impl Fn(&ScalarExpr) -> Result<ScalarExpr, ExprError>,
    ) -> Result<Expression, ExprError> {
        match self {
            Expression::Scalar(s) => f(s).map(Expression::Scalar),
            _ => {
                let data = self.to_scalars().iter().map(f).collect::<Result<_, _>>()?;
                concretize(self.dims(), data)
            }
        }
    }

    /// Entrywise combination; a scalar side is repeated over the other.
    fn broadcast(
        &self,
        operation: &'static str,
        rhs: &Expression,
        f: impl Fn(&ScalarExpr, &ScalarExpr) -> Result<ScalarExpr, ExprError>,
    ) -> Result<Expression, ExprError> {
        let (left, right) = (self.dims(), rhs.dims());
        check_dimensions_in_addition(operation, left, right)?;
        if let (Expression::Scalar(a), Expression::Scalar(b)) = (self, rhs) {
            return f(a, b).map(Expression::Scalar);
        }

        let lhs_data = self.to_scalars();
        let rhs_data = rhs.to_scalars();
        let dims = if left.is_scalar() { right } else { left };
        let data = (0..dims.len())
            .map(|idx| {
                let a = &lhs_data[if left.is_scalar() { 0 } else { idx }];
                let b = &rhs_data[if right.is_scalar() { 0 } else { idx }];
                f(a, b)
            })
            .collect::<Result<_, _>>()?;
        concretize(dims, data)
    }
}

fn constant_matrix(expr: &Expression) -> Option<KMatrix> {
    match expr {
        Expression::Matrix(MatrixExpr::K(m)) => Some(m.clone()),
        Expression::Vector(VectorExpr::K(v)) => Some(v.to_column()),
        _ => None,
    }
}

/// Triple loop of scalar products; each dot product starts from its first
/// term.
fn symbolic_product(
    lhs: &Expression,
    rhs: &Expression,
    left: Dims,
    right: Dims,
) -> Result<Expression, ExprError> {
    let lhs_data = lhs.to_scalars();
    let rhs_data = rhs.to_scalars();
    let inner = left.cols;
    let mut data = Vec::with_capacity(left.rows * right.cols);
    for i in 0..left.rows {
        for j in 0..right.cols {
            let term = |k: usize| {
                lhs_data[i * inner + k].multiply_scalar(&rhs_data[k * right.cols + j])
            };
            let mut acc = term(0)?;
            for k in 1..inner {
                acc = acc.plus_scalar(&term(k)?);
            }
            data.push(acc);
        }
    }
    concretize(Dims::new(left.rows, right.cols), data)
}
