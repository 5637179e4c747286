//! Scalar constraints and single-row linear extraction.

use crate::constraint::{ConstrSense, Constraint, implication};
use crate::dims::Dims;
use crate::error::ExprError;
use crate::linear::{LinearForm, linear_coeff};
use crate::scalar::{ScalarExpr, Variable};

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarConstraint {
    lhs: ScalarExpr,
    rhs: ScalarExpr,
    sense: ConstrSense,
}

impl ScalarConstraint {
    pub fn new(lhs: impl Into<ScalarExpr>, rhs: impl Into<ScalarExpr>, sense: ConstrSense) -> Self {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into(),
            sense,
        }
    }

    pub fn lhs(&self) -> &ScalarExpr {
        &self.lhs
    }

    pub fn rhs(&self) -> &ScalarExpr {
        &self.rhs
    }

    pub fn sense(&self) -> ConstrSense {
        self.sense
    }

    pub fn check(&self) -> Result<(), ExprError> {
        self.lhs.check()?;
        self.rhs.check()
    }

    pub fn is_linear(&self) -> bool {
        self.lhs.degree() <= 1 && self.rhs.degree() <= 1
    }

    pub fn variables(&self) -> Vec<Variable> {
        let mut vars = self.lhs.variables();
        vars.extend(self.rhs.variables());
        vars.sort();
        vars.dedup();
        vars
    }

    /// Only `(0, 0)` is in range.
    pub fn at(&self, row: usize, col: usize) -> Result<ScalarConstraint, ExprError> {
        if row == 0 && col == 0 {
            Ok(self.clone())
        } else {
            Err(ExprError::IndexOutOfRange {
                index: (row, col),
                dims: Dims::SCALAR,
            })
        }
    }

    /// Move every variable term left and every constant right:
    /// `lhs - lhs.c - (rhs - rhs.c)  <sense>  rhs.c - lhs.c`.
    pub fn simplify(&self) -> ScalarConstraint {
        let (lhs_c, rhs_c) = (self.lhs.constant(), self.rhs.constant());
        let lhs = self
            .lhs
            .minus_scalar(&ScalarExpr::from(lhs_c))
            .minus_scalar(&self.rhs.minus_scalar(&ScalarExpr::from(rhs_c)));
        ScalarConstraint {
            lhs: collapse_zero(lhs),
            rhs: ScalarExpr::from(rhs_c - lhs_c),
            sense: self.sense,
        }
    }

    /// Coefficient row of `lhs - rhs` and the constant `rhs.c - lhs.c`,
    /// without any sense normalization.
    pub(crate) fn linear_row(
        &self,
        operation: &'static str,
        wrt: &[Variable],
    ) -> Result<(Vec<f64>, f64), ExprError> {
        for (side, expr) in [("left-hand side", &self.lhs), ("right-hand side", &self.rhs)] {
            let degree = expr.degree();
            if degree > 1 {
                return Err(ExprError::NonLinear {
                    operation,
                    side,
                    degree,
                });
            }
        }
        let difference = self.lhs.minus_scalar(&self.rhs);
        let row = linear_coeff(&difference, wrt)?;
        Ok((row, self.rhs.constant() - self.lhs.constant()))
    }

    /// Row and bound of the inequality, normalized to `a x <= b`.
    pub(crate) fn inequality_row(&self, wrt: &[Variable]) -> Result<(Vec<f64>, f64), ExprError> {
        if !self.sense.is_inequality() {
            return Err(ExprError::InequalityRequired { found: self.sense });
        }
        let (row, constant) =
            self.linear_row("linear_inequality_constraint_representation", wrt)?;
        Ok(match self.sense {
            ConstrSense::GreaterThanEqual => (row.into_iter().map(|c| -c).collect(), -constant),
            _ => (row, constant),
        })
    }

    pub(crate) fn equality_row(&self, wrt: &[Variable]) -> Result<(Vec<f64>, f64), ExprError> {
        if self.sense != ConstrSense::Equal {
            return Err(ExprError::EqualityRequired { found: self.sense });
        }
        self.linear_row("linear_equality_constraint_representation", wrt)
    }

    /// `(A, b)` for `A x <= b`, one row, columns in `wrt` order.
    pub fn linear_inequality_constraint_representation(
        &self,
        wrt: &[Variable],
    ) -> Result<LinearForm, ExprError> {
        let row = self.inequality_row(wrt)?;
        Ok(LinearForm::from_rows(vec![row], wrt.len()))
    }

    /// `(C, d)` for `C x = d`, one row, columns in `wrt` order.
    pub fn linear_equality_constraint_representation(
        &self,
        wrt: &[Variable],
    ) -> Result<LinearForm, ExprError> {
        let row = self.equality_row(wrt)?;
        Ok(LinearForm::from_rows(vec![row], wrt.len()))
    }

    pub fn implies_this_is_also_satisfied(&self, other: &Constraint) -> bool {
        implication::implies_all(std::slice::from_ref(self), &other.scalar_constraints())
    }
}

fn collapse_zero(expr: ScalarExpr) -> ScalarExpr {
    if expr.is_zero() {
        ScalarExpr::from(0.0)
    } else {
        expr
    }
}

impl std::fmt::Display for ScalarConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.sense, self.rhs)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::expression::ExpressionLike;
    use crate::ids::VariableId;

    fn x() -> Variable {
        Variable::continuous(VariableId::new(0))
    }

    fn y() -> Variable {
        Variable::continuous(VariableId::new(1))
    }

    fn scalar(c: Constraint) -> ScalarConstraint {
        match c {
            Constraint::Scalar(s) => s,
            other => panic!("expected a scalar constraint, got {other:?}"),
        }
    }

    #[test]
    fn affine_inequality_round_trip() {
        let lhs = 2.0 * x() + 3.0 * y() + 3.0;
        let c = scalar(lhs.less_eq(&10.0_f64).unwrap());
        let form = c.linear_inequality_constraint_representation(&[x(), y()]).unwrap();
        assert_eq!(form.coefficients.shape(), (1, 2));
        assert_eq!(form.coefficients[(0, 0)], 2.0);
        assert_eq!(form.coefficients[(0, 1)], 3.0);
        assert_eq!(form.constants[0], 7.0);
    }

    #[test]
    fn greater_equal_is_negated() {
        let c = scalar((2.0 * x()).greater_eq(&4.0_f64).unwrap());
        let form = c.linear_inequality_constraint_representation(&[x()]).unwrap();
        assert_eq!(form.coefficients[(0, 0)], -2.0);
        assert_eq!(form.constants[0], -4.0);
    }

    #[test]
    fn variables_on_both_sides() {
        // 3x + 1 <= y + 5  ->  3x - y <= 4
        let c = ScalarConstraint::new(3.0 * x() + 1.0, y() + 5.0, ConstrSense::LessThanEqual);
        let form = c.linear_inequality_constraint_representation(&[x(), y()]).unwrap();
        assert_eq!(form.coefficients[(0, 0)], 3.0);
        assert_eq!(form.coefficients[(0, 1)], -1.0);
        assert_eq!(form.constants[0], 4.0);
    }

    #[test]
    fn nonlinear_rejected_with_side() {
        let c = scalar(x().power(2).unwrap().less_eq(&5.0_f64).unwrap());
        assert!(!c.is_linear());
        let err = c.linear_inequality_constraint_representation(&[x()]).unwrap_err();
        assert_eq!(
            err,
            ExprError::NonLinear {
                operation: "linear_inequality_constraint_representation",
                side: "left-hand side",
                degree: 2,
            }
        );
    }

    #[test]
    fn sense_must_match_representation() {
        let eq = ScalarConstraint::new(x(), 1.0, ConstrSense::Equal);
        assert_eq!(
            eq.linear_inequality_constraint_representation(&[x()]).unwrap_err().code(),
            "EXPR_INEQUALITY_REQUIRED"
        );
        let form = eq.linear_equality_constraint_representation(&[x()]).unwrap();
        assert_eq!(form.constants[0], 1.0);

        let le = ScalarConstraint::new(x(), 1.0, ConstrSense::LessThanEqual);
        assert_eq!(
            le.linear_equality_constraint_representation(&[x()]).unwrap_err().code(),
            "EXPR_EQUALITY_REQUIRED"
        );
    }

    #[test]
    fn simplify_moves_constants_right() {
        let c = ScalarConstraint::new(2.0 * x() + 3.0, y() - 1.0, ConstrSense::LessThanEqual);
        let s = c.simplify();
        assert_eq!(s.rhs(), &ScalarExpr::from(-4.0));
        assert_eq!(s.lhs().constant(), 0.0);
        let poly = s.lhs().to_polynomial();
        assert_eq!(poly.linear_coefficient_of(&x()), 2.0);
        assert_eq!(poly.linear_coefficient_of(&y()), -1.0);
    }

    #[test]
    fn simplify_of_constant_constraint() {
        let c = ScalarConstraint::new(3.0, 1.0, ConstrSense::LessThanEqual).simplify();
        assert_eq!(c.lhs(), &ScalarExpr::from(0.0));
        assert_eq!(c.rhs(), &ScalarExpr::from(-2.0));
    }

    #[test]
    fn display_uses_symbol() {
        let c = ScalarConstraint::new(x(), 2.0, ConstrSense::GreaterThanEqual);
        assert_eq!(c.to_string(), "x_0 >= 2");
    }
}
