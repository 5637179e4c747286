//! Scalar arithmetic over the promotion lattice `K < Variable < Monomial < Polynomial`.
//!
//! Every result is computed on the least kind able to hold it:
//! constants fold, single terms stay monomials, and anything involving a
//! polynomial is concatenated or distributed and then simplified. Sums
//! always succeed; products and powers fail once an exponent would leave
//! the `u32` range.

use std::collections::HashMap;

use crate::error::ExprError;
use crate::scalar::monomial::powu_f64;
use crate::scalar::{K, Monomial, Polynomial, ScalarExpr, Variable};

impl ScalarExpr {
    pub fn plus_scalar(&self, rhs: &ScalarExpr) -> ScalarExpr {
        match (self, rhs) {
            (ScalarExpr::K(a), ScalarExpr::K(b)) => ScalarExpr::K(K(a.0 + b.0)),
            (ScalarExpr::Polynomial(p), other) => {
                ScalarExpr::Polynomial(p.sum(&other.to_polynomial()))
            }
            (other, ScalarExpr::Polynomial(p)) => {
                ScalarExpr::Polynomial(other.to_polynomial().sum(p))
            }
            _ => match (self.to_monomial(), rhs.to_monomial()) {
                (Some(a), Some(b)) => add_monomials(a, b),
                _ => ScalarExpr::Polynomial(self.to_polynomial().sum(&rhs.to_polynomial())),
            },
        }
    }

    pub fn minus_scalar(&self, rhs: &ScalarExpr) -> ScalarExpr {
        self.plus_scalar(&rhs.negate())
    }

    pub fn multiply_scalar(&self, rhs: &ScalarExpr) -> Result<ScalarExpr, ExprError> {
        let product = match (self, rhs) {
            (ScalarExpr::K(a), ScalarExpr::K(b)) => ScalarExpr::K(K(a.0 * b.0)),
            (ScalarExpr::Polynomial(a), ScalarExpr::Polynomial(b)) => {
                ScalarExpr::Polynomial(a.product(b)?)
            }
            (ScalarExpr::Polynomial(p), other) | (other, ScalarExpr::Polynomial(p)) => {
                match other.to_monomial() {
                    Some(m) => ScalarExpr::Polynomial(p.product_with_monomial(&m)?),
                    None => ScalarExpr::Polynomial(p.product(&other.to_polynomial())?),
                }
            }
            _ => match (self.to_monomial(), rhs.to_monomial()) {
                (Some(a), Some(b)) => ScalarExpr::Monomial(a.product(&b)?),
                _ => ScalarExpr::Polynomial(self.to_polynomial().product(&rhs.to_polynomial())?),
            },
        };
        Ok(product)
    }

    pub fn scale(&self, by: f64) -> ScalarExpr {
        match self {
            ScalarExpr::K(k) => ScalarExpr::K(K(k.0 * by)),
            ScalarExpr::Variable(v) => ScalarExpr::Monomial(Monomial::term(*v, by)),
            ScalarExpr::Monomial(m) => ScalarExpr::Monomial(m.scaled(by)),
            ScalarExpr::Polynomial(p) => ScalarExpr::Polynomial(p.scaled(by)),
        }
    }

    pub fn negate(&self) -> ScalarExpr {
        self.scale(-1.0)
    }

    /// `self^exponent`; `x^0` is `K(1)`.
    ///
    /// Exponents above `u32::MAX`, or powers whose degree would exceed it,
    /// are rejected with `ExponentOverflow`.
    pub fn power_scalar(&self, exponent: i64) -> Result<ScalarExpr, ExprError> {
        if exponent < 0 {
            return Err(ExprError::NegativeExponent { exponent });
        }
        let exponent = u32::try_from(exponent).map_err(|_| ExprError::ExponentOverflow {
            operation: "power",
            exponent: exponent.unsigned_abs(),
        })?;
        self.powu(exponent)
    }

    pub(crate) fn powu(&self, exponent: u32) -> Result<ScalarExpr, ExprError> {
        let power = match (self, exponent) {
            (_, 0) => ScalarExpr::K(K::ONE),
            (_, 1) => self.clone(),
            (ScalarExpr::K(k), n) => ScalarExpr::K(K(powu_f64(k.0, n))),
            (ScalarExpr::Variable(v), n) => ScalarExpr::Monomial(Monomial::from(*v).powi(n)?),
            (ScalarExpr::Monomial(m), n) => ScalarExpr::Monomial(m.powi(n)?),
            (ScalarExpr::Polynomial(p), n) => {
                let degree = u64::from(p.total_degree()) * u64::from(n);
                if u32::try_from(degree).is_err() {
                    return Err(ExprError::ExponentOverflow {
                        operation: "power",
                        exponent: degree,
                    });
                }
                // Square-and-multiply over the bits of `n`.
                let mut result: Option<ScalarExpr> = None;
                let mut base = self.clone();
                let mut remaining = n;
                loop {
                    if remaining & 1 == 1 {
                        result = Some(match result {
                            Some(acc) => acc.multiply_scalar(&base)?,
                            None => base.clone(),
                        });
                    }
                    remaining >>= 1;
                    if remaining == 0 {
                        break;
                    }
                    base = base.multiply_scalar(&base)?;
                }
                result.unwrap_or(ScalarExpr::K(K::ONE))
            }
        };
        Ok(power)
    }

    /// Partial derivative with respect to `variable`.
    ///
    /// Constant and absent-variable cases reduce to `K(0)`; a polynomial
    /// whose derivative cancels entirely also collapses to `K(0)`.
    pub fn derivative_scalar(&self, variable: &Variable) -> ScalarExpr {
        match self {
            ScalarExpr::K(_) => ScalarExpr::K(K::ZERO),
            ScalarExpr::Variable(v) if v == variable => ScalarExpr::K(K::ONE),
            ScalarExpr::Variable(_) => ScalarExpr::K(K::ZERO),
            ScalarExpr::Monomial(m) => match m.partial_derivative(variable) {
                Some(d) => ScalarExpr::Monomial(d),
                None => ScalarExpr::K(K::ZERO),
            },
            ScalarExpr::Polynomial(p) => {
                let terms: Vec<Monomial> = p
                    .monomials()
                    .iter()
                    .filter(|m| !m.is_constant())
                    .filter_map(|m| m.partial_derivative(variable))
                    .collect();
                if terms.is_empty() {
                    return ScalarExpr::K(K::ZERO);
                }
                let simplified = Polynomial::from_nonempty(terms).simplify();
                if simplified.is_zero() {
                    ScalarExpr::K(K::ZERO)
                } else {
                    ScalarExpr::Polynomial(simplified)
                }
            }
        }
    }

    pub fn substitute_scalar(
        &self,
        variable: &Variable,
        replacement: &ScalarExpr,
    ) -> Result<ScalarExpr, ExprError> {
        let map = HashMap::from([(*variable, replacement.clone())]);
        self.substitute_all(&map)
    }

    /// Replace every mapped variable at once.
    ///
    /// Replacements are not themselves rewritten, so the result does not
    /// depend on the iteration order of `map`.
    pub fn substitute_all(
        &self,
        map: &HashMap<Variable, ScalarExpr>,
    ) -> Result<ScalarExpr, ExprError> {
        if map.is_empty() {
            return Ok(self.clone());
        }
        match self {
            ScalarExpr::K(_) => Ok(self.clone()),
            ScalarExpr::Variable(v) => Ok(map.get(v).cloned().unwrap_or_else(|| self.clone())),
            ScalarExpr::Monomial(m) => substitute_monomial(m, map),
            ScalarExpr::Polynomial(p) => {
                let mut terms = p.monomials().iter().map(|m| substitute_monomial(m, map));
                let Some(first) = terms.next() else {
                    return Ok(self.clone());
                };
                let summed = terms.try_fold(first?, |acc, term| Ok(acc.plus_scalar(&term?)))?;
                Ok(match summed {
                    ScalarExpr::Polynomial(p) => ScalarExpr::Polynomial(p.simplify()),
                    other => other,
                })
            }
        }
    }
}

/// Sum of two single terms: matching forms fold into one monomial, anything
/// else becomes a two-term polynomial with a constant term last.
fn add_monomials(a: Monomial, b: Monomial) -> ScalarExpr {
    if a.matches_form_of(&b) {
        let merged = a.with_coefficient(a.coefficient() + b.coefficient());
        return ScalarExpr::Monomial(merged);
    }
    let terms = if a.is_constant() { vec![b, a] } else { vec![a, b] };
    ScalarExpr::Polynomial(Polynomial::from_nonempty(terms))
}

fn substitute_monomial(
    monomial: &Monomial,
    map: &HashMap<Variable, ScalarExpr>,
) -> Result<ScalarExpr, ExprError> {
    if !monomial.factors().any(|(var, _)| map.contains_key(var)) {
        return Ok(ScalarExpr::Monomial(monomial.clone()));
    }
    let kept = monomial.without_factors(|var| map.contains_key(var));
    let mut acc = if kept.is_constant() {
        ScalarExpr::K(K(kept.coefficient()))
    } else {
        ScalarExpr::Monomial(kept)
    };
    for (var, exponent) in monomial.factors() {
        if let Some(replacement) = map.get(var) {
            acc = acc.multiply_scalar(&replacement.powu(exponent)?)?;
        }
    }
    Ok(acc)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::ids::VariableId;
    use crate::scalar::ExprKind;

    fn x() -> Variable {
        Variable::continuous(VariableId::new(1))
    }

    fn y() -> Variable {
        Variable::continuous(VariableId::new(2))
    }

    fn sx() -> ScalarExpr {
        ScalarExpr::from(x())
    }

    fn sy() -> ScalarExpr {
        ScalarExpr::from(y())
    }

    #[test]
    fn constants_fold() {
        let sum = ScalarExpr::from(2.0).plus_scalar(&ScalarExpr::from(3.0));
        assert_eq!(sum, ScalarExpr::K(K(5.0)));
        let product = ScalarExpr::from(2.0)
            .multiply_scalar(&ScalarExpr::from(3.0))
            .unwrap();
        assert_eq!(product, ScalarExpr::K(K(6.0)));
    }

    #[test]
    fn constant_plus_variable_is_polynomial() {
        let sum = ScalarExpr::from(2.0).plus_scalar(&sx());
        assert_eq!(sum.kind(), ExprKind::Polynomial);
        assert_eq!(sum.constant(), 2.0);
        assert_eq!(sum.degree(), 1);
    }

    #[test]
    fn constant_term_is_listed_last() {
        let left = ScalarExpr::from(2.0).plus_scalar(&sx());
        let right = sx().plus_scalar(&ScalarExpr::from(2.0));
        assert_eq!(left.to_string(), "x_1 + 2");
        assert_eq!(left, right);
    }

    #[test]
    fn same_variable_accumulates() {
        let sum = sx().plus_scalar(&sx());
        assert_eq!(sum, ScalarExpr::Monomial(Monomial::term(x(), 2.0)));
    }

    #[test]
    fn different_variables_make_polynomial() {
        let sum = sx().plus_scalar(&sy());
        let ScalarExpr::Polynomial(p) = sum else {
            panic!("expected polynomial");
        };
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn constant_monomial_folds_with_constant() {
        let sum = ScalarExpr::from(Monomial::constant(2.0)).plus_scalar(&ScalarExpr::from(1.0));
        assert_eq!(sum, ScalarExpr::Monomial(Monomial::constant(3.0)));
    }

    #[test]
    fn monomial_product_tracks_degree() {
        let xx = sx().multiply_scalar(&sx()).unwrap();
        assert_eq!(xx.kind(), ExprKind::Monomial);
        assert_eq!(xx.degree(), 2);

        let xy2 = xx.multiply_scalar(&sy()).unwrap().scale(2.0);
        assert_eq!(xy2.degree(), 3);
    }

    #[test]
    fn polynomial_distributes() {
        // (x + 1) * 2y = 2xy + 2y
        let p = sx().plus_scalar(&ScalarExpr::from(1.0));
        let product = p.multiply_scalar(&sy().scale(2.0)).unwrap();
        let expected = Polynomial::new(vec![
            Monomial::new(2.0, vec![(x(), 1), (y(), 1)]).unwrap(),
            Monomial::term(y(), 2.0),
        ])
        .unwrap();
        assert!(product.form_eq(&ScalarExpr::Polynomial(expected)));
    }

    #[test]
    fn subtraction_cancels() {
        let p = sx().plus_scalar(&sy());
        let diff = p.minus_scalar(&sx());
        assert!(diff.form_eq(&sy()));
    }

    #[test]
    fn power_rules() {
        assert_eq!(sx().power_scalar(0).unwrap(), ScalarExpr::K(K(1.0)));
        assert_eq!(sx().power_scalar(1).unwrap(), sx());
        assert_eq!(sx().power_scalar(3).unwrap().degree(), 3);
        assert_eq!(
            sx().power_scalar(-2).unwrap_err(),
            ExprError::NegativeExponent { exponent: -2 }
        );

        // (x + 1)^2 = x^2 + 2x + 1
        let square = sx()
            .plus_scalar(&ScalarExpr::from(1.0))
            .power_scalar(2)
            .unwrap();
        let expected = Polynomial::new(vec![
            Monomial::new(1.0, vec![(x(), 2)]).unwrap(),
            Monomial::term(x(), 2.0),
            Monomial::constant(1.0),
        ])
        .unwrap();
        assert!(square.form_eq(&ScalarExpr::Polynomial(expected)));

        // (x + 1)^5 by squaring matches five repeated products.
        let base = sx().plus_scalar(&ScalarExpr::from(1.0));
        let mut repeated = base.clone();
        for _ in 1..5 {
            repeated = repeated.multiply_scalar(&base).unwrap();
        }
        assert!(base.power_scalar(5).unwrap().form_eq(&repeated));
    }

    #[test]
    fn huge_exponents_are_not_wrapped() {
        let two = ScalarExpr::from(2.0);
        assert_eq!(
            two.power_scalar(3_000_000_000).unwrap(),
            ScalarExpr::K(K(f64::INFINITY))
        );
        assert_eq!(
            ScalarExpr::from(0.5).power_scalar(3_000_000_000).unwrap(),
            ScalarExpr::K(K(0.0))
        );

        let square = sx().multiply_scalar(&sx()).unwrap();
        let err = square.power_scalar(3_000_000_000).unwrap_err();
        assert_eq!(err.code(), "EXPR_EXPONENT_OVERFLOW");

        assert_eq!(
            sx().power_scalar(5_000_000_000).unwrap_err(),
            ExprError::ExponentOverflow {
                operation: "power",
                exponent: 5_000_000_000,
            }
        );

        let shifted = sx().plus_scalar(&ScalarExpr::from(1.0));
        let squared = shifted.power_scalar(2).unwrap();
        assert_eq!(
            squared.power_scalar(1 << 31).unwrap_err().code(),
            "EXPR_EXPONENT_OVERFLOW"
        );
    }

    #[test]
    fn derivative_pins_power_rule() {
        // d/dx [3x^2] = 6x
        let expr = sx().power_scalar(2).unwrap().scale(3.0);
        let d = expr.derivative_scalar(&x());
        assert_eq!(d, ScalarExpr::Monomial(Monomial::term(x(), 6.0)));
    }

    #[test]
    fn derivative_of_polynomial_drops_constants() {
        // d/dx [x*y + 2y + 5] = y
        let p = sx()
            .multiply_scalar(&sy())
            .unwrap()
            .plus_scalar(&sy().scale(2.0))
            .plus_scalar(&ScalarExpr::from(5.0));
        let d = p.derivative_scalar(&x());
        assert!(d.form_eq(&sy()));

        let z = Variable::continuous(VariableId::new(9));
        assert_eq!(p.derivative_scalar(&z), ScalarExpr::K(K(0.0)));
    }

    #[test]
    fn derivative_of_variables_and_constants() {
        assert_eq!(sx().derivative_scalar(&x()), ScalarExpr::K(K(1.0)));
        assert_eq!(sx().derivative_scalar(&y()), ScalarExpr::K(K(0.0)));
        assert_eq!(ScalarExpr::from(4.0).derivative_scalar(&x()), ScalarExpr::K(K(0.0)));
    }

    #[test]
    fn substitute_constant_into_sum() {
        let p = sx().plus_scalar(&sy());
        let substituted = p.substitute_scalar(&x(), &ScalarExpr::from(3.0)).unwrap();
        assert_eq!(substituted.kind(), ExprKind::Polynomial);
        let expected = Polynomial::linear(&[(y(), 1.0)], 3.0);
        assert!(substituted.form_eq(&ScalarExpr::Polynomial(expected)));
    }

    #[test]
    fn substitute_expands_powers() {
        // 2 x^2 y with x := (y + 1) -> 2 y (y + 1)^2
        let m = Monomial::new(2.0, vec![(x(), 2), (y(), 1)]).unwrap();
        let replacement = sy().plus_scalar(&ScalarExpr::from(1.0));
        let substituted = ScalarExpr::from(m)
            .substitute_scalar(&x(), &replacement)
            .unwrap();
        let expected = sy()
            .scale(2.0)
            .multiply_scalar(&replacement.power_scalar(2).unwrap())
            .unwrap();
        assert!(substituted.form_eq(&expected));
        assert!(!substituted.variables().contains(&x()));
    }

    #[test]
    fn substitution_is_simultaneous() {
        // x + y with {x := y, y := 2} is y + 2, regardless of map order.
        let p = sx().plus_scalar(&sy());
        let map = HashMap::from([(x(), sy()), (y(), ScalarExpr::from(2.0))]);
        let substituted = p.substitute_all(&map).unwrap();
        let expected = Polynomial::linear(&[(y(), 1.0)], 2.0);
        assert!(substituted.form_eq(&ScalarExpr::Polynomial(expected)));
    }
}
