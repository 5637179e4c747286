//! Monomials: a coefficient times a product of variable powers.
//!
//! Factors are kept in an ordered map from variable to exponent, so the
//! factor list is unique by ID and sorted by ID. Exponents are always
//! positive and the total degree fits in a `u32`; a monomial without
//! factors is the constant `coefficient`.

use std::collections::BTreeMap;

use crate::error::ExprError;
use crate::scalar::constant::K;
use crate::scalar::variable::Variable;

#[derive(Debug, Clone, PartialEq)]
pub struct Monomial {
    coefficient: f64,
    factors: BTreeMap<Variable, u32>,
}

impl Monomial {
    /// Build a monomial from `(variable, exponent)` pairs.
    ///
    /// Rejects zero exponents, repeated variables and total degrees that
    /// overflow `u32`.
    pub fn new(coefficient: f64, factors: Vec<(Variable, u32)>) -> Result<Self, ExprError> {
        let mut map = BTreeMap::new();
        for (variable, exponent) in factors {
            let exponent = u64::from(exponent);
            if exponent == 0 {
                return Err(ExprError::InvalidMonomial {
                    reason: format!("exponent of {variable} must be positive"),
                });
            }
            if map.insert(variable, exponent).is_some() {
                return Err(ExprError::InvalidMonomial {
                    reason: format!("{variable} appears more than once"),
                });
            }
        }
        Self::checked(coefficient, map, "monomial")
    }

    /// Wrap `factors`, enforcing the total-degree bound.
    fn checked(
        coefficient: f64,
        factors: BTreeMap<Variable, u64>,
        operation: &'static str,
    ) -> Result<Self, ExprError> {
        let degree = factors
            .values()
            .try_fold(0u64, |acc, exp| acc.checked_add(*exp))
            .unwrap_or(u64::MAX);
        if u32::try_from(degree).is_err() {
            return Err(ExprError::ExponentOverflow {
                operation,
                exponent: degree,
            });
        }
        // Every exponent is at most the degree, so the narrowing is lossless.
        let factors = factors
            .into_iter()
            .map(|(var, exp)| (var, exp as u32))
            .collect();
        Ok(Self {
            coefficient,
            factors,
        })
    }

    /// Build a monomial from parallel variable and exponent lists.
    pub fn from_parallel(
        coefficient: f64,
        variables: Vec<Variable>,
        exponents: Vec<u32>,
    ) -> Result<Self, ExprError> {
        if variables.len() != exponents.len() {
            return Err(ExprError::InvalidMonomial {
                reason: format!(
                    "{} variable factors but {} exponents",
                    variables.len(),
                    exponents.len()
                ),
            });
        }
        Self::new(coefficient, variables.into_iter().zip(exponents).collect())
    }

    /// Constant monomial with no factors.
    pub fn constant(coefficient: f64) -> Self {
        Self {
            coefficient,
            factors: BTreeMap::new(),
        }
    }

    /// `coefficient * variable`.
    pub fn term(variable: Variable, coefficient: f64) -> Self {
        Self {
            coefficient,
            factors: BTreeMap::from([(variable, 1)]),
        }
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Factors in ascending variable-ID order.
    pub fn factors(&self) -> impl Iterator<Item = (&Variable, u32)> {
        self.factors.iter().map(|(var, exp)| (var, *exp))
    }

    pub fn num_factors(&self) -> usize {
        self.factors.len()
    }

    /// Exponent of `variable`, or 0 when absent.
    pub fn exponent_of(&self, variable: &Variable) -> u32 {
        self.factors.get(variable).copied().unwrap_or(0)
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.factors.contains_key(variable)
    }

    pub fn is_constant(&self) -> bool {
        self.factors.is_empty()
    }

    /// Sum of exponents.
    pub fn total_degree(&self) -> u32 {
        self.factors.values().sum()
    }

    /// The single variable of a degree-1 monomial.
    pub fn linear_variable(&self) -> Option<&Variable> {
        match self.factors.iter().next() {
            Some((var, 1)) if self.factors.len() == 1 => Some(var),
            _ => None,
        }
    }

    /// Same variable IDs with identical exponents, ignoring coefficients.
    pub fn matches_form_of(&self, other: &Monomial) -> bool {
        self.factors.len() == other.factors.len()
            && self
                .factors
                .iter()
                .zip(other.factors.iter())
                .all(|((va, ea), (vb, eb))| va.id == vb.id && ea == eb)
    }

    pub fn with_coefficient(&self, coefficient: f64) -> Self {
        Self {
            coefficient,
            factors: self.factors.clone(),
        }
    }

    pub fn scaled(&self, by: f64) -> Self {
        self.with_coefficient(self.coefficient * by)
    }

    /// Product of two monomials: coefficients multiply, exponents of
    /// shared variables add.
    pub fn product(&self, other: &Monomial) -> Result<Self, ExprError> {
        let mut factors: BTreeMap<Variable, u64> = self
            .factors
            .iter()
            .map(|(var, exp)| (*var, u64::from(*exp)))
            .collect();
        for (var, exp) in &other.factors {
            *factors.entry(*var).or_insert(0) += u64::from(*exp);
        }
        Self::checked(self.coefficient * other.coefficient, factors, "product")
    }

    /// `self^exponent`; `m^0` is the constant 1.
    pub fn powi(&self, exponent: u32) -> Result<Self, ExprError> {
        if exponent == 0 {
            return Ok(Self::constant(1.0));
        }
        let factors = self
            .factors
            .iter()
            .map(|(var, exp)| (*var, u64::from(*exp) * u64::from(exponent)))
            .collect();
        Self::checked(powu_f64(self.coefficient, exponent), factors, "power")
    }

    /// Copy of this monomial with every factor for which `drop` holds removed.
    pub(crate) fn without_factors(&self, drop: impl Fn(&Variable) -> bool) -> Self {
        Self {
            coefficient: self.coefficient,
            factors: self
                .factors
                .iter()
                .filter(|(var, _)| !drop(var))
                .map(|(var, exp)| (*var, *exp))
                .collect(),
        }
    }

    /// Partial derivative with respect to `variable`, applying the power rule.
    ///
    /// Returns `None` when the variable does not occur (the derivative is zero).
    pub fn partial_derivative(&self, variable: &Variable) -> Option<Self> {
        let exponent = self.factors.get(variable).copied()?;
        let mut factors = self.factors.clone();
        if exponent == 1 {
            factors.remove(variable);
        } else {
            factors.insert(*variable, exponent - 1);
        }
        Some(Self {
            coefficient: self.coefficient * f64::from(exponent),
            factors,
        })
    }

    pub fn variables(&self) -> Vec<Variable> {
        self.factors.keys().copied().collect()
    }

    pub fn check(&self) -> Result<(), ExprError> {
        for (var, exp) in &self.factors {
            var.check()?;
            if *exp == 0 {
                return Err(ExprError::InvalidMonomial {
                    reason: format!("exponent of {var} must be positive"),
                });
            }
        }
        Ok(())
    }
}

/// `base^exponent` for the full `u32` range.
pub(crate) fn powu_f64(base: f64, exponent: u32) -> f64 {
    match i32::try_from(exponent) {
        Ok(n) => base.powi(n),
        Err(_) => base.powf(f64::from(exponent)),
    }
}

impl From<Variable> for Monomial {
    fn from(variable: Variable) -> Self {
        Self::term(variable, 1.0)
    }
}

impl From<K> for Monomial {
    fn from(value: K) -> Self {
        Self::constant(value.0)
    }
}

impl std::fmt::Display for Monomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.factors.is_empty() {
            return write!(f, "{}", self.coefficient);
        }
        let mut first = true;
        if self.coefficient == -1.0 {
            write!(f, "-")?;
        } else if self.coefficient != 1.0 {
            write!(f, "{}", self.coefficient)?;
            first = false;
        }
        for (var, exp) in &self.factors {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            if *exp == 1 {
                write!(f, "{var}")?;
            } else {
                write!(f, "{var}^{exp}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::ids::VariableId;

    fn x() -> Variable {
        Variable::continuous(VariableId::new(1))
    }

    fn y() -> Variable {
        Variable::continuous(VariableId::new(2))
    }

    #[test]
    fn parallel_lists_must_match() {
        let err = Monomial::from_parallel(1.0, vec![x(), y()], vec![1]).unwrap_err();
        assert_eq!(err.code(), "EXPR_INVALID_MONOMIAL");
    }

    #[test]
    fn duplicate_factor_rejected() {
        assert!(Monomial::new(1.0, vec![(x(), 1), (x(), 2)]).is_err());
    }

    #[test]
    fn zero_exponent_rejected() {
        assert!(Monomial::new(1.0, vec![(x(), 0)]).is_err());
    }

    #[test]
    fn form_match_ignores_order_and_coefficient() {
        let a = Monomial::new(2.0, vec![(x(), 2), (y(), 1)]).unwrap();
        let b = Monomial::new(-5.0, vec![(y(), 1), (x(), 2)]).unwrap();
        let c = Monomial::new(2.0, vec![(x(), 1), (y(), 1)]).unwrap();
        assert!(a.matches_form_of(&b));
        assert!(!a.matches_form_of(&c));
    }

    #[test]
    fn product_merges_shared_factors() {
        let a = Monomial::new(2.0, vec![(x(), 1)]).unwrap();
        let b = Monomial::new(3.0, vec![(x(), 2), (y(), 1)]).unwrap();
        let p = a.product(&b).unwrap();
        assert_eq!(p.coefficient(), 6.0);
        assert_eq!(p.exponent_of(&x()), 3);
        assert_eq!(p.exponent_of(&y()), 1);
        assert_eq!(p.total_degree(), 4);
    }

    #[test]
    fn degree_overflow_is_an_error() {
        let half = Monomial::new(1.0, vec![(x(), 1 << 31)]).unwrap();
        let err = half.product(&half).unwrap_err();
        assert_eq!(err.code(), "EXPR_EXPONENT_OVERFLOW");

        let square = Monomial::new(1.0, vec![(x(), 2)]).unwrap();
        let err = square.powi(3_000_000_000).unwrap_err();
        assert_eq!(
            err,
            ExprError::ExponentOverflow {
                operation: "power",
                exponent: 6_000_000_000,
            }
        );

        let spread = Monomial::new(1.0, vec![(x(), u32::MAX), (y(), 1)]);
        assert_eq!(spread.unwrap_err().code(), "EXPR_EXPONENT_OVERFLOW");
    }

    #[test]
    fn large_powers_keep_the_coefficient_magnitude() {
        let m = Monomial::term(x(), 2.0).powi(3_000_000_000).unwrap();
        assert_eq!(m.coefficient(), f64::INFINITY);
        assert_eq!(m.exponent_of(&x()), 3_000_000_000);
        let m = Monomial::term(x(), 0.5).powi(3_000_000_000).unwrap();
        assert_eq!(m.coefficient(), 0.0);
    }

    #[test]
    fn derivative_applies_power_rule() {
        let m = Monomial::new(3.0, vec![(x(), 2)]).unwrap();
        let d = m.partial_derivative(&x()).unwrap();
        assert_eq!(d.coefficient(), 6.0);
        assert_eq!(d.exponent_of(&x()), 1);

        let linear = Monomial::term(x(), 4.0).partial_derivative(&x()).unwrap();
        assert!(linear.is_constant());
        assert_eq!(linear.coefficient(), 4.0);

        assert!(m.partial_derivative(&y()).is_none());
    }

    #[test]
    fn linear_variable_only_for_degree_one() {
        assert_eq!(Monomial::term(x(), 2.0).linear_variable(), Some(&x()));
        assert!(Monomial::new(1.0, vec![(x(), 2)]).unwrap().linear_variable().is_none());
        assert!(Monomial::constant(1.0).linear_variable().is_none());
    }

    #[test]
    fn display_formats_factors() {
        let m = Monomial::new(2.0, vec![(y(), 1), (x(), 2)]).unwrap();
        assert_eq!(m.to_string(), "2 x_1^2 x_2");
        assert_eq!(Monomial::from(x()).to_string(), "x_1");
        assert_eq!(Monomial::term(x(), -1.0).to_string(), "-x_1");
        assert_eq!(Monomial::constant(4.0).to_string(), "4");
    }
}
