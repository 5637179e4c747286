//! Polynomials: sums of monomials.
//!
//! A polynomial is not canonical by construction. Several monomials may
//! share a form and coefficients may be zero until [`Polynomial::simplify`]
//! runs.

use std::collections::BTreeSet;

use crate::error::ExprError;
use crate::scalar::constant::K;
use crate::scalar::monomial::Monomial;
use crate::scalar::variable::Variable;

#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    monomials: Vec<Monomial>,
}

impl Polynomial {
    pub fn new(monomials: Vec<Monomial>) -> Result<Self, ExprError> {
        if monomials.is_empty() {
            return Err(ExprError::EmptyPolynomial);
        }
        Ok(Self { monomials })
    }

    /// Internal constructor for callers that already hold a non-empty list.
    pub(crate) fn from_nonempty(monomials: Vec<Monomial>) -> Self {
        debug_assert!(!monomials.is_empty());
        Self { monomials }
    }

    pub fn constant(value: f64) -> Self {
        Self {
            monomials: vec![Monomial::constant(value)],
        }
    }

    /// Build `constant + sum(coeff * var)` from linear terms.
    pub fn linear(terms: &[(Variable, f64)], constant: f64) -> Self {
        let mut monomials: Vec<Monomial> = terms
            .iter()
            .map(|(var, coeff)| Monomial::term(*var, *coeff))
            .collect();
        if constant != 0.0 || monomials.is_empty() {
            monomials.push(Monomial::constant(constant));
        }
        Self { monomials }
    }

    pub fn monomials(&self) -> &[Monomial] {
        &self.monomials
    }

    pub fn into_monomials(self) -> Vec<Monomial> {
        self.monomials
    }

    pub fn len(&self) -> usize {
        self.monomials.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.monomials.is_empty()
    }

    /// Sum of the coefficients of all constant monomials.
    pub fn constant_term(&self) -> f64 {
        self.monomials
            .iter()
            .filter(|m| m.is_constant())
            .map(Monomial::coefficient)
            .sum()
    }

    /// Highest total degree among the monomials.
    pub fn total_degree(&self) -> u32 {
        self.monomials
            .iter()
            .map(Monomial::total_degree)
            .max()
            .unwrap_or(0)
    }

    /// Unique variables in ascending ID order.
    pub fn variables(&self) -> Vec<Variable> {
        let set: BTreeSet<Variable> = self
            .monomials
            .iter()
            .flat_map(|m| m.factors().map(|(var, _)| *var))
            .collect();
        set.into_iter().collect()
    }

    /// Coefficient carried by the degree-1 monomials in `variable`.
    pub fn linear_coefficient_of(&self, variable: &Variable) -> f64 {
        self.monomials
            .iter()
            .filter(|m| m.linear_variable() == Some(variable))
            .map(Monomial::coefficient)
            .sum()
    }

    /// The copy with the constant monomials removed.
    ///
    /// A polynomial made only of constants becomes the zero polynomial.
    pub fn without_constant(&self) -> Self {
        let monomials: Vec<Monomial> = self
            .monomials
            .iter()
            .filter(|m| !m.is_constant())
            .cloned()
            .collect();
        if monomials.is_empty() {
            Self::constant(0.0)
        } else {
            Self { monomials }
        }
    }

    /// Canonical form: one monomial per distinct form in first-occurrence
    /// order, with zero coefficients dropped. An all-zero polynomial becomes
    /// the single constant monomial `0`.
    pub fn simplify(&self) -> Self {
        let mut out: Vec<Monomial> = Vec::with_capacity(self.monomials.len());
        for monomial in &self.monomials {
            if monomial.coefficient() == 0.0 {
                continue;
            }
            match out.iter_mut().find(|m| m.matches_form_of(monomial)) {
                Some(existing) => {
                    let merged = existing.coefficient() + monomial.coefficient();
                    *existing = existing.with_coefficient(merged);
                }
                None => out.push(monomial.clone()),
            }
        }
        out.retain(|m| m.coefficient() != 0.0);
        if out.is_empty() {
            return Self::constant(0.0);
        }
        Self { monomials: out }
    }

    /// True when this is the canonical zero (or simplifies to it).
    pub fn is_zero(&self) -> bool {
        self.simplify() == Self::constant(0.0)
    }

    /// Order-independent equality of the simplified forms.
    pub fn form_eq(&self, other: &Polynomial) -> bool {
        let left = self.simplify();
        let right = other.simplify();
        left.monomials.len() == right.monomials.len()
            && left.monomials.iter().all(|m| {
                right
                    .monomials
                    .iter()
                    .any(|o| o.matches_form_of(m) && o.coefficient() == m.coefficient())
            })
    }

    pub fn scaled(&self, by: f64) -> Self {
        Self {
            monomials: self.monomials.iter().map(|m| m.scaled(by)).collect(),
        }
    }

    /// Concatenate both monomial lists and simplify.
    pub fn sum(&self, other: &Polynomial) -> Self {
        let mut monomials = Vec::with_capacity(self.monomials.len() + other.monomials.len());
        monomials.extend_from_slice(&self.monomials);
        monomials.extend_from_slice(&other.monomials);
        Self { monomials }.simplify()
    }

    /// Distribute a monomial over every term and simplify.
    pub fn product_with_monomial(&self, monomial: &Monomial) -> Result<Self, ExprError> {
        let monomials = self
            .monomials
            .iter()
            .map(|m| m.product(monomial))
            .collect::<Result<_, _>>()?;
        Ok(Self { monomials }.simplify())
    }

    /// Pairwise product of all terms, simplified.
    pub fn product(&self, other: &Polynomial) -> Result<Self, ExprError> {
        let monomials = self
            .monomials
            .iter()
            .flat_map(|a| other.monomials.iter().map(move |b| a.product(b)))
            .collect::<Result<_, _>>()?;
        Ok(Self { monomials }.simplify())
    }

    pub fn check(&self) -> Result<(), ExprError> {
        if self.monomials.is_empty() {
            return Err(ExprError::EmptyPolynomial);
        }
        self.monomials.iter().try_for_each(Monomial::check)
    }
}

impl From<Monomial> for Polynomial {
    fn from(monomial: Monomial) -> Self {
        Self {
            monomials: vec![monomial],
        }
    }
}

impl From<Variable> for Polynomial {
    fn from(variable: Variable) -> Self {
        Monomial::from(variable).into()
    }
}

impl From<K> for Polynomial {
    fn from(value: K) -> Self {
        Self::constant(value.0)
    }
}

impl std::fmt::Display for Polynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, monomial) in self.monomials.iter().enumerate() {
            if idx > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{monomial}")?;
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
    fn empty_polynomial_rejected() {
        assert_eq!(Polynomial::new(vec![]), Err(ExprError::EmptyPolynomial));
    }

    #[test]
    fn simplify_merges_in_first_occurrence_order() {
        let p = Polynomial::new(vec![
            Monomial::constant(0.0),
            Monomial::term(y(), 2.0),
            Monomial::term(x(), 1.0),
            Monomial::constant(4.0),
            Monomial::term(y(), 3.0),
        ])
        .unwrap();
        let s = p.simplify();
        let coeffs: Vec<f64> = s.monomials().iter().map(Monomial::coefficient).collect();
        assert_eq!(coeffs, vec![5.0, 1.0, 4.0]);
        assert_eq!(s.monomials()[0].linear_variable(), Some(&y()));
    }

    #[test]
    fn simplify_drops_cancelled_terms() {
        let p = Polynomial::new(vec![
            Monomial::term(x(), 2.0),
            Monomial::term(y(), 1.0),
            Monomial::term(x(), -2.0),
        ])
        .unwrap();
        let s = p.simplify();
        assert_eq!(s.len(), 1);
        assert_eq!(s.monomials()[0].linear_variable(), Some(&y()));
    }

    #[test]
    fn all_zero_simplifies_to_constant_zero() {
        let p =
            Polynomial::new(vec![Monomial::term(x(), 1.0), Monomial::term(x(), -1.0)]).unwrap();
        let s = p.simplify();
        assert_eq!(s, Polynomial::constant(0.0));
        assert!(p.is_zero());
    }

    #[test]
    fn simplify_is_idempotent() {
        let p = Polynomial::new(vec![
            Monomial::term(x(), 1.0),
            Monomial::constant(2.0),
            Monomial::term(x(), 3.0),
            Monomial::new(1.0, vec![(x(), 1), (y(), 1)]).unwrap(),
        ])
        .unwrap();
        let once = p.simplify();
        assert_eq!(once.simplify(), once);
    }

    #[test]
    fn constant_and_degree() {
        let p = Polynomial::new(vec![
            Monomial::constant(1.5),
            Monomial::new(2.0, vec![(x(), 2), (y(), 1)]).unwrap(),
            Monomial::constant(0.5),
        ])
        .unwrap();
        assert_eq!(p.constant_term(), 2.0);
        assert_eq!(p.total_degree(), 3);
        assert_eq!(p.variables(), vec![x(), y()]);
    }

    #[test]
    fn form_eq_ignores_order() {
        let a = Polynomial::linear(&[(x(), 1.0), (y(), 2.0)], 3.0);
        let b = Polynomial::new(vec![
            Monomial::constant(3.0),
            Monomial::term(y(), 2.0),
            Monomial::term(x(), 1.0),
        ])
        .unwrap();
        assert!(a.form_eq(&b));
        assert!(!a.form_eq(&Polynomial::linear(&[(x(), 1.0)], 3.0)));
    }

    #[test]
    fn product_expands_terms() {
        // (x + 1)(x - 1) = x^2 - 1
        let a = Polynomial::linear(&[(x(), 1.0)], 1.0);
        let b = Polynomial::linear(&[(x(), 1.0)], -1.0);
        let p = a.product(&b).unwrap();
        let expected = Polynomial::new(vec![
            Monomial::new(1.0, vec![(x(), 2)]).unwrap(),
            Monomial::constant(-1.0),
        ])
        .unwrap();
        assert!(p.form_eq(&expected));
    }

    #[test]
    fn linear_coefficient_sums_duplicates() {
        let p = Polynomial::new(vec![
            Monomial::term(x(), 1.0),
            Monomial::term(x(), 2.5),
            Monomial::new(7.0, vec![(x(), 2)]).unwrap(),
        ])
        .unwrap();
        assert_eq!(p.linear_coefficient_of(&x()), 3.5);
        assert_eq!(p.linear_coefficient_of(&y()), 0.0);
    }

    #[test]
    fn display_joins_terms() {
        let p = Polynomial::linear(&[(x(), 2.0)], 1.0);
        assert_eq!(p.to_string(), "2 x_1 + 1");
    }
}
