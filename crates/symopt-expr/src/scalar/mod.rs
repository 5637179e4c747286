//! Scalar expressions.
//!
//! - `constant`: K: a real constant
//! - `variable`: Variable: a decision variable, identified by ID
//! - `monomial`: Monomial: coefficient times variable powers
//! - `polynomial`: Polynomial: sum of monomials
//! - `algebra`: promotion lattice, arithmetic, calculus and substitution
//! - `ops`: operator overloads

mod algebra;
pub mod constant;
pub mod monomial;
mod ops;
pub mod polynomial;
pub mod variable;

use std::collections::BTreeSet;

pub use constant::K;
pub use monomial::Monomial;
pub use polynomial::Polynomial;
pub use variable::{Bounds, VarType, Variable};

use crate::error::ExprError;
use crate::expression::ExpressionLike;

/// Position of a kind in the promotion lattice.
///
/// Ordering follows the lattice: a collection holding several kinds is
/// concretized to the greatest one present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExprKind {
    K,
    Variable,
    Monomial,
    Polynomial,
}

impl ExprKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExprKind::K => "constant",
            ExprKind::Variable => "variable",
            ExprKind::Monomial => "monomial",
            ExprKind::Polynomial => "polynomial",
        }
    }
}

/// Behaviour shared by the four scalar kinds.
pub trait PolynomialLikeScalar: ExpressionLike + std::fmt::Display {
    const KIND: ExprKind;

    /// Constant part.
    fn constant(&self) -> f64;

    fn to_polynomial(&self) -> Polynomial;

    fn to_scalar(&self) -> ScalarExpr;

    /// Recover the concrete kind from a scalar of the same kind.
    fn from_scalar(value: ScalarExpr) -> Option<Self>;
}

/// Closed sum of the scalar kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarExpr {
    K(K),
    Variable(Variable),
    Monomial(Monomial),
    Polynomial(Polynomial),
}

impl ScalarExpr {
    pub fn kind(&self) -> ExprKind {
        match self {
            ScalarExpr::K(_) => ExprKind::K,
            ScalarExpr::Variable(_) => ExprKind::Variable,
            ScalarExpr::Monomial(_) => ExprKind::Monomial,
            ScalarExpr::Polynomial(_) => ExprKind::Polynomial,
        }
    }

    pub fn constant(&self) -> f64 {
        match self {
            ScalarExpr::K(k) => k.0,
            ScalarExpr::Variable(_) => 0.0,
            ScalarExpr::Monomial(m) if m.is_constant() => m.coefficient(),
            ScalarExpr::Monomial(_) => 0.0,
            ScalarExpr::Polynomial(p) => p.constant_term(),
        }
    }

    pub fn degree(&self) -> u32 {
        match self {
            ScalarExpr::K(_) => 0,
            ScalarExpr::Variable(_) => 1,
            ScalarExpr::Monomial(m) => m.total_degree(),
            ScalarExpr::Polynomial(p) => p.total_degree(),
        }
    }

    pub fn variables(&self) -> Vec<Variable> {
        match self {
            ScalarExpr::K(_) => Vec::new(),
            ScalarExpr::Variable(v) => vec![*v],
            ScalarExpr::Monomial(m) => m.variables(),
            ScalarExpr::Polynomial(p) => p.variables(),
        }
    }

    pub(crate) fn collect_variables(&self, into: &mut BTreeSet<Variable>) {
        match self {
            ScalarExpr::K(_) => {}
            ScalarExpr::Variable(v) => {
                into.insert(*v);
            }
            ScalarExpr::Monomial(m) => into.extend(m.factors().map(|(v, _)| *v)),
            ScalarExpr::Polynomial(p) => {
                for m in p.monomials() {
                    into.extend(m.factors().map(|(v, _)| *v));
                }
            }
        }
    }

    pub fn check(&self) -> Result<(), ExprError> {
        match self {
            ScalarExpr::K(_) => Ok(()),
            ScalarExpr::Variable(v) => v.check(),
            ScalarExpr::Monomial(m) => m.check(),
            ScalarExpr::Polynomial(p) => p.check(),
        }
    }

    /// Monomial view, when the expression is a single term.
    pub fn to_monomial(&self) -> Option<Monomial> {
        match self {
            ScalarExpr::K(k) => Some(Monomial::from(*k)),
            ScalarExpr::Variable(v) => Some(Monomial::from(*v)),
            ScalarExpr::Monomial(m) => Some(m.clone()),
            ScalarExpr::Polynomial(_) => None,
        }
    }

    pub fn to_polynomial(&self) -> Polynomial {
        match self {
            ScalarExpr::K(k) => Polynomial::from(*k),
            ScalarExpr::Variable(v) => Polynomial::from(*v),
            ScalarExpr::Monomial(m) => Polynomial::from(m.clone()),
            ScalarExpr::Polynomial(p) => p.clone(),
        }
    }

    /// Convert to the given kind. Fails when the target is below this
    /// expression in the lattice and the value cannot be represented there.
    pub fn promote_to(&self, kind: ExprKind) -> Option<ScalarExpr> {
        match (kind, self) {
            (ExprKind::K, ScalarExpr::K(_)) => Some(self.clone()),
            (ExprKind::K, _) => None,
            (ExprKind::Variable, ScalarExpr::Variable(_)) => Some(self.clone()),
            (ExprKind::Variable, _) => None,
            (ExprKind::Monomial, _) => self.to_monomial().map(ScalarExpr::Monomial),
            (ExprKind::Polynomial, _) => Some(ScalarExpr::Polynomial(self.to_polynomial())),
        }
    }

    /// True when the value is the constant zero in any representation.
    pub fn is_zero(&self) -> bool {
        match self {
            ScalarExpr::K(k) => k.0 == 0.0,
            ScalarExpr::Variable(_) => false,
            ScalarExpr::Monomial(m) => m.coefficient() == 0.0,
            ScalarExpr::Polynomial(p) => p.is_zero(),
        }
    }

    /// Order-independent equality of the canonical polynomial forms.
    pub fn form_eq(&self, other: &ScalarExpr) -> bool {
        self.to_polynomial().form_eq(&other.to_polynomial())
    }
}

impl From<f64> for ScalarExpr {
    fn from(value: f64) -> Self {
        ScalarExpr::K(K(value))
    }
}

impl From<K> for ScalarExpr {
    fn from(value: K) -> Self {
        ScalarExpr::K(value)
    }
}

impl From<Variable> for ScalarExpr {
    fn from(value: Variable) -> Self {
        ScalarExpr::Variable(value)
    }
}

impl From<Monomial> for ScalarExpr {
    fn from(value: Monomial) -> Self {
        ScalarExpr::Monomial(value)
    }
}

impl From<Polynomial> for ScalarExpr {
    fn from(value: Polynomial) -> Self {
        ScalarExpr::Polynomial(value)
    }
}

impl std::fmt::Display for ScalarExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarExpr::K(k) => write!(f, "{k}"),
            ScalarExpr::Variable(v) => write!(f, "{v}"),
            ScalarExpr::Monomial(m) => write!(f, "{m}"),
            ScalarExpr::Polynomial(p) => write!(f, "{p}"),
        }
    }
}

macro_rules! impl_polynomial_like_scalar {
    ($ty:ty, $kind:ident, $value:ident => $constant:expr) => {
        impl PolynomialLikeScalar for $ty {
            const KIND: ExprKind = ExprKind::$kind;

            fn constant(&self) -> f64 {
                let $value = self;
                $constant
            }

            fn to_polynomial(&self) -> Polynomial {
                Polynomial::from(self.clone())
            }

            fn to_scalar(&self) -> ScalarExpr {
                ScalarExpr::$kind(self.clone())
            }

            fn from_scalar(value: ScalarExpr) -> Option<Self> {
                match value {
                    ScalarExpr::$kind(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_polynomial_like_scalar!(K, K, k => k.0);
impl_polynomial_like_scalar!(Variable, Variable, _v => 0.0);
impl_polynomial_like_scalar!(Monomial, Monomial, m => if m.is_constant() { m.coefficient() } else { 0.0 });
impl_polynomial_like_scalar!(Polynomial, Polynomial, p => p.constant_term());

impl PolynomialLikeScalar for ScalarExpr {
    const KIND: ExprKind = ExprKind::Polynomial;

    fn constant(&self) -> f64 {
        ScalarExpr::constant(self)
    }

    fn to_polynomial(&self) -> Polynomial {
        ScalarExpr::to_polynomial(self)
    }

    fn to_scalar(&self) -> ScalarExpr {
        self.clone()
    }

    fn from_scalar(value: ScalarExpr) -> Option<Self> {
        Some(value)
    }
}
