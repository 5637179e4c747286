//! Operator overloads for scalar kinds.
//!
//! Sums, differences, negation and scaling by an `f64` cannot fail, so these
//! return plain [`ScalarExpr`] values. Products of two expressions can
//! overflow an exponent and go through [`ScalarExpr::multiply_scalar`] or
//! [`crate::ExpressionLike`] instead.

use std::ops::{Add, Mul, Neg, Sub};

use crate::scalar::{K, Monomial, Polynomial, ScalarExpr, Variable};

macro_rules! impl_scalar_ops {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<R: Into<ScalarExpr>> Add<R> for $ty {
                type Output = ScalarExpr;

                fn add(self, rhs: R) -> Self::Output {
                    ScalarExpr::from(self).plus_scalar(&rhs.into())
                }
            }

            impl<R: Into<ScalarExpr>> Sub<R> for $ty {
                type Output = ScalarExpr;

                fn sub(self, rhs: R) -> Self::Output {
                    ScalarExpr::from(self).minus_scalar(&rhs.into())
                }
            }

            impl Mul<f64> for $ty {
                type Output = ScalarExpr;

                fn mul(self, rhs: f64) -> Self::Output {
                    ScalarExpr::from(self).scale(rhs)
                }
            }

            impl Neg for $ty {
                type Output = ScalarExpr;

                fn neg(self) -> Self::Output {
                    ScalarExpr::from(self).negate()
                }
            }

            impl Add<$ty> for f64 {
                type Output = ScalarExpr;

                fn add(self, rhs: $ty) -> Self::Output {
                    ScalarExpr::from(self).plus_scalar(&ScalarExpr::from(rhs))
                }
            }

            impl Sub<$ty> for f64 {
                type Output = ScalarExpr;

                fn sub(self, rhs: $ty) -> Self::Output {
                    ScalarExpr::from(self).minus_scalar(&ScalarExpr::from(rhs))
                }
            }

            impl Mul<$ty> for f64 {
                type Output = ScalarExpr;

                fn mul(self, rhs: $ty) -> Self::Output {
                    ScalarExpr::from(rhs).scale(self)
                }
            }
        )*
    };
}

impl_scalar_ops!(K, Variable, Monomial, Polynomial, ScalarExpr);
