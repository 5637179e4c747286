//! Shapes and the dimension predicates shared by every operation.

use crate::error::ExprError;

/// Row/column shape of an expression. Scalars are `(1, 1)`, vectors `(n, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    pub rows: usize,
    pub cols: usize,
}

impl Dims {
    pub const SCALAR: Dims = Dims { rows: 1, cols: 1 };

    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn is_scalar(self) -> bool {
        self == Self::SCALAR
    }

    pub fn is_square(self) -> bool {
        self.rows == self.cols
    }

    pub fn len(self) -> usize {
        self.rows * self.cols
    }

    pub fn transposed(self) -> Self {
        Self {
            rows: self.cols,
            cols: self.rows,
        }
    }
}

impl std::fmt::Display for Dims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}

/// Addition and comparison need equal shapes unless one side is a scalar.
pub fn check_dimensions_in_addition(
    operation: &'static str,
    left: Dims,
    right: Dims,
) -> Result<(), ExprError> {
    if left == right || left.is_scalar() || right.is_scalar() {
        Ok(())
    } else {
        Err(ExprError::DimensionMismatch {
            operation,
            left,
            right,
        })
    }
}

/// Multiplication needs `left.cols == right.rows` unless one side is a scalar.
pub fn check_dimensions_in_multiplication(
    operation: &'static str,
    left: Dims,
    right: Dims,
) -> Result<(), ExprError> {
    if left.cols == right.rows || left.is_scalar() || right.is_scalar() {
        Ok(())
    } else {
        Err(ExprError::DimensionMismatch {
            operation,
            left,
            right,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_allows_scalar_broadcast() {
        assert!(check_dimensions_in_addition("plus", Dims::SCALAR, Dims::new(3, 2)).is_ok());
        assert!(check_dimensions_in_addition("plus", Dims::new(3, 2), Dims::SCALAR).is_ok());
    }

    #[test]
    fn addition_rejects_shape_mismatch() {
        let err = check_dimensions_in_addition("plus", Dims::new(2, 1), Dims::new(3, 1))
            .unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("(2, 1)"));
        assert!(rendered.contains("(3, 1)"));
        assert!(rendered.contains("plus"));
    }

    #[test]
    fn multiplication_checks_inner_dimension() {
        assert!(
            check_dimensions_in_multiplication("multiply", Dims::new(2, 3), Dims::new(3, 4))
                .is_ok()
        );
        assert!(
            check_dimensions_in_multiplication("multiply", Dims::new(2, 3), Dims::new(2, 3))
                .is_err()
        );
    }

    #[test]
    fn transposed_swaps_axes() {
        assert_eq!(Dims::new(2, 5).transposed(), Dims::new(5, 2));
    }
}
