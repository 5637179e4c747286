//! Expression errors.

use crate::constraint::ConstrSense;
use crate::dims::Dims;
use crate::ids::VariableId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error("[EXPR_INVALID_MONOMIAL] Monomial is malformed: {reason}")]
    InvalidMonomial { reason: String },

    #[error("[EXPR_EMPTY_POLYNOMIAL] Polynomial must contain at least one monomial")]
    EmptyPolynomial,

    #[error("[EXPR_EMPTY_COLLECTION] {kind} must contain at least one element")]
    EmptyCollection { kind: &'static str },

    #[error("[EXPR_RAGGED_MATRIX] Matrix row {row} has {found} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "[EXPR_INVALID_VARIABLE_BOUNDS] Variable x_{id} has invalid bounds: lower ({lower}) > upper ({upper})"
    )]
    InvalidVariableBounds { id: VariableId, lower: f64, upper: f64 },

    #[error("[EXPR_INVALID_SENSE] Unrecognized constraint sense {found:?}")]
    InvalidSense { found: String },

    #[error(
        "[EXPR_DIMENSION_MISMATCH] Cannot {operation} expressions of dimensions {left} and {right}"
    )]
    DimensionMismatch {
        operation: &'static str,
        left: Dims,
        right: Dims,
    },

    #[error("[EXPR_UNSUPPORTED_OPERAND] {operation} does not accept a {operand} operand")]
    UnsupportedOperand {
        operation: &'static str,
        operand: &'static str,
    },

    #[error(
        "[EXPR_LINEAR_REQUIRED] {operation} requires a linear expression, but the {side} has degree {degree}"
    )]
    NonLinear {
        operation: &'static str,
        side: &'static str,
        degree: u32,
    },

    #[error("[EXPR_EQUALITY_REQUIRED] Expected an equality constraint, found sense {found}")]
    EqualityRequired { found: ConstrSense },

    #[error("[EXPR_INEQUALITY_REQUIRED] Expected an inequality constraint, found sense {found}")]
    InequalityRequired { found: ConstrSense },

    #[error("[EXPR_NEGATIVE_EXPONENT] Exponent must be non-negative (got {exponent})")]
    NegativeExponent { exponent: i64 },

    #[error(
        "[EXPR_EXPONENT_OVERFLOW] {operation} yields exponent {exponent}, above the maximum of {max}",
        max = u32::MAX
    )]
    ExponentOverflow {
        operation: &'static str,
        exponent: u64,
    },

    #[error("[EXPR_INDEX_OUT_OF_RANGE] Index {index:?} is out of range for dimensions {dims}")]
    IndexOutOfRange { index: (usize, usize), dims: Dims },

    #[error("[EXPR_VARIABLE_NOT_IN_ORDERING] Variable x_{id} is not part of the requested ordering")]
    VariableNotInOrdering { id: VariableId },

    #[error("[EXPR_DUPLICATE_IN_ORDERING] Variable x_{id} appears more than once in the ordering")]
    DuplicateInOrdering { id: VariableId },

    #[error("[EXPR_LENGTH_MISMATCH] {kind} of dimensions {dims} needs {expected} entries, got {found}")]
    LengthMismatch {
        kind: &'static str,
        dims: Dims,
        expected: usize,
        found: usize,
    },
}

impl ExprError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ExprError::InvalidMonomial { .. } => "EXPR_INVALID_MONOMIAL",
            ExprError::EmptyPolynomial => "EXPR_EMPTY_POLYNOMIAL",
            ExprError::EmptyCollection { .. } => "EXPR_EMPTY_COLLECTION",
            ExprError::RaggedMatrix { .. } => "EXPR_RAGGED_MATRIX",
            ExprError::InvalidVariableBounds { .. } => "EXPR_INVALID_VARIABLE_BOUNDS",
            ExprError::InvalidSense { .. } => "EXPR_INVALID_SENSE",
            ExprError::DimensionMismatch { .. } => "EXPR_DIMENSION_MISMATCH",
            ExprError::UnsupportedOperand { .. } => "EXPR_UNSUPPORTED_OPERAND",
            ExprError::NonLinear { .. } => "EXPR_LINEAR_REQUIRED",
            ExprError::EqualityRequired { .. } => "EXPR_EQUALITY_REQUIRED",
            ExprError::InequalityRequired { .. } => "EXPR_INEQUALITY_REQUIRED",
            ExprError::NegativeExponent { .. } => "EXPR_NEGATIVE_EXPONENT",
            ExprError::ExponentOverflow { .. } => "EXPR_EXPONENT_OVERFLOW",
            ExprError::IndexOutOfRange { .. } => "EXPR_INDEX_OUT_OF_RANGE",
            ExprError::VariableNotInOrdering { .. } => "EXPR_VARIABLE_NOT_IN_ORDERING",
            ExprError::DuplicateInOrdering { .. } => "EXPR_DUPLICATE_IN_ORDERING",
            ExprError::LengthMismatch { .. } => "EXPR_LENGTH_MISMATCH",
        }
    }

    /// True for errors raised by shape checks.
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, ExprError::DimensionMismatch { .. })
    }
}
