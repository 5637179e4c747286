//! Decision variables.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::error::ExprError;
use crate::ids::VariableId;

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Continuous,
    Binary,
    Integer,
}

impl VarType {
    pub fn as_str(self) -> &'static str {
        match self {
            VarType::Continuous => "continuous",
            VarType::Binary => "binary",
            VarType::Integer => "integer",
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(self, VarType::Binary | VarType::Integer)
    }
}

/// Bounds for a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// `(-inf, +inf)`.
    pub fn free() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// `[0, 1]`.
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::free()
    }
}

/// A decision variable.
///
/// Identity is the ID alone: two variables with the same ID compare equal
/// (and hash and order identically) even if their bounds differ.
#[derive(Debug, Clone, Copy)]
pub struct Variable {
    pub id: VariableId,
    pub bounds: Bounds,
    pub var_type: VarType,
}

impl Variable {
    pub fn new(id: VariableId, var_type: VarType, bounds: Bounds) -> Self {
        Self {
            id,
            bounds,
            var_type,
        }
    }

    /// Continuous variable with free bounds.
    pub fn continuous(id: VariableId) -> Self {
        Self::new(id, VarType::Continuous, Bounds::free())
    }

    /// Binary variable with bounds `[0, 1]`.
    pub fn binary(id: VariableId) -> Self {
        Self::new(id, VarType::Binary, Bounds::unit())
    }

    /// Integer variable with the given bounds.
    pub fn integer(id: VariableId, bounds: Bounds) -> Self {
        Self::new(id, VarType::Integer, bounds)
    }

    pub fn lower(&self) -> f64 {
        self.bounds.lower
    }

    pub fn upper(&self) -> f64 {
        self.bounds.upper
    }

    pub fn check(&self) -> Result<(), ExprError> {
        let Bounds { lower, upper } = self.bounds;
        let invalid = || ExprError::InvalidVariableBounds {
            id: self.id,
            lower,
            upper,
        };
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(invalid());
        }
        if self.var_type == VarType::Binary && (lower < 0.0 || upper > 1.0) {
            return Err(invalid());
        }
        Ok(())
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x_{}", self.id)
    }
}
