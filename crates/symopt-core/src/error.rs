//! Environment and compilation errors.

use symopt_expr::{ExprError, VariableId};

/// Errors raised by the variable environment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnvError {
    #[error("[ENV_INVALID_VARIABLE_ID] Variable ID {0} does not exist")]
    InvalidVariableId(VariableId),

    #[error("[ENV_INVALID_VARIABLE_BOUNDS] Variable bounds invalid: lower ({lower}) > upper ({upper})")]
    InvalidVariableBounds { lower: f64, upper: f64 },

    #[error(
        "[ENV_INVALID_BINARY_BOUNDS] Binary variable bounds must lie in [0, 1] (got [{lower}, {upper}])"
    )]
    InvalidBinaryBounds { lower: f64, upper: f64 },

    #[error("[ENV_DUPLICATE_NAME] Name {name:?} is already used by variable {existing}")]
    DuplicateName { name: String, existing: VariableId },

    #[error("[ENV_EMPTY_COLLECTION] A variable {kind} needs at least one element")]
    EmptyCollection { kind: &'static str },

    #[error("[ENV_IDS_EXHAUSTED] Environment {name:?} has no variable IDs left")]
    IdsExhausted { name: String },
}

impl EnvError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            EnvError::InvalidVariableId(_) => "ENV_INVALID_VARIABLE_ID",
            EnvError::InvalidVariableBounds { .. } => "ENV_INVALID_VARIABLE_BOUNDS",
            EnvError::InvalidBinaryBounds { .. } => "ENV_INVALID_BINARY_BOUNDS",
            EnvError::DuplicateName { .. } => "ENV_DUPLICATE_NAME",
            EnvError::EmptyCollection { .. } => "ENV_EMPTY_COLLECTION",
            EnvError::IdsExhausted { .. } => "ENV_IDS_EXHAUSTED",
        }
    }
}

/// Errors raised while compiling a constraint system.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Expr(#[from] ExprError),

    #[error("[COMPILE_UNKNOWN_VARIABLE] Constraint {constraint} references variable {id}, which is not in the environment")]
    UnknownVariable { constraint: usize, id: VariableId },

    #[error(
        "[COMPILE_TRIVIALLY_INFEASIBLE] Row {row} of constraint {constraint} has no variables and is violated: {detail}"
    )]
    TriviallyInfeasible {
        constraint: usize,
        row: usize,
        detail: String,
    },

    #[error("[COMPILE_INVALID_TOLERANCE] Tolerance must be finite and non-negative (got {value})")]
    InvalidTolerance { value: f64 },

    #[error("[COMPILE_POINT_LENGTH] Point has {found} entries, expected {expected}")]
    PointLength { expected: usize, found: usize },
}

impl CompileError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::Expr(err) => err.code(),
            CompileError::UnknownVariable { .. } => "COMPILE_UNKNOWN_VARIABLE",
            CompileError::TriviallyInfeasible { .. } => "COMPILE_TRIVIALLY_INFEASIBLE",
            CompileError::InvalidTolerance { .. } => "COMPILE_INVALID_TOLERANCE",
            CompileError::PointLength { .. } => "COMPILE_POINT_LENGTH",
        }
    }
}

/// Errors raised while installing the logging subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("[LOG_INVALID_FILTER] Invalid log filter {filter:?}: {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("[LOG_INVALID_FORMAT] Invalid SYMOPT_LOG_FORMAT {found:?} (expected 'json' or 'pretty')")]
    InvalidFormat { found: String },

    #[error("[LOG_FILE] Failed to open log file {path:?}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[LOG_INIT] Failed to initialize logging: {message}")]
    Init { message: String },
}

impl LoggingError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            LoggingError::InvalidFilter { .. } => "LOG_INVALID_FILTER",
            LoggingError::InvalidFormat { .. } => "LOG_INVALID_FORMAT",
            LoggingError::LogFile { .. } => "LOG_FILE",
            LoggingError::Init { .. } => "LOG_INIT",
        }
    }
}
