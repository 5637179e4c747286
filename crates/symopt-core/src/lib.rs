//! Variable environments and constraint-system compilation on top of
//! `symopt-expr`.

pub mod compile;
pub mod config;
pub mod environment;
pub mod error;
pub mod logging;

pub use compile::{CompiledSystem, ConstraintSystem};
pub use config::{CompileOptions, SimplifyLevel, VariableOrdering};
pub use environment::Environment;
pub use error::{CompileError, EnvError, LoggingError};
pub use logging::enable_logging;
