//! Variable environment.
//!
//! The [`Environment`] is the only source of variable IDs. It is passed
//! explicitly wherever variables are created, so two environments never
//! share state and a fresh one always starts from the same ID.
//!
//! - [`metadata`]: variable names and JSON metadata

mod metadata;

use std::collections::BTreeMap;

use symopt_expr::{Bounds, Matrix, VarType, Variable, VariableId, VariableMatrix, VariableVector, Vector};

use crate::error::EnvError;

/// Registry that allocates variables with sequential IDs.
#[derive(Debug, Clone)]
pub struct Environment {
    name: String,
    pub(crate) variables: BTreeMap<VariableId, Variable>,
    // `None` once `u64::MAX` has been issued
    next_variable_id: Option<u64>,
    // Lazy-allocated metadata storage
    pub(crate) variable_names: Option<BTreeMap<VariableId, String>>,
    pub(crate) variable_metadata: Option<BTreeMap<VariableId, serde_json::Value>>,
}

impl Environment {
    /// Create an empty environment that issues IDs from `0`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_first_id(name, 0)
    }

    /// Create an empty environment that issues IDs from `first_id`.
    pub fn with_first_id(name: impl Into<String>, first_id: u64) -> Self {
        Self {
            name: name.into(),
            variables: BTreeMap::new(),
            next_variable_id: Some(first_id),
            variable_names: None,
            variable_metadata: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a variable with the next unused ID.
    ///
    /// Bounds are validated before an ID is consumed.
    pub fn add_variable(&mut self, var_type: VarType, bounds: Bounds) -> Result<Variable, EnvError> {
        let Some(raw_id) = self.next_variable_id else {
            let err = EnvError::IdsExhausted {
                name: self.name.clone(),
            };
            tracing::error!(
                component = "environment",
                operation = "add_variable",
                status = "error",
                environment = %self.name,
                "{err}"
            );
            return Err(err);
        };
        let id = VariableId::new(raw_id);
        let variable = Variable::new(id, var_type, bounds);
        if variable.check().is_err() {
            let err = bounds_error(var_type, bounds);
            tracing::error!(
                component = "environment",
                operation = "add_variable",
                status = "error",
                environment = %self.name,
                var_type = var_type.as_str(),
                "{err}"
            );
            return Err(err);
        }

        self.next_variable_id = raw_id.checked_add(1);
        self.variables.insert(id, variable);
        tracing::debug!(
            component = "environment",
            operation = "add_variable",
            status = "success",
            environment = %self.name,
            variable_id = id.inner(),
            var_type = var_type.as_str(),
            "Added variable"
        );
        Ok(variable)
    }

    /// Continuous variable with free bounds.
    pub fn new_continuous_variable(&mut self) -> Result<Variable, EnvError> {
        self.add_variable(VarType::Continuous, Bounds::free())
    }

    pub fn new_continuous_variable_with_bounds(
        &mut self,
        lower: f64,
        upper: f64,
    ) -> Result<Variable, EnvError> {
        self.add_variable(VarType::Continuous, Bounds::new(lower, upper))
    }

    /// Binary variable with bounds `[0, 1]`.
    pub fn new_binary_variable(&mut self) -> Result<Variable, EnvError> {
        self.add_variable(VarType::Binary, Bounds::unit())
    }

    pub fn new_integer_variable(&mut self, lower: f64, upper: f64) -> Result<Variable, EnvError> {
        self.add_variable(VarType::Integer, Bounds::new(lower, upper))
    }

    /// `len` fresh variables sharing a type and bounds.
    pub fn new_variable_vector(
        &mut self,
        len: usize,
        var_type: VarType,
        bounds: Bounds,
    ) -> Result<VariableVector, EnvError> {
        if len == 0 {
            return Err(EnvError::EmptyCollection { kind: "vector" });
        }
        let elements = (0..len)
            .map(|_| self.add_variable(var_type, bounds))
            .collect::<Result<Vec<_>, _>>()?;
        Vector::new(elements).map_err(|_| EnvError::EmptyCollection { kind: "vector" })
    }

    /// `rows x cols` fresh variables, allocated in row-major order.
    pub fn new_variable_matrix(
        &mut self,
        rows: usize,
        cols: usize,
        var_type: VarType,
        bounds: Bounds,
    ) -> Result<VariableMatrix, EnvError> {
        if rows == 0 || cols == 0 {
            return Err(EnvError::EmptyCollection { kind: "matrix" });
        }
        let data = (0..rows * cols)
            .map(|_| self.add_variable(var_type, bounds))
            .collect::<Result<Vec<_>, _>>()?;
        Matrix::from_row_major(rows, cols, data)
            .map_err(|_| EnvError::EmptyCollection { kind: "matrix" })
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// All variables in ID order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    pub fn get_variable(&self, id: VariableId) -> Result<&Variable, EnvError> {
        self.variables
            .get(&id)
            .ok_or(EnvError::InvalidVariableId(id))
    }

    pub fn contains(&self, id: VariableId) -> bool {
        self.variables.contains_key(&id)
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), EnvError> {
        if self.variables.contains_key(&id) {
            Ok(())
        } else {
            Err(EnvError::InvalidVariableId(id))
        }
    }
}

/// Error for bounds that `Variable::check` rejected: ordered bounds outside
/// `[0, 1]` on a binary variable are reported as such.
fn bounds_error(var_type: VarType, bounds: Bounds) -> EnvError {
    let Bounds { lower, upper } = bounds;
    let ordered = !lower.is_nan() && !upper.is_nan() && lower <= upper;
    if var_type == VarType::Binary && ordered {
        EnvError::InvalidBinaryBounds { lower, upper }
    } else {
        EnvError::InvalidVariableBounds { lower, upper }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new("default")
    }
}
