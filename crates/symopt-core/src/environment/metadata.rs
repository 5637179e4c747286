//! Variable naming and metadata.

use std::collections::BTreeMap;

use symopt_expr::VariableId;

use super::Environment;
use crate::error::EnvError;

impl Environment {
    /// Set name for a variable. Names are unique within an environment.
    pub fn set_variable_name(&mut self, id: VariableId, name: String) -> Result<(), EnvError> {
        self.ensure_variable_exists(id)?;
        match self.get_variable_by_name(&name) {
            Some(existing) if existing != id => {
                return Err(EnvError::DuplicateName { name, existing });
            }
            _ => {}
        }
        self.variable_names
            .get_or_insert_with(BTreeMap::new)
            .insert(id, name);
        Ok(())
    }

    /// Get name for a variable.
    pub fn get_variable_name(&self, id: VariableId) -> Option<&str> {
        self.variable_names
            .as_ref()
            .and_then(|names| names.get(&id).map(|s| s.as_str()))
    }

    /// Lookup a variable by name.
    pub fn get_variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variable_names.as_ref().and_then(|names| {
            names
                .iter()
                .find_map(|(id, value)| (value == name).then_some(*id))
        })
    }

    /// Set metadata for a variable.
    pub fn set_variable_metadata(
        &mut self,
        id: VariableId,
        metadata: serde_json::Value,
    ) -> Result<(), EnvError> {
        self.ensure_variable_exists(id)?;
        self.variable_metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(id, metadata);
        Ok(())
    }

    /// Get metadata for a variable.
    pub fn get_variable_metadata(&self, id: VariableId) -> Option<&serde_json::Value> {
        self.variable_metadata
            .as_ref()
            .and_then(|meta| meta.get(&id))
    }
}
