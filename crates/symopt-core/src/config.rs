//! Compilation options.

/// How much clean-up compilation performs on constant rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimplifyLevel {
    /// Keep every row, including variable-free ones, as zero rows.
    #[default]
    None,
    /// Drop satisfied variable-free rows and reject violated ones.
    Light,
}

impl SimplifyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SimplifyLevel::None => "none",
            SimplifyLevel::Light => "light",
        }
    }
}

/// Column order of the compiled matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariableOrdering {
    /// Every environment variable, in ID order.
    #[default]
    Environment,
    /// Only variables some constraint references, in ID order.
    Referenced,
}

impl VariableOrdering {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableOrdering::Environment => "environment",
            VariableOrdering::Referenced => "referenced",
        }
    }
}

/// Options for [`crate::ConstraintSystem::compile`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileOptions {
    /// Coefficients with `|c| <= zero_tolerance` are written as `0`.
    pub zero_tolerance: Option<f64>,
    pub simplify: Option<SimplifyLevel>,
    pub ordering: Option<VariableOrdering>,
}

impl CompileOptions {
    /// Create options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zero_tolerance(mut self, tolerance: f64) -> Self {
        self.zero_tolerance = Some(tolerance);
        self
    }

    pub fn with_simplify(mut self, level: SimplifyLevel) -> Self {
        self.simplify = Some(level);
        self
    }

    pub fn with_ordering(mut self, ordering: VariableOrdering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    /// True when no option is set.
    pub fn is_empty(&self) -> bool {
        self.zero_tolerance.is_none() && self.simplify.is_none() && self.ordering.is_none()
    }

    pub(crate) fn tolerance(&self) -> f64 {
        self.zero_tolerance.unwrap_or(0.0)
    }

    pub(crate) fn simplify_level(&self) -> SimplifyLevel {
        self.simplify.unwrap_or_default()
    }

    pub(crate) fn variable_ordering(&self) -> VariableOrdering {
        self.ordering.unwrap_or_default()
    }
}
