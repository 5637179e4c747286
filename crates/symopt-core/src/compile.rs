//! Compilation of a constraint system into stacked linear forms.

use std::collections::BTreeSet;
use std::time::Instant;

use nalgebra::{DMatrix, DVector};
use symopt_expr::{ConstrSense, Constraint, ExprError, LinearForm, ScalarConstraint, Variable};

use crate::config::{CompileOptions, SimplifyLevel, VariableOrdering};
use crate::environment::Environment;
use crate::error::CompileError;

/// An ordered collection of constraints awaiting compilation.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSystem {
    constraints: Vec<Constraint>,
}

impl ConstraintSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a constraint, returning its index.
    pub fn add(&mut self, constraint: Constraint) -> Result<usize, ExprError> {
        if let Err(err) = constraint.check() {
            tracing::error!(
                component = "system",
                operation = "add",
                status = "error",
                "{err}"
            );
            return Err(err);
        }
        self.constraints.push(constraint);
        Ok(self.constraints.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Stack every inequality row into `A x <= b` and every equality row
    /// into `C x = d`, with columns in the order chosen by `options`.
    pub fn compile(
        &self,
        env: &Environment,
        options: &CompileOptions,
    ) -> Result<CompiledSystem, CompileError> {
        let started = Instant::now();
        let result = self.compile_rows(env, options);
        match &result {
            Ok(system) => tracing::debug!(
                component = "system",
                operation = "compile",
                status = "success",
                constraints = self.constraints.len(),
                variables = system.variables.len(),
                inequalities = system.num_inequalities(),
                equalities = system.num_equalities(),
                simplify_level = options.simplify_level().as_str(),
                ordering = options.variable_ordering().as_str(),
                duration_ms = started.elapsed().as_secs_f64() * 1000.0,
                "Compiled constraint system"
            ),
            Err(err) => tracing::error!(
                component = "system",
                operation = "compile",
                status = "error",
                code = err.code(),
                "{err}"
            ),
        }
        result
    }

    fn compile_rows(
        &self,
        env: &Environment,
        options: &CompileOptions,
    ) -> Result<CompiledSystem, CompileError> {
        let tolerance = options.tolerance();
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(CompileError::InvalidTolerance { value: tolerance });
        }

        let variables = self.ordering(env, options.variable_ordering())?;
        let mut inequalities = RowStack::default();
        let mut equalities = RowStack::default();

        for (index, constraint) in self.constraints.iter().enumerate() {
            for (row, scalar) in constraint.scalar_constraints().iter().enumerate() {
                let (stack, (mut coefficients, bound)) = match scalar.sense() {
                    ConstrSense::Equal => (&mut equalities, equality_row(scalar, &variables)?),
                    _ => (&mut inequalities, inequality_row(scalar, &variables)?),
                };
                for value in coefficients.iter_mut() {
                    if value.abs() <= tolerance {
                        *value = 0.0;
                    }
                }
                if options.simplify_level() == SimplifyLevel::Light
                    && coefficients.iter().all(|c| *c == 0.0)
                {
                    check_constant_row(scalar.sense(), bound, tolerance).map_err(|detail| {
                        CompileError::TriviallyInfeasible {
                            constraint: index,
                            row,
                            detail,
                        }
                    })?;
                    continue;
                }
                stack.push(coefficients, bound);
            }
        }

        let num_cols = variables.len();
        Ok(CompiledSystem {
            a: inequalities.coefficients(num_cols),
            b: inequalities.bounds(),
            c: equalities.coefficients(num_cols),
            d: equalities.bounds(),
            variables,
        })
    }

    /// Column variables, in ascending ID order.
    fn ordering(
        &self,
        env: &Environment,
        ordering: VariableOrdering,
    ) -> Result<Vec<Variable>, CompileError> {
        let mut referenced = BTreeSet::new();
        for (index, constraint) in self.constraints.iter().enumerate() {
            for variable in constraint.variables() {
                if !env.contains(variable.id) {
                    return Err(CompileError::UnknownVariable {
                        constraint: index,
                        id: variable.id,
                    });
                }
                referenced.insert(variable.id);
            }
        }
        Ok(match ordering {
            VariableOrdering::Environment => env.variables().copied().collect(),
            VariableOrdering::Referenced => env
                .variables()
                .filter(|v| referenced.contains(&v.id))
                .copied()
                .collect(),
        })
    }
}

fn inequality_row(
    constraint: &ScalarConstraint,
    wrt: &[Variable],
) -> Result<(Vec<f64>, f64), ExprError> {
    Ok(single_row(constraint.linear_inequality_constraint_representation(wrt)?))
}

fn equality_row(
    constraint: &ScalarConstraint,
    wrt: &[Variable],
) -> Result<(Vec<f64>, f64), ExprError> {
    Ok(single_row(constraint.linear_equality_constraint_representation(wrt)?))
}

fn single_row(form: LinearForm) -> (Vec<f64>, f64) {
    let row = form.coefficients.row(0).iter().copied().collect();
    (row, form.constants[0])
}

/// `0 <= bound` or `0 = bound`; `Err` carries the violated relation.
fn check_constant_row(sense: ConstrSense, bound: f64, tolerance: f64) -> Result<(), String> {
    let satisfied = match sense {
        ConstrSense::Equal => bound.abs() <= tolerance,
        _ => bound >= -tolerance,
    };
    if satisfied {
        Ok(())
    } else {
        let symbol = if sense == ConstrSense::Equal { "=" } else { "<=" };
        Err(format!("0 {symbol} {bound}"))
    }
}

#[derive(Default)]
struct RowStack {
    data: Vec<f64>,
    bounds: Vec<f64>,
}

impl RowStack {
    fn push(&mut self, coefficients: Vec<f64>, bound: f64) {
        self.data.extend(coefficients);
        self.bounds.push(bound);
    }

    fn coefficients(&self, num_cols: usize) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.bounds.len(), num_cols, &self.data)
    }

    fn bounds(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.bounds)
    }
}

/// `A x <= b`, `C x = d` over [`CompiledSystem::variables`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSystem {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: DMatrix<f64>,
    d: DVector<f64>,
    variables: Vec<Variable>,
}

impl CompiledSystem {
    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    pub fn c(&self) -> &DMatrix<f64> {
        &self.c
    }

    pub fn d(&self) -> &DVector<f64> {
        &self.d
    }

    /// Column variables in matrix order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn num_inequalities(&self) -> usize {
        self.b.len()
    }

    pub fn num_equalities(&self) -> usize {
        self.d.len()
    }

    /// Whether `point` (one value per column variable) satisfies every row
    /// and every variable bound within `tolerance`.
    pub fn is_feasible_point(&self, point: &[f64], tolerance: f64) -> Result<bool, CompileError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(CompileError::InvalidTolerance { value: tolerance });
        }
        if point.len() != self.variables.len() {
            return Err(CompileError::PointLength {
                expected: self.variables.len(),
                found: point.len(),
            });
        }

        let within_bounds = self.variables.iter().zip(point).all(|(v, x)| {
            *x >= v.bounds.lower - tolerance && *x <= v.bounds.upper + tolerance
        });
        if !within_bounds {
            return Ok(false);
        }

        let x = DVector::from_column_slice(point);
        let slack = &self.a * &x - &self.b;
        let residual = &self.c * &x - &self.d;
        Ok(slack.iter().all(|s| *s <= tolerance) && residual.iter().all(|r| r.abs() <= tolerance))
    }
}
