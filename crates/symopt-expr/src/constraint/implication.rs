//! Implication between linear constraints.
//!
//! Every scalar constraint is normalized to half-spaces `a x <= b` (an
//! equality gives two). A half-space `(a_t, b_t)` follows from `(a_s, b_s)`
//! when `a_t = lambda a_s` for some `lambda > 0` and `b_t >= lambda b_s`.

use std::collections::BTreeSet;

use crate::constraint::{ConstrSense, ScalarConstraint};
use crate::scalar::Variable;

const TOLERANCE: f64 = 1e-9;

struct HalfSpace {
    normal: Vec<f64>,
    bound: f64,
}

fn half_spaces(constraint: &ScalarConstraint, wrt: &[Variable]) -> Option<Vec<HalfSpace>> {
    if !constraint.is_linear() {
        return None;
    }
    let (row, constant) = constraint.linear_row("implies", wrt).ok()?;
    let upper = || HalfSpace {
        normal: row.clone(),
        bound: constant,
    };
    let lower = || HalfSpace {
        normal: row.iter().map(|c| -c).collect(),
        bound: -constant,
    };
    Some(match constraint.sense() {
        ConstrSense::LessThanEqual => vec![upper()],
        ConstrSense::GreaterThanEqual => vec![lower()],
        ConstrSense::Equal => vec![upper(), lower()],
    })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE * (1.0 + a.abs().max(b.abs()))
}

fn half_space_implies(source: &HalfSpace, target: &HalfSpace) -> bool {
    let pivot = source.normal.iter().position(|c| c.abs() > TOLERANCE);
    let Some(pivot) = pivot else {
        // `0 <= b_s`: infeasible when b_s < 0, otherwise carries no information.
        return source.bound < -TOLERANCE;
    };
    let lambda = target.normal[pivot] / source.normal[pivot];
    if lambda <= TOLERANCE {
        return false;
    }
    let parallel = source
        .normal
        .iter()
        .zip(&target.normal)
        .all(|(s, t)| close(lambda * s, *t));
    parallel && target.bound + TOLERANCE * (1.0 + target.bound.abs()) >= lambda * source.bound
}

fn target_is_trivial(target: &HalfSpace) -> bool {
    target.normal.iter().all(|c| c.abs() <= TOLERANCE) && target.bound >= -TOLERANCE
}

/// Whether satisfying `source` guarantees `target`.
pub(crate) fn scalar_implies(source: &ScalarConstraint, target: &ScalarConstraint) -> bool {
    let wrt: Vec<Variable> = source
        .variables()
        .into_iter()
        .chain(target.variables())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let (Some(sources), Some(targets)) = (half_spaces(source, &wrt), half_spaces(target, &wrt))
    else {
        return false;
    };
    targets.iter().all(|t| {
        target_is_trivial(t) || sources.iter().any(|s| half_space_implies(s, t))
    })
}

/// Every target must be implied by at least one source.
pub(crate) fn implies_all(sources: &[ScalarConstraint], targets: &[ScalarConstraint]) -> bool {
    !targets.is_empty()
        && targets
            .iter()
            .all(|t| sources.iter().any(|s| scalar_implies(s, t)))
}
