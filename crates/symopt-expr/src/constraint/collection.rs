//! Vector and matrix constraints. Both sides always have the same shape;
//! scalar sides are broadcast before construction.

use crate::collection::{MatrixExpr, VectorExpr};
use crate::constraint::{ConstrSense, Constraint, ScalarConstraint, implication};
use crate::dims::Dims;
use crate::error::ExprError;
use crate::linear::LinearForm;
use crate::scalar::{ScalarExpr, Variable};

fn pair_up(lhs: Vec<ScalarExpr>, rhs: Vec<ScalarExpr>, sense: ConstrSense) -> Vec<ScalarConstraint> {
    lhs.into_iter()
        .zip(rhs)
        .map(|(l, r)| ScalarConstraint::new(l, r, sense))
        .collect()
}

fn stack(
    rows: &[ScalarConstraint],
    wrt: &[Variable],
    row_of: impl Fn(&ScalarConstraint, &[Variable]) -> Result<(Vec<f64>, f64), ExprError>,
) -> Result<LinearForm, ExprError> {
    let rows = rows
        .iter()
        .map(|c| row_of(c, wrt))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LinearForm::from_rows(rows, wrt.len()))
}

fn sides_of(rows: &[ScalarConstraint]) -> (Vec<ScalarExpr>, Vec<ScalarExpr>) {
    rows.iter()
        .map(|c| (c.lhs().clone(), c.rhs().clone()))
        .unzip()
}

fn check_same_shape(left: Dims, right: Dims) -> Result<(), ExprError> {
    if left == right {
        Ok(())
    } else {
        Err(ExprError::DimensionMismatch {
            operation: "compare",
            left,
            right,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorConstraint {
    lhs: VectorExpr,
    rhs: VectorExpr,
    sense: ConstrSense,
}

impl VectorConstraint {
    /// Both sides must have the same length.
    pub fn new(lhs: VectorExpr, rhs: VectorExpr, sense: ConstrSense) -> Result<Self, ExprError> {
        check_same_shape(lhs.dims(), rhs.dims())?;
        Ok(Self { lhs, rhs, sense })
    }

    pub fn lhs(&self) -> &VectorExpr {
        &self.lhs
    }

    pub fn rhs(&self) -> &VectorExpr {
        &self.rhs
    }

    pub fn sense(&self) -> ConstrSense {
        self.sense
    }

    pub fn len(&self) -> usize {
        self.lhs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lhs.is_empty()
    }

    pub fn dims(&self) -> Dims {
        self.lhs.dims()
    }

    pub fn check(&self) -> Result<(), ExprError> {
        self.lhs.check()?;
        self.rhs.check()?;
        check_same_shape(self.lhs.dims(), self.rhs.dims())
    }

    pub fn is_linear(&self) -> bool {
        self.lhs.degree() <= 1 && self.rhs.degree() <= 1
    }

    pub fn at_vec(&self, index: usize) -> Result<ScalarConstraint, ExprError> {
        Ok(ScalarConstraint::new(
            self.lhs.at_vec(index)?,
            self.rhs.at_vec(index)?,
            self.sense,
        ))
    }

    pub fn scalar_constraints(&self) -> Vec<ScalarConstraint> {
        pair_up(self.lhs.to_scalars(), self.rhs.to_scalars(), self.sense)
    }

    /// Entrywise [`ScalarConstraint::simplify`].
    pub fn simplify(&self) -> Result<VectorConstraint, ExprError> {
        let rows: Vec<ScalarConstraint> =
            self.scalar_constraints().iter().map(ScalarConstraint::simplify).collect();
        let (lhs, rhs) = sides_of(&rows);
        VectorConstraint::new(
            VectorExpr::from_scalars(&lhs)?,
            VectorExpr::from_scalars(&rhs)?,
            self.sense,
        )
    }

    /// One row per element.
    pub fn linear_inequality_constraint_representation(
        &self,
        wrt: &[Variable],
    ) -> Result<LinearForm, ExprError> {
        stack(&self.scalar_constraints(), wrt, ScalarConstraint::inequality_row)
    }

    pub fn linear_equality_constraint_representation(
        &self,
        wrt: &[Variable],
    ) -> Result<LinearForm, ExprError> {
        stack(&self.scalar_constraints(), wrt, ScalarConstraint::equality_row)
    }

    pub fn implies_this_is_also_satisfied(&self, other: &Constraint) -> bool {
        implication::implies_all(&self.scalar_constraints(), &other.scalar_constraints())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixConstraint {
    lhs: MatrixExpr,
    rhs: MatrixExpr,
    sense: ConstrSense,
}

impl MatrixConstraint {
    /// Both sides must have the same shape.
    pub fn new(lhs: MatrixExpr, rhs: MatrixExpr, sense: ConstrSense) -> Result<Self, ExprError> {
        check_same_shape(lhs.dims(), rhs.dims())?;
        Ok(Self { lhs, rhs, sense })
    }

    pub fn lhs(&self) -> &MatrixExpr {
        &self.lhs
    }

    pub fn rhs(&self) -> &MatrixExpr {
        &self.rhs
    }

    pub fn sense(&self) -> ConstrSense {
        self.sense
    }

    pub fn dims(&self) -> Dims {
        self.lhs.dims()
    }

    pub fn check(&self) -> Result<(), ExprError> {
        self.lhs.check()?;
        self.rhs.check()?;
        check_same_shape(self.lhs.dims(), self.rhs.dims())
    }

    pub fn is_linear(&self) -> bool {
        self.lhs.degree() <= 1 && self.rhs.degree() <= 1
    }

    pub fn at(&self, row: usize, col: usize) -> Result<ScalarConstraint, ExprError> {
        Ok(ScalarConstraint::new(
            self.lhs.at(row, col)?,
            self.rhs.at(row, col)?,
            self.sense,
        ))
    }

    /// Entries in row-major order.
    pub fn scalar_constraints(&self) -> Vec<ScalarConstraint> {
        pair_up(self.lhs.to_scalars(), self.rhs.to_scalars(), self.sense)
    }

    pub fn simplify(&self) -> Result<MatrixConstraint, ExprError> {
        let Dims { rows, cols } = self.dims();
        let simplified: Vec<ScalarConstraint> =
            self.scalar_constraints().iter().map(ScalarConstraint::simplify).collect();
        let (lhs, rhs) = sides_of(&simplified);
        MatrixConstraint::new(
            MatrixExpr::from_scalars(rows, cols, &lhs)?,
            MatrixExpr::from_scalars(rows, cols, &rhs)?,
            self.sense,
        )
    }

    /// One row per entry, row-major.
    pub fn linear_inequality_constraint_representation(
        &self,
        wrt: &[Variable],
    ) -> Result<LinearForm, ExprError> {
        stack(&self.scalar_constraints(), wrt, ScalarConstraint::inequality_row)
    }

    pub fn linear_equality_constraint_representation(
        &self,
        wrt: &[Variable],
    ) -> Result<LinearForm, ExprError> {
        stack(&self.scalar_constraints(), wrt, ScalarConstraint::equality_row)
    }

    pub fn implies_this_is_also_satisfied(&self, other: &Constraint) -> bool {
        implication::implies_all(&self.scalar_constraints(), &other.scalar_constraints())
    }
}

impl std::fmt::Display for VectorConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.sense, self.rhs)
    }
}

impl std::fmt::Display for MatrixConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.sense, self.rhs)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::collection::{KMatrix, KVector, Matrix, Vector};
    use crate::expression::ExpressionLike;
    use crate::ids::VariableId;

    fn var(i: u64) -> Variable {
        Variable::continuous(VariableId::new(i))
    }

    fn xs(n: u64) -> Vec<Variable> {
        (0..n).map(var).collect()
    }

    #[test]
    fn a_x_le_b_extracts_a_and_b() {
        let a = KMatrix::from_values(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let x = Vector::new(xs(2)).unwrap();
        let b = KVector::from_values(&[7.0, 8.0, 9.0]).unwrap();
        let constraint = a.multiply(&x).unwrap().less_eq(&b).unwrap();
        assert!(matches!(constraint, Constraint::Vector(_)));

        let form = constraint
            .linear_inequality_constraint_representation(&xs(2))
            .unwrap();
        assert_eq!(form.coefficients, a.to_dmatrix());
        assert_eq!(form.constants, b.to_dvector());
    }

    #[test]
    fn vector_ge_rows_are_negated() {
        let x = Vector::new(xs(2)).unwrap();
        let c = x.greater_eq(&1.0_f64).unwrap();
        let form = c.linear_inequality_constraint_representation(&xs(2)).unwrap();
        assert_eq!(form.coefficients[(0, 0)], -1.0);
        assert_eq!(form.coefficients[(1, 1)], -1.0);
        assert_eq!(form.constants.as_slice(), &[-1.0, -1.0]);
    }

    #[test]
    fn matrix_rows_are_row_major() {
        let x = Matrix::from_row_major(2, 2, xs(4)).unwrap();
        let c = x.equal_to(&KMatrix::ones(2, 2).unwrap()).unwrap();
        let form = c.linear_equality_constraint_representation(&xs(4)).unwrap();
        assert_eq!(form.num_rows(), 4);
        // entry (0, 1) is x_1
        assert_eq!(form.coefficients[(1, 1)], 1.0);
        assert_eq!(form.coefficients[(2, 2)], 1.0);
        assert!(c.linear_inequality_constraint_representation(&xs(4)).is_err());
    }

    #[test]
    fn entry_access() {
        let x = Matrix::from_row_major(2, 2, xs(4)).unwrap();
        let c = x.less_eq(&5.0_f64).unwrap();
        let entry = c.at(1, 0).unwrap();
        assert_eq!(entry.lhs(), &ScalarExpr::from(var(2)));
        assert!(c.at(2, 0).is_err());
    }

    #[test]
    fn simplify_is_entrywise() {
        let x = Vector::new(xs(2)).unwrap();
        let shifted = x.plus(&3.0_f64).unwrap();
        let c = shifted.less_eq(&10.0_f64).unwrap().simplify().unwrap();
        assert_eq!(c.rhs().constants(), vec![7.0, 7.0]);
        assert_eq!(c.lhs().constants(), vec![0.0, 0.0]);
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let l = VectorExpr::from(KVector::ones(2).unwrap());
        let r = VectorExpr::from(KVector::ones(3).unwrap());
        assert!(VectorConstraint::new(l, r, ConstrSense::Equal).is_err());
    }
}
