use std::collections::HashMap;

use proptest::prelude::*;
use symopt_expr::{K, Monomial, Polynomial, ScalarExpr, Variable, VariableId};

fn var(i: u64) -> Variable {
    Variable::continuous(VariableId::new(i))
}

/// Monomial over `x_0..x_2` with a positive integer coefficient.
fn monomial() -> impl Strategy<Value = Monomial> {
    (1i32..6, prop::collection::vec(0u32..3, 3)).prop_map(|(coef, exps)| {
        let factors = exps
            .into_iter()
            .enumerate()
            .filter(|(_, e)| *e > 0)
            .map(|(i, e)| (var(i as u64), e))
            .collect();
        Monomial::new(f64::from(coef), factors).expect("factors are unique and positive")
    })
}

fn scalar() -> impl Strategy<Value = ScalarExpr> {
    prop_oneof![
        (1i32..6).prop_map(|c| ScalarExpr::K(K(f64::from(c)))),
        (0u64..3).prop_map(|i| ScalarExpr::Variable(var(i))),
        monomial().prop_map(ScalarExpr::Monomial),
        prop::collection::vec(monomial(), 1..5)
            .prop_map(|ms| ScalarExpr::Polynomial(Polynomial::new(ms).expect("non-empty"))),
    ]
}

proptest! {
    #[test]
    fn plus_is_commutative(a in scalar(), b in scalar()) {
        prop_assert!(a.plus_scalar(&b).form_eq(&b.plus_scalar(&a)));
    }

    #[test]
    fn multiply_is_commutative(a in scalar(), b in scalar()) {
        let ab = a.multiply_scalar(&b).unwrap();
        let ba = b.multiply_scalar(&a).unwrap();
        prop_assert!(ab.form_eq(&ba));
    }

    #[test]
    fn simplify_is_idempotent(ms in prop::collection::vec(monomial(), 1..8)) {
        let p = Polynomial::new(ms).expect("non-empty");
        let once = p.simplify();
        prop_assert_eq!(once.simplify(), once);
    }

    #[test]
    fn degree_laws(a in scalar(), b in scalar()) {
        let sum = a.plus_scalar(&b);
        let product = a.multiply_scalar(&b).unwrap();
        prop_assert_eq!(sum.degree(), a.degree().max(b.degree()));
        prop_assert_eq!(product.degree(), a.degree() + b.degree());
        prop_assert!(sum.kind() >= a.kind().max(b.kind()));
        prop_assert!(product.kind() >= a.kind().max(b.kind()));
    }

    #[test]
    fn substitution_order_does_not_matter(
        p in scalar(),
        v0 in 1i32..5,
        v1 in 1i32..5,
    ) {
        let (x0, x1) = (var(0), var(1));
        let (r0, r1) = (ScalarExpr::from(f64::from(v0)), ScalarExpr::from(f64::from(v1)));
        let at_once = p
            .substitute_all(&HashMap::from([(x0, r0.clone()), (x1, r1.clone())]))
            .unwrap();
        let forward = p
            .substitute_scalar(&x0, &r0)
            .and_then(|e| e.substitute_scalar(&x1, &r1))
            .unwrap();
        let backward = p
            .substitute_scalar(&x1, &r1)
            .and_then(|e| e.substitute_scalar(&x0, &r0))
            .unwrap();
        prop_assert!(at_once.form_eq(&forward));
        prop_assert!(at_once.form_eq(&backward));
    }
}
