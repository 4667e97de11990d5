//! Integration tests for the context algebra
//!
//! Absorption, identity and normalization laws of `union` and `intersect`.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use querycontext_foundation::{
    ClauseContext, ContainerCategoryContext, ContainerId, intersect, union,
};

fn project(id: u64) -> ContainerCategoryContext {
    ContainerCategoryContext::container(ContainerId::new(id))
}

fn issue_type(id: u64) -> ContainerCategoryContext {
    ContainerCategoryContext::category(id)
}

fn pair(container: u64, category: u64) -> ContainerCategoryContext {
    ContainerCategoryContext::of(ContainerId::new(container), category)
}

fn ctx(pairs: &[ContainerCategoryContext]) -> ClauseContext {
    pairs.iter().cloned().collect()
}

// =============================================================================
// Union
// =============================================================================

#[test]
fn union_of_nothing_is_universal() {
    assert!(union(Vec::new()).is_universal());
}

#[test]
fn union_with_universal_is_universal() {
    let result = union([ctx(&[project(10)]), ClauseContext::universal()]);
    assert!(result.is_universal());
}

#[test]
fn union_of_one_matching_and_one_empty_keeps_the_match() {
    assert_eq!(union([ctx(&[project(10)]), ClauseContext::empty()]), ctx(&[project(10)]));
}

#[test]
fn union_of_empties_is_universal() {
    assert!(union([ClauseContext::empty(), ClauseContext::empty()]).is_universal());
}

#[test]
fn union_keeps_every_pair() {
    let result = union([ctx(&[project(10)]), ctx(&[issue_type(1), pair(20, 2)])]);
    assert_eq!(result, ctx(&[project(10), issue_type(1), pair(20, 2)]));
}

// =============================================================================
// Intersection
// =============================================================================

#[test]
fn intersect_of_nothing_is_universal() {
    assert!(intersect(Vec::new()).is_universal());
}

#[test]
fn intersect_with_empty_is_universal() {
    assert!(intersect([ctx(&[project(10)]), ClauseContext::empty()]).is_universal());
}

#[test]
fn intersect_with_universal_is_identity() {
    let projects = ctx(&[project(10), project(20)]);
    assert_eq!(intersect([projects.clone(), ClauseContext::universal()]), projects);
    assert_eq!(intersect([ClauseContext::universal(), projects.clone()]), projects);
}

#[test]
fn intersect_pairs_projects_with_types() {
    let result = intersect([ctx(&[project(10)]), ctx(&[issue_type(1)])]);
    assert_eq!(result, ctx(&[pair(10, 1)]));
}

#[test]
fn intersect_of_disjoint_projects_is_universal() {
    assert!(intersect([ctx(&[project(10)]), ctx(&[project(20)])]).is_universal());
}

#[test]
fn intersect_keeps_only_matching_concrete_pairs() {
    let left = ctx(&[pair(10, 1), pair(10, 2), project(20)]);
    let right = ctx(&[pair(10, 2), issue_type(3)]);
    assert_eq!(intersect([left, right]), ctx(&[pair(10, 2), pair(20, 3)]));
}

// =============================================================================
// Properties
// =============================================================================

fn arb_pair() -> impl Strategy<Value = ContainerCategoryContext> {
    (prop::option::of(0u64..4), prop::option::of(0u64..4)).prop_map(|(container, category)| {
        match (container, category) {
            (Some(c), Some(t)) => pair(c, t),
            (Some(c), None) => project(c),
            (None, Some(t)) => issue_type(t),
            (None, None) => ContainerCategoryContext::universal(),
        }
    })
}

fn arb_context() -> impl Strategy<Value = ClauseContext> {
    prop::collection::vec(arb_pair(), 0..6).prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn results_are_never_empty(a in arb_context(), b in arb_context()) {
        prop_assert!(!union([a.clone(), b.clone()]).is_empty());
        prop_assert!(!intersect([a, b]).is_empty());
    }

    #[test]
    fn union_is_commutative(a in arb_context(), b in arb_context()) {
        prop_assert_eq!(union([a.clone(), b.clone()]), union([b, a]));
    }

    #[test]
    fn intersect_is_commutative(a in arb_context(), b in arb_context()) {
        prop_assert_eq!(intersect([a.clone(), b.clone()]), intersect([b, a]));
    }

    #[test]
    fn universal_absorbs_union(a in arb_context()) {
        prop_assert!(union([a, ClauseContext::universal()]).is_universal());
    }

    #[test]
    fn universal_is_intersect_identity(a in arb_context()) {
        prop_assert_eq!(intersect([a.clone(), ClauseContext::universal()]), a.normalized());
    }
}
