//! Integration tests for negation push-down

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use querycontext_query::{ChangedClause, Clause, DeMorganNormalizer, NegationNormalizer, Operand, Operator};

fn eq(field: &str, value: &str) -> Clause {
    Clause::terminal(field, Operator::Equals, Operand::string(value))
}

fn ne(field: &str, value: &str) -> Clause {
    Clause::terminal(field, Operator::NotEquals, Operand::string(value))
}

#[test]
fn de_morgan_over_and() {
    let clause = Clause::not(Clause::and([eq("project", "A"), eq("issuetype", "Bug")]));
    assert_eq!(
        DeMorganNormalizer.normalize(&clause),
        Clause::or([ne("project", "A"), ne("issuetype", "Bug")])
    );
}

#[test]
fn de_morgan_over_or() {
    let clause = Clause::not(Clause::or([eq("project", "A"), eq("project", "B")]));
    assert_eq!(
        DeMorganNormalizer.normalize(&clause),
        Clause::and([ne("project", "A"), ne("project", "B")])
    );
}

#[test]
fn double_negation_cancels() {
    let clause = Clause::not(Clause::not(eq("project", "A")));
    assert_eq!(DeMorganNormalizer.normalize(&clause), eq("project", "A"));
}

#[test]
fn negated_changed_flips_its_flag() {
    let changed = Clause::Changed(ChangedClause {
        field: "status".into(),
        negated: false,
    });
    let normalized = DeMorganNormalizer.normalize(&Clause::not(changed));
    assert_eq!(
        normalized,
        Clause::Changed(ChangedClause {
            field: "status".into(),
            negated: true,
        })
    );
}

#[test]
fn changed_operator_keeps_its_not() {
    let clause = Clause::not(Clause::terminal("status", Operator::Changed, Operand::Empty));
    let normalized = DeMorganNormalizer.normalize(&clause);
    assert_eq!(normalized, clause);
    assert!(normalized.contains_not());
}

// =============================================================================
// Properties
// =============================================================================

fn arb_leaf() -> impl Strategy<Value = Clause> {
    let operators = prop::sample::select(vec![
        Operator::Equals,
        Operator::NotEquals,
        Operator::In,
        Operator::LessThan,
        Operator::Like,
        Operator::Is,
    ]);
    (prop::sample::select(vec!["project", "issuetype", "status"]), operators, 0i64..5)
        .prop_map(|(field, operator, value)| Clause::terminal(field, operator, Operand::number(value)))
}

fn arb_clause() -> impl Strategy<Value = Clause> {
    arb_leaf().prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..3).prop_map(Clause::And),
            prop::collection::vec(inner.clone(), 1..3).prop_map(Clause::Or),
            inner.prop_map(Clause::not),
        ]
    })
}

proptest! {
    #[test]
    fn normalized_trees_have_no_not(clause in arb_clause()) {
        prop_assert!(!DeMorganNormalizer.normalize(&clause).contains_not());
    }

    #[test]
    fn normalization_is_idempotent(clause in arb_clause()) {
        let once = DeMorganNormalizer.normalize(&clause);
        prop_assert_eq!(DeMorganNormalizer.normalize(&once), once.clone());
    }

    #[test]
    fn negating_twice_is_the_normal_form(clause in arb_clause()) {
        let twice = Clause::not(Clause::not(clause.clone()));
        prop_assert_eq!(DeMorganNormalizer.normalize(&twice), DeMorganNormalizer.normalize(&clause));
    }
}
