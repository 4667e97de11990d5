//! Integration tests for operators
//!
//! Complements, classification and rendering.

use pretty_assertions::assert_eq;
use querycontext_query::Operator;

const ALL: [Operator; 17] = [
    Operator::Equals,
    Operator::NotEquals,
    Operator::GreaterThan,
    Operator::GreaterThanEquals,
    Operator::LessThan,
    Operator::LessThanEquals,
    Operator::In,
    Operator::NotIn,
    Operator::Like,
    Operator::NotLike,
    Operator::Is,
    Operator::IsNot,
    Operator::Was,
    Operator::WasNot,
    Operator::WasIn,
    Operator::WasNotIn,
    Operator::Changed,
];

#[test]
fn negation_is_an_involution() {
    for operator in ALL {
        if let Some(negated) = operator.negated() {
            assert_eq!(negated.negated(), Some(operator), "{operator}");
        }
    }
}

#[test]
fn only_changed_lacks_a_complement() {
    let missing: Vec<_> = ALL.into_iter().filter(|op| op.negated().is_none()).collect();
    assert_eq!(missing, vec![Operator::Changed]);
}

#[test]
fn complements_flip_polarity_of_equality_operators() {
    for operator in [Operator::Equals, Operator::In, Operator::Is, Operator::Like] {
        let negated = operator.negated().unwrap();
        assert!(!operator.is_negative());
        assert!(negated.is_negative(), "{negated}");
    }
}

#[test]
fn relational_complements_stay_relational() {
    for operator in ALL.into_iter().filter(|op| op.is_relational()) {
        assert!(operator.negated().unwrap().is_relational());
        assert!(!operator.is_negative());
    }
}

#[test]
fn classification() {
    assert!(Operator::In.is_list());
    assert!(Operator::WasNotIn.is_list());
    assert!(!Operator::Equals.is_list());
    assert!(Operator::IsNot.is_empty_only());
    assert!(Operator::Changed.is_history());
    assert!(!Operator::Like.is_history());
    assert!(Operator::Is.is_equality());
    assert!(Operator::Equals.is_one_of(&[Operator::In, Operator::Equals]));
}

#[test]
fn symbols() {
    let rendered: Vec<_> = [Operator::NotIn, Operator::Like, Operator::GreaterThanEquals, Operator::IsNot]
        .into_iter()
        .map(|op| op.to_string())
        .collect();
    assert_eq!(rendered, vec!["not in", "~", ">=", "is not"]);
}
