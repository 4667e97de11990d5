//! Integration tests for clause trees and operands

use pretty_assertions::assert_eq;
use querycontext_foundation::ErrorKind;
use querycontext_query::{Clause, Operand, Operator, QueryLiteral, TerminalClause};

// =============================================================================
// Operands
// =============================================================================

#[test]
fn list_literals_are_flattened_in_order() {
    let operand = Operand::list([
        Operand::string("A"),
        Operand::list([Operand::number(2), Operand::Empty]),
    ]);
    assert_eq!(
        operand.literals(),
        Some(vec![QueryLiteral::string("A"), QueryLiteral::Number(2), QueryLiteral::Empty])
    );
}

#[test]
fn function_operands_have_no_direct_literals() {
    let operand = Operand::list([
        Operand::string("A"),
        Operand::function("membersOf", ["developers".to_string()]),
    ]);
    assert_eq!(operand.literals(), None);
}

#[test]
fn empty_operands() {
    assert!(Operand::Empty.is_empty());
    assert!(Operand::from(QueryLiteral::Empty).is_empty());
    assert!(!Operand::list([Operand::Empty]).is_empty());
}

#[test]
fn empty_literal_has_no_key() {
    let err = QueryLiteral::Empty.key().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedLiteral { .. }));
    assert_eq!(QueryLiteral::from("KEY-1").key().unwrap().to_string(), "KEY-1");
    assert_eq!(QueryLiteral::from(42_i64).key().unwrap().to_string(), "42");
}

// =============================================================================
// Clauses
// =============================================================================

#[test]
fn terminal_accessors_and_rewrites() {
    let clause = TerminalClause::new("type", Operator::In, Operand::list([Operand::number(1)]));
    let renamed = clause.with_name("issuetype").with_operator(Operator::NotIn);

    assert_eq!(renamed.name(), "issuetype");
    assert_eq!(renamed.operator(), Operator::NotIn);
    assert_eq!(renamed.operand(), clause.operand());
    assert_eq!(clause.name(), "type");
}

#[test]
fn contains_not_searches_the_whole_tree() {
    let leaf = Clause::terminal("project", Operator::Equals, Operand::string("A"));
    let nested = Clause::and([leaf.clone(), Clause::or([leaf.clone(), Clause::not(leaf.clone())])]);

    assert!(nested.contains_not());
    assert!(!Clause::and([leaf.clone(), leaf]).contains_not());
}

#[test]
fn rendering_parenthesises_compound_children() {
    let clause = Clause::or([
        Clause::and([
            Clause::terminal("project", Operator::Equals, Operand::string("A")),
            Clause::terminal("issuetype", Operator::Equals, Operand::string("Bug")),
        ]),
        Clause::terminal("status", Operator::IsNot, Operand::Empty),
    ]);
    assert_eq!(
        clause.to_string(),
        "(project = \"A\" AND issuetype = \"Bug\") OR status is not EMPTY"
    );
}
