//! Integration tests for clause combination
//!
//! AND/OR/NOT over the sample tracker, and the simple context.

use pretty_assertions::assert_eq;
use querycontext_engine::EngineConfig;
use querycontext_foundation::{CategoryContext, ContainerContext, ContainerId, ErrorKind};
use querycontext_query::{Clause, Operand, Operator, WasClause};
use querycontext_test_utils::fixtures::{BUG, SUB_TASK, TASK};
use querycontext_test_utils::sample_engine;

use crate::{clause, ctx, eq, evaluate_as, full, issue_type, pair, project, strings};

#[test]
fn and_pairs_projects_with_types() {
    let result = evaluate_as(None, &Clause::and([eq("project", "A"), eq("issuetype", "Bug")]));
    assert_eq!(result.full, ctx(&[pair(10, BUG)]));
    assert_eq!(result.simple, result.full);
}

#[test]
fn or_unions_but_keeps_simple_explicit() {
    let result = evaluate_as(None, &Clause::or([eq("project", "A"), eq("component", "API")]));
    assert_eq!(result.full, ctx(&[project(10), project(20)]));
    assert!(result.simple.is_universal());
}

#[test]
fn implicit_predicates_only_narrow_the_full_context() {
    let result = evaluate_as(None, &Clause::and([eq("component", "UI"), eq("type", "Bug")]));
    assert_eq!(result.full, ctx(&[pair(10, BUG)]));
    assert_eq!(result.simple, ctx(&[issue_type(BUG)]));
}

#[test]
fn not_is_pushed_down() {
    let query = Clause::not(Clause::and([eq("project", "A"), eq("issuetype", "Bug")]));
    assert_eq!(full(&query), ctx(&[project(20), issue_type(TASK), issue_type(SUB_TASK)]));
}

#[test]
fn contradiction_widens_to_universal() {
    let query = Clause::and([eq("status", "In Progress"), eq("issuetype", "Task")]);
    assert!(full(&query).is_universal());
}

#[test]
fn history_clauses_do_not_narrow() {
    let was = Clause::Was(WasClause {
        field: "status".into(),
        operator: Operator::Was,
        operand: Operand::string("Open"),
    });
    let query = Clause::and([eq("project", "A"), was]);
    assert_eq!(full(&query), ctx(&[project(10)]));
}

#[test]
fn errors_carry_the_failing_clause() {
    let engine = sample_engine(EngineConfig::default());
    let query = Clause::and([eq("project", "A"), clause("issue", Operator::Equals, Operand::Empty)]);
    let err = engine.context(None, &query).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::MalformedLiteral { .. }));
    let context = err.context.unwrap();
    assert!(context.clause.unwrap().starts_with("issue = EMPTY"));
    assert!(context.filters.is_empty());
}

#[test]
fn query_context_groups_by_project() {
    let engine = sample_engine(EngineConfig::default());
    let query = Clause::and([
        clause("project", Operator::In, strings(&["A", "B"])),
        eq("issuetype", "Bug"),
    ]);
    let projected = engine.query_context(None, Some(&query)).unwrap();

    let groups: Vec<_> = projected
        .groups()
        .map(|(container, categories)| (container.clone(), categories.iter().cloned().collect::<Vec<_>>()))
        .collect();
    let bug = vec![CategoryContext::Category(BUG.into())];
    assert_eq!(
        groups,
        vec![
            (ContainerContext::Container(ContainerId::new(10)), bug.clone()),
            (ContainerContext::Container(ContainerId::new(20)), bug),
        ]
    );
}

#[test]
fn simple_query_context_ignores_implicit_fields() {
    let engine = sample_engine(EngineConfig::default());
    let query = Clause::and([eq("project", "A"), eq("status", "In Progress")]);

    let full = engine.query_context(None, Some(&query)).unwrap();
    let simple = engine.simple_query_context(None, Some(&query)).unwrap();
    assert_eq!(full.len(), 1);
    assert_eq!(
        full.categories_for(&ContainerContext::Container(ContainerId::new(10)))
            .map(|categories| categories.len()),
        Some(2)
    );
    assert_eq!(
        simple.categories_for(&ContainerContext::Container(ContainerId::new(10)))
            .map(|categories| categories.contains(&CategoryContext::All)),
        Some(true)
    );
}

#[test]
fn missing_where_clause_is_universal() {
    let engine = sample_engine(EngineConfig::default());
    assert!(engine.query_context(None, None).unwrap().is_universal());
    assert!(engine.simple_query_context(None, None).unwrap().is_universal());
}

#[test]
fn configured_explicit_names_feed_the_simple_context() {
    let engine = sample_engine(EngineConfig::new().with_container_clause_names(["project", "component"]));
    let result = engine.context(None, &eq("component", "UI")).unwrap();
    assert_eq!(result.simple, ctx(&[project(10)]));
}
