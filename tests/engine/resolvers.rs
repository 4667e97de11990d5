//! Integration tests for the field resolvers
//!
//! Each field of the sample tracker resolved on its own.

use pretty_assertions::assert_eq;
use querycontext_engine::EngineConfig;
use querycontext_foundation::{ErrorKind, User};
use querycontext_query::{Operand, Operator};
use querycontext_test_utils::fixtures::{BUG, SUB_TASK, TASK};
use querycontext_test_utils::sample_engine;

use crate::{clause, ctx, eq, evaluate_as, full, issue_type, pair, project, strings};

fn fred() -> User {
    User::new("fred")
}

// =============================================================================
// Containers and categories
// =============================================================================

#[test]
fn project_names_visible_projects() {
    assert_eq!(full(&eq("project", "A")), ctx(&[project(10)]));
    assert_eq!(full(&eq("project", "Beta")), ctx(&[project(20)]));
    assert_eq!(full(&clause("project", Operator::In, strings(&["A", "S"]))), ctx(&[project(10)]));
}

#[test]
fn project_visibility_depends_on_the_actor() {
    let query = clause("project", Operator::In, strings(&["A", "S"]));
    assert_eq!(evaluate_as(Some(&fred()), &query).full, ctx(&[project(10), project(30)]));

    let negated = clause("project", Operator::NotEquals, Operand::string("A"));
    assert_eq!(full(&negated), ctx(&[project(20)]));
    assert_eq!(evaluate_as(Some(&fred()), &negated).full, ctx(&[project(20), project(30)]));
}

#[test]
fn hidden_project_narrows_nothing() {
    assert!(full(&eq("project", "S")).is_universal());
}

#[test]
fn project_category_names_its_members() {
    assert_eq!(full(&eq("category", "Core")), ctx(&[project(10)]));
    assert_eq!(
        full(&clause("category", Operator::Is, Operand::Empty)),
        ctx(&[project(20)])
    );
}

#[test]
fn issue_type_names_categories() {
    assert_eq!(full(&eq("issuetype", "Bug")), ctx(&[issue_type(BUG)]));
    assert_eq!(
        full(&clause("type", Operator::NotEquals, Operand::string("Bug"))),
        ctx(&[issue_type(TASK), issue_type(SUB_TASK)])
    );
}

#[test]
fn attributes_resolve_to_their_owners() {
    assert_eq!(full(&eq("component", "UI")), ctx(&[project(10)]));
    assert_eq!(
        full(&clause("component", Operator::NotEquals, Operand::string("UI"))),
        ctx(&[project(20)])
    );
    assert_eq!(full(&eq("fixVersion", "1.0")), ctx(&[project(10)]));
    assert_eq!(full(&eq("affectedVersion", "1.0")), ctx(&[project(10)]));
}

// =============================================================================
// Status
// =============================================================================

#[test]
fn status_follows_workflows() {
    assert_eq!(
        full(&eq("status", "In Progress")),
        ctx(&[pair(10, BUG), pair(10, SUB_TASK)])
    );
}

#[test]
fn status_in_every_workflow_is_universal() {
    assert!(full(&eq("status", "Open")).is_universal());
    assert!(full(&clause("status", Operator::NotEquals, Operand::string("Open"))).is_universal());
}

#[test]
fn status_collapses_complete_projects() {
    let context = evaluate_as(Some(&fred()), &eq("status", "In Progress")).full;
    assert_eq!(context, ctx(&[pair(10, BUG), pair(10, SUB_TASK), project(30)]));
}

// =============================================================================
// Issues
// =============================================================================

#[test]
fn issue_keys_and_ids_pin_their_issues() {
    assert_eq!(full(&eq("issue", "A-1")), ctx(&[pair(10, BUG)]));
    assert_eq!(
        full(&clause("key", Operator::In, Operand::list([Operand::string("A-1"), Operand::number(3)]))),
        ctx(&[pair(10, BUG), pair(20, TASK)])
    );
    assert_eq!(
        full(&clause("issue", Operator::LessThan, Operand::string("B-1"))),
        ctx(&[project(20)])
    );
}

#[test]
fn hidden_issue_narrows_nothing() {
    assert!(full(&eq("issue", "S-1")).is_universal());
    assert_eq!(evaluate_as(Some(&fred()), &eq("issue", "S-1")).full, ctx(&[pair(30, BUG)]));
}

#[test]
fn parent_resolves_to_children() {
    assert_eq!(full(&eq("parent", "A-1")), ctx(&[pair(10, SUB_TASK)]));
}

#[test]
fn empty_issue_literal_is_an_error() {
    let engine = sample_engine(EngineConfig::default());
    let err = engine
        .context(None, &clause("issue", Operator::In, Operand::list([Operand::Empty])))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedLiteral { .. }));
    assert_eq!(err.context.unwrap().field.as_deref(), Some("issue"));
}

// =============================================================================
// Saved filters
// =============================================================================

#[test]
fn saved_filter_contributes_its_query() {
    assert_eq!(full(&eq("filter", "alpha bugs")), ctx(&[pair(10, BUG)]));
}

#[test]
fn negated_saved_filter_negates_its_query() {
    assert_eq!(
        full(&clause("filter", Operator::NotEquals, Operand::string("alpha bugs"))),
        ctx(&[project(20), issue_type(TASK), issue_type(SUB_TASK)])
    );
}

#[test]
fn self_referencing_filter_is_universal() {
    assert!(full(&eq("savedFilter", "loop")).is_universal());
}

#[test]
fn filter_around_a_cycle_keeps_its_other_predicates() {
    assert_eq!(full(&eq("request", "into loop")), ctx(&[project(20)]));
}

#[test]
fn filter_without_query_is_universal() {
    assert!(full(&eq("filter", "everything")).is_universal());
}

// =============================================================================
// Security levels
// =============================================================================

#[test]
fn security_level_names_projects_using_it() {
    assert_eq!(full(&eq("level", "Internal")), ctx(&[project(10)]));
    assert!(full(&clause("level", Operator::Is, Operand::Empty)).is_universal());
}

// =============================================================================
// Custom fields
// =============================================================================

#[test]
fn select_value_picks_its_scheme() {
    assert_eq!(full(&eq("Severity", "High")), ctx(&[project(10)]));
    assert_eq!(full(&eq("cf[10000]", "Cosmetic")), ctx(&[issue_type(TASK)]));
}

#[test]
fn invalid_or_empty_select_includes_every_scheme() {
    let every_scheme = ctx(&[project(10), issue_type(TASK)]);
    assert_eq!(full(&eq("Severity", "Bogus")), every_scheme);
    assert_eq!(full(&clause("Severity", Operator::Is, Operand::Empty)), every_scheme);
    assert_eq!(full(&clause("Severity", Operator::Like, Operand::string("Hi"))), every_scheme);
}

#[test]
fn negated_select_keeps_schemes_with_other_options() {
    assert_eq!(
        full(&clause("Severity", Operator::NotEquals, Operand::string("High"))),
        ctx(&[project(10), issue_type(TASK)])
    );
}

#[test]
fn cascading_select_matches_children() {
    assert_eq!(full(&eq("Platform", "Debian")), ctx(&[project(20)]));
    assert_eq!(full(&eq("cf[10001]", "Linux")), ctx(&[project(20)]));
}

#[test]
fn cascading_select_ignores_schemes_the_actor_cannot_see() {
    let linux = eq("Platform", "Linux");
    assert_eq!(full(&linux), ctx(&[project(20)]));
    assert_eq!(evaluate_as(Some(&fred()), &linux).full, ctx(&[project(20), project(30)]));
}

#[test]
fn text_custom_field_is_scoped_by_its_visible_schemes() {
    let notes = clause("Notes", Operator::Like, Operand::string("crash"));
    assert_eq!(full(&notes), ctx(&[project(20)]));
    assert_eq!(evaluate_as(Some(&fred()), &notes).full, ctx(&[project(20), project(30)]));
}

// =============================================================================
// Fields that never narrow
// =============================================================================

#[test]
fn free_text_and_universal_fields_are_universal() {
    assert!(full(&clause("text", Operator::Like, Operand::string("crash"))).is_universal());
    assert!(full(&eq("priority", "High")).is_universal());
    assert!(full(&eq("nosuchfield", "x")).is_universal());
}
