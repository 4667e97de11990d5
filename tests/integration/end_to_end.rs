//! End-to-end scenarios over a two-project tracker and the sample tracker.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use querycontext::engine::{EngineConfig, QueryContextEngine};
use querycontext::foundation::{ClauseContext, ContainerCategoryContext, ContainerId};
use querycontext::query::{Clause, Operand, Operator};
use querycontext_test_utils::tracing_setup::init_test_tracing;
use querycontext_test_utils::{InMemoryCatalog, TestProject, sample_engine, standard_registry};

/// Projects A (10) and B (20), issue types Bug (1) and Task (2).
fn two_project_engine() -> QueryContextEngine {
    let catalog = Arc::new(
        InMemoryCatalog::builder()
            .issue_type("1", "Bug")
            .issue_type("2", "Task")
            .project(TestProject::new(10, "A", "Alpha").with_issue_types(["1", "2"]))
            .project(TestProject::new(20, "B", "Beta").with_issue_types(["1", "2"]))
            .build(),
    );
    QueryContextEngine::new(Arc::new(standard_registry(&catalog)))
}

fn project_is(operator: Operator, key: &str) -> Clause {
    Clause::terminal("project", operator, Operand::string(key))
}

fn render(engine: &QueryContextEngine, clause: &Clause) -> String {
    engine.context(None, clause).unwrap().full.to_string()
}

// =============================================================================
// Two projects
// =============================================================================

#[test]
fn equality_on_project() {
    let engine = two_project_engine();
    assert_eq!(render(&engine, &project_is(Operator::Equals, "A")), "{(10, AllCategories)}");
}

#[test]
fn inequality_on_project() {
    let engine = two_project_engine();
    assert_eq!(render(&engine, &project_is(Operator::NotEquals, "A")), "{(20, AllCategories)}");
}

#[test]
fn project_and_issue_type() {
    let engine = two_project_engine();
    let query = Clause::and([
        project_is(Operator::Equals, "A"),
        Clause::terminal("issuetype", Operator::Equals, Operand::string("Bug")),
    ]);
    let result = engine.context(None, &query).unwrap();
    let expected: ClauseContext = [ContainerCategoryContext::of(ContainerId::new(10), "1")].into_iter().collect();
    assert_eq!(result.full, expected);
    assert_eq!(result.simple, expected);
}

#[test]
fn unsupported_operator_on_project() {
    let engine = two_project_engine();
    let result = engine.context(None, &project_is(Operator::Like, "A")).unwrap();
    assert!(result.full.is_universal());
    assert_eq!(render(&engine, &project_is(Operator::Like, "A")), "{(AllContainers, AllCategories)}");
}

#[test]
fn negating_every_project_widens_to_universal() {
    let engine = two_project_engine();
    let query = Clause::not(Clause::terminal(
        "project",
        Operator::In,
        Operand::list([Operand::string("A"), Operand::string("B")]),
    ));
    assert!(engine.context(None, &query).unwrap().full.is_universal());
}

// =============================================================================
// Sample tracker
// =============================================================================

#[test_log::test]
fn realistic_query() {
    let engine = sample_engine(EngineConfig::default());
    // (project = A AND status = "In Progress") OR (Severity = Cosmetic AND component = API)
    let query = Clause::or([
        Clause::and([
            project_is(Operator::Equals, "A"),
            Clause::terminal("status", Operator::Equals, Operand::string("In Progress")),
        ]),
        Clause::and([
            Clause::terminal("Severity", Operator::Equals, Operand::string("Cosmetic")),
            Clause::terminal("component", Operator::Equals, Operand::string("API")),
        ]),
    ]);
    let result = engine.context(None, &query).unwrap();
    assert_eq!(result.full.to_string(), "{(10, 1), (10, 3), (20, 2)}");
    assert!(result.simple.is_universal());
}

#[test]
fn saved_filter_cycles_terminate() {
    init_test_tracing();
    let engine = sample_engine(EngineConfig::default());
    let query = Clause::or([
        Clause::terminal("filter", Operator::Equals, Operand::string("loop")),
        Clause::terminal("filter", Operator::Equals, Operand::string("into loop")),
    ]);
    assert!(engine.context(None, &query).unwrap().full.is_universal());

    let narrowed = Clause::terminal("filter", Operator::In, Operand::list([Operand::string("into loop")]));
    assert_eq!(
        engine.context(None, &narrowed).unwrap().full.to_string(),
        "{(20, AllCategories)}"
    );
}

#[test]
fn one_engine_serves_concurrent_callers() {
    let engine = Arc::new(sample_engine(EngineConfig::default()));
    let query = Clause::terminal("status", Operator::Equals, Operand::string("In Progress"));
    let expected = engine.context(None, &query).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let query = query.clone();
            std::thread::spawn(move || engine.context(None, &query).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
