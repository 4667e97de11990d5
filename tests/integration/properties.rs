//! Property tests over whole queries.

use std::sync::Arc;

use proptest::prelude::*;
use querycontext::engine::{EngineConfig, QueryContextEngine};
use querycontext::foundation::{ClauseContext, ContainerCategoryContext, ContainerId, union};
use querycontext::query::{Clause, Operand, Operator};
use querycontext_test_utils::{InMemoryCatalog, TestProject, sample_engine, standard_registry};

const PROJECTS: u64 = 6;

/// Projects P1..P6, all public.
fn wide_engine() -> QueryContextEngine {
    let mut builder = InMemoryCatalog::builder().issue_type("1", "Bug");
    for id in 1..=PROJECTS {
        let project = TestProject::new(id, &format!("P{id}"), &format!("Project {id}"));
        builder = builder.project(project.with_issue_types(["1"]));
    }
    let catalog = Arc::new(builder.build());
    QueryContextEngine::new(Arc::new(standard_registry(&catalog)))
}

fn projects_in(operator: Operator, ids: &[u64]) -> Clause {
    Clause::terminal(
        "project",
        operator,
        Operand::list(ids.iter().map(|id| Operand::string(format!("P{id}")))),
    )
}

fn leaf_pool() -> Vec<Clause> {
    let eq = |field: &str, value: &str| Clause::terminal(field, Operator::Equals, Operand::string(value));
    vec![
        eq("project", "A"),
        eq("project", "B"),
        Clause::terminal("project", Operator::NotEquals, Operand::string("A")),
        eq("issuetype", "Bug"),
        eq("issuetype", "Task"),
        eq("status", "In Progress"),
        eq("component", "UI"),
        eq("Severity", "Cosmetic"),
        eq("issue", "B-1"),
        eq("filter", "alpha bugs"),
        eq("filter", "loop"),
        Clause::terminal("summary", Operator::Like, Operand::string("crash")),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Clause> {
    prop::sample::select(leaf_pool())
}

fn arb_clause() -> impl Strategy<Value = Clause> {
    arb_leaf().prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(Clause::And),
            prop::collection::vec(inner.clone(), 1..4).prop_map(Clause::Or),
            inner.prop_map(Clause::not),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn results_are_never_empty(query in arb_clause()) {
        let result = sample_engine(EngineConfig::default()).context(None, &query).unwrap();
        prop_assert!(!result.full.is_empty());
        prop_assert!(!result.simple.is_empty());
    }

    #[test]
    fn double_negation_changes_nothing(query in arb_clause()) {
        let engine = sample_engine(EngineConfig::default());
        let twice = Clause::not(Clause::not(query.clone()));
        prop_assert_eq!(engine.context(None, &twice).unwrap(), engine.context(None, &query).unwrap());
    }

    #[test]
    fn child_order_does_not_matter(
        (children, shuffled) in prop::collection::vec(arb_leaf(), 1..5)
            .prop_flat_map(|children| (Just(children.clone()), Just(children).prop_shuffle()))
    ) {
        let engine = sample_engine(EngineConfig::default());
        for combine in [Clause::And as fn(Vec<Clause>) -> Clause, Clause::Or] {
            prop_assert_eq!(
                engine.context(None, &combine(children.clone())).unwrap(),
                engine.context(None, &combine(shuffled.clone())).unwrap()
            );
        }
    }

    #[test]
    fn batch_size_does_not_change_issue_results(batch in 1usize..8) {
        let query = Clause::terminal(
            "issue",
            Operator::In,
            Operand::list([
                Operand::number(1),
                Operand::number(2),
                Operand::number(3),
                Operand::string("A-1"),
                Operand::string("B-1"),
                Operand::string("S-1"),
            ]),
        );
        let unbatched = sample_engine(EngineConfig::unbatched()).context(None, &query).unwrap();
        let batched = sample_engine(EngineConfig::new().with_lookup_batch_size(batch))
            .context(None, &query)
            .unwrap();
        prop_assert_eq!(batched, unbatched);
    }

    #[test]
    fn project_negation_partitions_visible_projects(mask in 1u64..((1 << PROJECTS) - 1)) {
        let chosen: Vec<u64> = (1..=PROJECTS).filter(|id| mask & (1 << (id - 1)) != 0).collect();
        let engine = wide_engine();
        let inside = engine.context(None, &projects_in(Operator::In, &chosen)).unwrap().full;
        let outside = engine.context(None, &projects_in(Operator::NotIn, &chosen)).unwrap().full;

        let every: ClauseContext = (1..=PROJECTS)
            .map(|id| ContainerCategoryContext::container(ContainerId::new(id)))
            .collect();
        prop_assert!(inside.iter().all(|pair| !outside.contains(pair)));
        prop_assert_eq!(union([inside, outside]), every);
    }
}
