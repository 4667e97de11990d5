//! Integration tests for QueryContext projection
//!
//! Grouping of clause contexts by container.

use pretty_assertions::assert_eq;
use querycontext_foundation::{
    CategoryContext, ClauseContext, ContainerCategoryContext, ContainerContext, ContainerId,
    QueryContext,
};

fn pair(container: u64, category: &str) -> ContainerCategoryContext {
    ContainerCategoryContext::of(ContainerId::new(container), category)
}

#[test]
fn universal_projects_to_universal() {
    let projected = QueryContext::new(&ClauseContext::universal());
    assert!(projected.is_universal());
    assert_eq!(projected, QueryContext::universal());
}

#[test]
fn pairs_are_grouped_by_container() {
    let context: ClauseContext = [pair(10, "1"), pair(10, "2"), pair(20, "1")].into_iter().collect();
    let projected = QueryContext::from(&context);

    assert_eq!(projected.len(), 2);
    let ten = projected
        .categories_for(&ContainerContext::Container(ContainerId::new(10)))
        .unwrap();
    assert_eq!(ten.len(), 2);
    assert!(ten.contains(&CategoryContext::Category("2".into())));
}

#[test]
fn wildcards_keep_their_own_groups() {
    let context: ClauseContext = [
        ContainerCategoryContext::container(ContainerId::new(10)),
        ContainerCategoryContext::category("7"),
    ]
    .into_iter()
    .collect();
    let projected = QueryContext::new(&context);

    let containers: Vec<_> = projected.containers().cloned().collect();
    assert_eq!(
        containers,
        vec![ContainerContext::All, ContainerContext::Container(ContainerId::new(10))]
    );
    assert!(!projected.is_universal());
}
