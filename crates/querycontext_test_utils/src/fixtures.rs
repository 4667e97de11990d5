//! A small tracker shared by the integration suites.
//!
//! | id | key | name   | issue types           | workflows                  | notes              |
//! |----|-----|--------|-----------------------|----------------------------|--------------------|
//! | 10 | A   | Alpha  | Bug, Task, Sub-task   | classic, Task: simple      | category Core      |
//! | 20 | B   | Beta   | Bug, Task             | simple                     |                    |
//! | 30 | S   | Secret | Bug                   | classic                    | only `fred` browses|
//!
//! Statuses: Open (1) and Closed (6) in both workflows, In Progress (3)
//! only in `classic`.
//!
//! Platform and Notes also carry a scheme scoped to Secret, so most actors
//! see only part of their configuration.

use std::sync::Arc;

use querycontext_engine::collaborators::SelectOption;
use querycontext_engine::{EngineConfig, FieldConfigScheme, QueryContextEngine};
use querycontext_foundation::ContainerId;
use querycontext_query::{Clause, Operand, Operator};

use crate::catalog::{CustomField, CustomFieldKind, InMemoryCatalog, TestIssue, TestProject};
use crate::registry::standard_registry;

/// The Bug issue type.
pub const BUG: &str = "1";
/// The Task issue type.
pub const TASK: &str = "2";
/// The Sub-task issue type.
pub const SUB_TASK: &str = "3";

/// The shared tracker described in the module docs.
#[must_use]
pub fn sample_catalog() -> InMemoryCatalog {
    InMemoryCatalog::builder()
        .issue_type(BUG, "Bug")
        .issue_type(TASK, "Task")
        .issue_type(SUB_TASK, "Sub-task")
        .group(100, "Core")
        .project(
            TestProject::new(10, "A", "Alpha")
                .in_group(100)
                .with_issue_types([BUG, TASK, SUB_TASK])
                .with_workflow(None, "classic")
                .with_workflow(Some(TASK), "simple")
                .with_security_levels([1]),
        )
        .project(
            TestProject::new(20, "B", "Beta")
                .with_issue_types([BUG, TASK])
                .with_workflow(None, "simple"),
        )
        .project(
            TestProject::new(30, "S", "Secret")
                .with_issue_types([BUG])
                .with_workflow(None, "classic")
                .restricted_to(["fred"]),
        )
        .status("1", "Open")
        .status("3", "In Progress")
        .status("6", "Closed")
        .workflow("classic", &["1", "3", "6"])
        .workflow("simple", &["1", "6"])
        .component(11, "UI", 10)
        .component(21, "API", 20)
        .version(12, "1.0", 10)
        .security_level(1, "Internal")
        .custom_field(
            CustomField::new(10000, "Severity", CustomFieldKind::Select)
                .with_scheme(
                    FieldConfigScheme::global(1).with_containers([ContainerId::new(10)]),
                    [(SelectOption::root(100), "High"), (SelectOption::root(101), "Low")],
                )
                .with_scheme(
                    FieldConfigScheme::global(2).with_categories([TASK]),
                    [(SelectOption::root(102), "Cosmetic")],
                ),
        )
        .custom_field(
            CustomField::new(10001, "Platform", CustomFieldKind::Cascading)
                .with_scheme(
                    FieldConfigScheme::global(3).with_containers([ContainerId::new(20)]),
                    [
                        (SelectOption::root(200), "Linux"),
                        (SelectOption::child(201, 200), "Debian"),
                    ],
                )
                .with_scheme(
                    FieldConfigScheme::global(5).with_containers([ContainerId::new(30)]),
                    [(SelectOption::root(202), "Linux")],
                ),
        )
        .custom_field(
            CustomField::new(10002, "Notes", CustomFieldKind::Text)
                .with_scheme(FieldConfigScheme::global(4).with_containers([ContainerId::new(20)]), [])
                .with_scheme(FieldConfigScheme::global(6).with_containers([ContainerId::new(30)]), []),
        )
        .issue(TestIssue::new(1, "A-1", 10, BUG))
        .issue(TestIssue::new(2, "A-2", 10, SUB_TASK).child_of(1))
        .issue(TestIssue::new(3, "B-1", 20, TASK))
        .issue(TestIssue::new(4, "S-1", 30, BUG))
        .filter(
            1,
            "alpha bugs",
            Some(Clause::and([
                Clause::terminal("project", Operator::Equals, Operand::string("A")),
                Clause::terminal("issuetype", Operator::Equals, Operand::string("Bug")),
            ])),
        )
        .filter(
            2,
            "loop",
            Some(Clause::terminal("filter", Operator::Equals, Operand::string("loop"))),
        )
        .filter(
            3,
            "into loop",
            Some(Clause::and([
                Clause::terminal("project", Operator::Equals, Operand::string("B")),
                Clause::terminal("filter", Operator::Equals, Operand::string("loop")),
            ])),
        )
        .filter(4, "everything", None)
        .build()
}

/// An engine over [`sample_catalog`] with the standard registry.
#[must_use]
pub fn sample_engine(config: EngineConfig) -> QueryContextEngine {
    let catalog = Arc::new(sample_catalog());
    QueryContextEngine::new(Arc::new(standard_registry(&catalog))).with_config(config)
}
