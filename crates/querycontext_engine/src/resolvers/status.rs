//! Statuses, resolved through the workflows each container uses.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use querycontext_foundation::{
    CategoryId, ClauseContext, ContainerCategoryContext, ContainerId, Result,
};
use querycontext_query::{Operator, TerminalClause};

use crate::collaborators::{
    ContainerCategories, ContainerVisibility, OperandResolver, Permission, StatusId, StatusIndex,
    WorkflowCatalog,
};
use crate::resolver::{ClauseContextResolver, EvaluationScope, clause_literals, supports, unsupported};

/// Resolves `status` predicates through workflow assignments.
///
/// A (container, category) pair can hold the status if the workflow
/// assigned to it links the status (or, for a negative operator, links any
/// other status). Containers whose every category qualifies collapse to
/// `(container, AllCategories)`; if every visible container collapses, the
/// result is universal.
#[derive(Clone)]
pub struct StatusResolver {
    operands: Arc<dyn OperandResolver>,
    statuses: Arc<dyn StatusIndex>,
    workflows: Arc<dyn WorkflowCatalog>,
    categories: Arc<dyn ContainerCategories>,
    visibility: Arc<dyn ContainerVisibility>,
}

impl StatusResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new(
        operands: Arc<dyn OperandResolver>,
        statuses: Arc<dyn StatusIndex>,
        workflows: Arc<dyn WorkflowCatalog>,
        categories: Arc<dyn ContainerCategories>,
        visibility: Arc<dyn ContainerVisibility>,
    ) -> Self {
        Self {
            operands,
            statuses,
            workflows,
            categories,
            visibility,
        }
    }
}

/// Per-evaluation memo of "does this workflow satisfy the predicate".
struct WorkflowTest<'a> {
    workflows: &'a dyn WorkflowCatalog,
    targets: &'a BTreeSet<StatusId>,
    negative: bool,
    memo: HashMap<String, bool>,
}

impl WorkflowTest<'_> {
    fn satisfied(&mut self, workflow: &str) -> Result<bool> {
        if let Some(&known) = self.memo.get(workflow) {
            return Ok(known);
        }
        let satisfied = self.scan(workflow)?;
        self.memo.insert(workflow.to_string(), satisfied);
        Ok(satisfied)
    }

    fn scan(&self, workflow: &str) -> Result<bool> {
        let Some(linked) = self.workflows.linked_statuses(workflow)? else {
            tracing::warn!(workflow, "workflow is assigned but not defined; skipping");
            return Ok(false);
        };
        let mut satisfied = false;
        for status in linked {
            let Some(status) = status else {
                tracing::warn!(workflow, "workflow links a status that no longer exists; skipping");
                continue;
            };
            if self.targets.contains(&status) != self.negative {
                satisfied = true;
            }
        }
        Ok(satisfied)
    }
}

impl StatusResolver {
    /// The pairs of one container that satisfy the test, and whether every
    /// workflow entry of the container did.
    fn container_pairs(
        &self,
        container: ContainerId,
        test: &mut WorkflowTest<'_>,
    ) -> Result<(Vec<ContainerCategoryContext>, bool)> {
        let mapping = self.workflows.workflow_map(container)?;
        let assigned: BTreeSet<&CategoryId> = mapping.iter().filter_map(|(category, _)| category.as_ref()).collect();

        let mut pairs = Vec::new();
        let mut all_satisfied = true;
        for (category, workflow) in &mapping {
            if !test.satisfied(workflow)? {
                all_satisfied = false;
                continue;
            }
            match category {
                Some(category) => pairs.push(ContainerCategoryContext::of(container, category.clone())),
                None => {
                    let defaults = self.categories.categories_of(container)?;
                    pairs.extend(
                        defaults
                            .into_iter()
                            .filter(|category| !assigned.contains(category))
                            .map(|category| ContainerCategoryContext::of(container, category)),
                    );
                }
            }
        }
        Ok((pairs, all_satisfied))
    }
}

impl ClauseContextResolver for StatusResolver {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        if !supports(clause, Operator::EQUALITY_OPERATORS_WITH_EMPTY) {
            return Ok(unsupported(clause));
        }
        let Some(literals) = clause_literals(self.operands.as_ref(), scope, clause)? else {
            return Ok(ClauseContext::universal());
        };

        let mut targets = BTreeSet::new();
        for literal in literals.iter().filter(|literal| !literal.is_empty()) {
            targets.extend(self.statuses.status_ids(scope.user(), literal)?);
        }
        if targets.is_empty() {
            return Ok(ClauseContext::universal());
        }

        let mut test = WorkflowTest {
            workflows: self.workflows.as_ref(),
            targets: &targets,
            negative: clause.operator().is_negative(),
            memo: HashMap::new(),
        };

        let visible = self.visibility.visible_containers(scope.user(), Permission::Browse)?;
        let mut every_container_complete = true;
        let mut context = ClauseContext::empty();
        for container in visible {
            let (pairs, complete) = self.container_pairs(container, &mut test)?;
            if complete {
                context = context.insert(ContainerCategoryContext::container(container));
            } else {
                every_container_complete = false;
                for pair in pairs {
                    context = context.insert(pair);
                }
            }
        }

        if every_container_complete {
            return Ok(ClauseContext::universal());
        }
        Ok(context.normalized())
    }
}
