//! Project resolution against the containers the actor can browse.

use std::collections::BTreeSet;
use std::sync::Arc;

use querycontext_foundation::{ClauseContext, ContainerCategoryContext, ContainerId, Result};
use querycontext_query::{Operator, TerminalClause};

use crate::collaborators::{ContainerIndex, ContainerVisibility, OperandResolver, Permission};
use crate::resolver::{ClauseContextResolver, EvaluationScope, clause_literals, supports, unsupported};

/// Resolves `project` predicates.
///
/// Named containers are intersected with the visible ones; a negative
/// operator takes the visible containers minus the named ones. Each result
/// is `(container, AllCategories)`.
#[derive(Clone)]
pub struct ProjectResolver {
    operands: Arc<dyn OperandResolver>,
    index: Arc<dyn ContainerIndex>,
    visibility: Arc<dyn ContainerVisibility>,
}

impl ProjectResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new(
        operands: Arc<dyn OperandResolver>,
        index: Arc<dyn ContainerIndex>,
        visibility: Arc<dyn ContainerVisibility>,
    ) -> Self {
        Self {
            operands,
            index,
            visibility,
        }
    }
}

impl ClauseContextResolver for ProjectResolver {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        if !supports(clause, Operator::EQUALITY_OPERATORS_WITH_EMPTY) {
            return Ok(unsupported(clause));
        }
        let Some(literals) = clause_literals(self.operands.as_ref(), scope, clause)? else {
            return Ok(ClauseContext::universal());
        };

        let mut named = BTreeSet::new();
        for literal in literals.iter().filter(|literal| !literal.is_empty()) {
            named.extend(self.index.container_ids(scope.user(), literal)?);
        }
        if named.is_empty() {
            return Ok(ClauseContext::universal());
        }

        let visible = self.visibility.visible_containers(scope.user(), Permission::Browse)?;
        let containers: Vec<ContainerId> = if clause.operator().is_negative() {
            visible.difference(&named).copied().collect()
        } else {
            visible.intersection(&named).copied().collect()
        };

        Ok(containers
            .into_iter()
            .map(ContainerCategoryContext::container)
            .collect::<ClauseContext>()
            .normalized())
    }
}
