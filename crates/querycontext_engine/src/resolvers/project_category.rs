//! Project categories, expanded to their member containers.

use std::collections::BTreeSet;
use std::sync::Arc;

use querycontext_foundation::{ClauseContext, ContainerCategoryContext, ContainerId, Result};
use querycontext_query::{Operator, TerminalClause};

use crate::collaborators::{ContainerGroups, ContainerVisibility, OperandResolver, Permission};
use crate::resolver::{ClauseContextResolver, EvaluationScope, clause_literals, supports, unsupported};

/// Resolves project category predicates.
///
/// Categories are mapped to their member containers, then filtered by
/// visibility like [`ProjectResolver`](super::ProjectResolver). `EMPTY`
/// stands for the containers in no category.
#[derive(Clone)]
pub struct ProjectCategoryResolver {
    operands: Arc<dyn OperandResolver>,
    groups: Arc<dyn ContainerGroups>,
    visibility: Arc<dyn ContainerVisibility>,
}

impl ProjectCategoryResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new(
        operands: Arc<dyn OperandResolver>,
        groups: Arc<dyn ContainerGroups>,
        visibility: Arc<dyn ContainerVisibility>,
    ) -> Self {
        Self {
            operands,
            groups,
            visibility,
        }
    }
}

impl ClauseContextResolver for ProjectCategoryResolver {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        if !supports(clause, Operator::EQUALITY_OPERATORS_WITH_EMPTY) {
            return Ok(unsupported(clause));
        }
        let Some(literals) = clause_literals(self.operands.as_ref(), scope, clause)? else {
            return Ok(ClauseContext::universal());
        };

        let mut groups = BTreeSet::new();
        for literal in &literals {
            if literal.is_empty() {
                groups.insert(None);
            } else {
                groups.extend(self.groups.group_ids(literal)?.into_iter().map(Some));
            }
        }
        let negative = clause.operator().is_negative();
        // "not in (X)" must also drop the uncategorised containers.
        if negative {
            groups.insert(None);
        }
        if groups.is_empty() {
            return Ok(ClauseContext::universal());
        }

        let mut members = BTreeSet::new();
        for group in groups {
            members.extend(self.groups.containers_in(group)?);
        }

        let visible = self.visibility.visible_containers(scope.user(), Permission::Browse)?;
        let containers: Vec<ContainerId> = if negative {
            visible.difference(&members).copied().collect()
        } else {
            visible.intersection(&members).copied().collect()
        };

        Ok(containers
            .into_iter()
            .map(ContainerCategoryContext::container)
            .collect::<ClauseContext>()
            .normalized())
    }
}
