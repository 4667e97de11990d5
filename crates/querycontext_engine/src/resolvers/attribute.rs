//! Attribute fields (components, versions) resolved to the containers that own them.

use std::collections::BTreeSet;
use std::sync::Arc;

use querycontext_foundation::{ClauseContext, ContainerCategoryContext, Result};
use querycontext_query::{Operator, TerminalClause};

use crate::collaborators::{ContainerAttributeIndex, ContainerVisibility, OperandResolver, Permission};
use crate::resolver::{ClauseContextResolver, EvaluationScope, clause_literals, supports, unsupported};

/// Resolves predicates on attributes owned by exactly one container, such
/// as components and versions.
///
/// The named attributes (or, for a negative operator, every other
/// attribute) are mapped to their owning containers, and each visible
/// owner becomes `(container, AllCategories)`.
#[derive(Clone)]
pub struct AttributeResolver {
    operands: Arc<dyn OperandResolver>,
    index: Arc<dyn ContainerAttributeIndex>,
    visibility: Arc<dyn ContainerVisibility>,
}

impl AttributeResolver {
    /// Creates the resolver over one attribute kind.
    #[must_use]
    pub fn new(
        operands: Arc<dyn OperandResolver>,
        index: Arc<dyn ContainerAttributeIndex>,
        visibility: Arc<dyn ContainerVisibility>,
    ) -> Self {
        Self {
            operands,
            index,
            visibility,
        }
    }
}

impl ClauseContextResolver for AttributeResolver {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        if !supports(clause, Operator::EQUALITY_OPERATORS_WITH_EMPTY) {
            return Ok(unsupported(clause));
        }
        let Some(literals) = clause_literals(self.operands.as_ref(), scope, clause)? else {
            return Ok(ClauseContext::universal());
        };

        let mut named = BTreeSet::new();
        for literal in literals.iter().filter(|literal| !literal.is_empty()) {
            named.extend(self.index.attribute_ids(scope.user(), literal)?);
        }
        if named.is_empty() {
            return Ok(ClauseContext::universal());
        }

        let attributes = if clause.operator().is_negative() {
            self.index
                .all_attribute_ids()?
                .difference(&named)
                .copied()
                .collect()
        } else {
            named
        };

        let visible = self.visibility.visible_containers(scope.user(), Permission::Browse)?;
        let mut owners = BTreeSet::new();
        for attribute in attributes {
            if let Some(owner) = self.index.owning_container(attribute)? {
                if visible.contains(&owner) {
                    owners.insert(owner);
                }
            }
        }

        Ok(owners
            .into_iter()
            .map(ContainerCategoryContext::container)
            .collect::<ClauseContext>()
            .normalized())
    }
}
