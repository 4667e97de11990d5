//! Issue type resolution.

use std::collections::BTreeSet;
use std::sync::Arc;

use querycontext_foundation::{ClauseContext, ContainerCategoryContext, Result};
use querycontext_query::{Operator, TerminalClause};

use crate::collaborators::{CategoryIndex, OperandResolver};
use crate::resolver::{ClauseContextResolver, EvaluationScope, clause_literals, supports, unsupported};

/// Resolves `issuetype` predicates into `(AllContainers, category)` pairs.
///
/// Negation complements against every known category, not only the ones
/// visible to the actor: categories are not permission objects.
#[derive(Clone)]
pub struct IssueTypeResolver {
    operands: Arc<dyn OperandResolver>,
    index: Arc<dyn CategoryIndex>,
}

impl IssueTypeResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new(operands: Arc<dyn OperandResolver>, index: Arc<dyn CategoryIndex>) -> Self {
        Self { operands, index }
    }
}

impl ClauseContextResolver for IssueTypeResolver {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        if !supports(clause, Operator::EQUALITY_OPERATORS_WITH_EMPTY) {
            return Ok(unsupported(clause));
        }
        let Some(literals) = clause_literals(self.operands.as_ref(), scope, clause)? else {
            return Ok(ClauseContext::universal());
        };

        let mut named = BTreeSet::new();
        for literal in literals.iter().filter(|literal| !literal.is_empty()) {
            named.extend(self.index.category_ids(scope.user(), literal)?);
        }
        if named.is_empty() {
            return Ok(ClauseContext::universal());
        }

        let categories = if clause.operator().is_negative() {
            self.index
                .all_category_ids()?
                .difference(&named)
                .cloned()
                .collect()
        } else {
            named
        };

        Ok(categories
            .into_iter()
            .map(ContainerCategoryContext::category)
            .collect::<ClauseContext>()
            .normalized())
    }
}
