//! Issue security levels.

use std::collections::BTreeSet;
use std::sync::Arc;

use querycontext_foundation::{ClauseContext, ContainerCategoryContext, Result};
use querycontext_query::{Operator, TerminalClause};

use crate::collaborators::{ContainerVisibility, OperandResolver, Permission, SecurityLevels};
use crate::resolver::{ClauseContextResolver, EvaluationScope, clause_literals, supports, unsupported};

/// Resolves `level` predicates to the containers whose security scheme
/// holds the levels.
///
/// `level = EMPTY` narrows nothing, since any container may hold issues
/// without a level. `level != X` ranges over the other levels the actor may
/// see.
#[derive(Clone)]
pub struct SecurityLevelResolver {
    operands: Arc<dyn OperandResolver>,
    levels: Arc<dyn SecurityLevels>,
    visibility: Arc<dyn ContainerVisibility>,
}

impl SecurityLevelResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new(
        operands: Arc<dyn OperandResolver>,
        levels: Arc<dyn SecurityLevels>,
        visibility: Arc<dyn ContainerVisibility>,
    ) -> Self {
        Self {
            operands,
            levels,
            visibility,
        }
    }
}

impl ClauseContextResolver for SecurityLevelResolver {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        if !supports(clause, Operator::EQUALITY_OPERATORS_WITH_EMPTY) {
            return Ok(unsupported(clause));
        }
        let Some(literals) = clause_literals(self.operands.as_ref(), scope, clause)? else {
            return Ok(ClauseContext::universal());
        };
        let negative = clause.operator().is_negative();
        let mentions_empty = literals.iter().any(|literal| literal.is_empty());
        if mentions_empty && !negative {
            return Ok(ClauseContext::universal());
        }

        let mut named = BTreeSet::new();
        for literal in literals.iter().filter(|literal| !literal.is_empty()) {
            named.extend(self.levels.level_ids(scope.user(), literal)?);
        }
        if named.is_empty() && !mentions_empty {
            return Ok(ClauseContext::universal());
        }

        let levels: BTreeSet<_> = if negative {
            self.levels
                .visible_levels(scope.user())?
                .difference(&named)
                .copied()
                .collect()
        } else {
            named
        };
        if levels.is_empty() {
            return Ok(ClauseContext::universal());
        }

        let mut holders = BTreeSet::new();
        for level in levels {
            holders.extend(self.levels.containers_using(level)?);
        }
        let visible = self.visibility.visible_containers(scope.user(), Permission::Browse)?;
        Ok(holders
            .intersection(&visible)
            .copied()
            .map(ContainerCategoryContext::container)
            .collect::<ClauseContext>()
            .normalized())
    }
}
