//! Saved filters, evaluated recursively with a cycle guard.

use std::sync::Arc;

use querycontext_foundation::{ClauseContext, Result, intersect, union};
use querycontext_query::{Clause, Operator, TerminalClause};

use crate::collaborators::{FilterCycleDetector, OperandResolver, SavedFilters};
use crate::resolver::{ClauseContextResolver, EvaluationScope, clause_literals, unsupported};

/// Resolves `filter` predicates by evaluating the referenced saved filters.
///
/// `filter in (...)` unions the filters' contexts; `filter not in (...)`
/// intersects the contexts of their negated clauses. A filter that refers
/// back to itself, directly or through others, narrows nothing.
#[derive(Clone)]
pub struct SavedFilterResolver {
    operands: Arc<dyn OperandResolver>,
    filters: Arc<dyn SavedFilters>,
    cycles: Arc<dyn FilterCycleDetector>,
}

impl SavedFilterResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new(
        operands: Arc<dyn OperandResolver>,
        filters: Arc<dyn SavedFilters>,
        cycles: Arc<dyn FilterCycleDetector>,
    ) -> Self {
        Self {
            operands,
            filters,
            cycles,
        }
    }
}

impl ClauseContextResolver for SavedFilterResolver {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        let negative = match clause.operator() {
            Operator::Equals | Operator::In => false,
            Operator::NotEquals | Operator::NotIn => true,
            _ => return Ok(unsupported(clause)),
        };
        let Some(literals) = clause_literals(self.operands.as_ref(), scope, clause)? else {
            return Ok(ClauseContext::universal());
        };

        let mut filters = Vec::new();
        for literal in literals.iter().filter(|literal| !literal.is_empty()) {
            filters.extend(self.filters.filters(scope.user(), literal)?);
        }
        if filters.is_empty() {
            return Ok(ClauseContext::universal());
        }

        let mut contexts = Vec::with_capacity(filters.len());
        for filter in &filters {
            if scope.is_expanding(filter.id) || self.cycles.contains_cycle(scope.user(), filter)? {
                tracing::debug!(filter = %filter.name, id = %filter.id, "saved filter refers to itself");
                return Ok(ClauseContext::universal());
            }
            let Some(query) = &filter.clause else {
                contexts.push(ClauseContext::universal());
                continue;
            };
            let query = if negative {
                Clause::not(query.clone())
            } else {
                query.clone()
            };
            contexts.push(scope.evaluate_filter(filter, &query)?.full);
        }

        Ok(if negative { intersect(contexts) } else { union(contexts) })
    }
}
