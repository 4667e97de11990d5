//! Resolver wrappers.

use std::sync::Arc;

use querycontext_foundation::{ClauseContext, Result, intersect, union};
use querycontext_query::{Operand, Operator, TerminalClause};

use crate::collaborators::ClauseValidator;
use crate::resolver::{ClauseContextResolver, EvaluationScope, annotate};

/// Splits list predicates into one predicate per value.
///
/// `f in (a, b)` becomes the union of `f = a` and `f = b`;
/// `f not in (a, b)` the intersection of `f != a` and `f != b`. Other
/// predicates go to the inner resolver unchanged.
#[derive(Clone, Debug)]
pub struct MultiValueResolver<R> {
    inner: R,
}

impl<R: ClauseContextResolver> MultiValueResolver<R> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    fn each(
        &self,
        scope: &EvaluationScope<'_>,
        clause: &TerminalClause,
        items: &[Operand],
        operator: Operator,
    ) -> Result<Vec<ClauseContext>> {
        let single = clause.with_operator(operator);
        items
            .iter()
            .map(|item| self.inner.clause_context(scope, &single.with_operand(item.clone())))
            .collect()
    }
}

impl<R: ClauseContextResolver> ClauseContextResolver for MultiValueResolver<R> {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        let Operand::Multi(items) = clause.operand() else {
            return self.inner.clause_context(scope, clause);
        };
        match clause.operator() {
            Operator::In => Ok(union(self.each(scope, clause, items, Operator::Equals)?)),
            Operator::NotIn => Ok(intersect(self.each(scope, clause, items, Operator::NotEquals)?)),
            _ => self.inner.clause_context(scope, clause),
        }
    }
}

/// Skips resolution of predicates the validator rejects.
///
/// An invalid predicate matches nothing the user meant, so it narrows
/// nothing.
#[derive(Clone)]
pub struct ValidatingResolver<R> {
    inner: R,
    validator: Arc<dyn ClauseValidator>,
}

impl<R: ClauseContextResolver> ValidatingResolver<R> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: R, validator: Arc<dyn ClauseValidator>) -> Self {
        Self { inner, validator }
    }
}

impl<R: ClauseContextResolver> ClauseContextResolver for ValidatingResolver<R> {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        let messages = self
            .validator
            .validate(scope.user(), clause)
            .map_err(|err| annotate(err, clause))?;
        if !messages.is_empty() {
            tracing::debug!(field = clause.name(), ?messages, "invalid clause narrows nothing");
            return Ok(ClauseContext::universal());
        }
        self.inner.clause_context(scope, clause)
    }
}
