//! The `text` pseudo-field.

use querycontext_foundation::{ClauseContext, Result, union};
use querycontext_query::TerminalClause;

use crate::resolver::{ClauseContextResolver, EvaluationScope};

/// Resolves the `text` pseudo-field.
///
/// A free-text search matches if any contributing field matches, so the
/// context is the union of every free-text handler's context for the same
/// predicate, re-addressed to that handler's primary name.
#[derive(Clone, Copy, Debug, Default)]
pub struct FreeTextResolver;

impl ClauseContextResolver for FreeTextResolver {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        let handlers = scope.registry().free_text_handlers(scope.user())?;
        let mut contexts = Vec::with_capacity(handlers.len());
        for handler in &handlers {
            let addressed = clause.with_name(handler.names().primary());
            contexts.push(handler.resolver().clause_context(scope, &addressed)?);
        }
        tracing::trace!(handlers = handlers.len(), "free-text contexts collected");
        Ok(union(contexts))
    }
}
