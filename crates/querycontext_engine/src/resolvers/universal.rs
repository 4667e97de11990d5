//! Fields that never narrow the context.

use querycontext_foundation::{ClauseContext, Result};
use querycontext_query::TerminalClause;

use crate::resolver::{ClauseContextResolver, EvaluationScope};

/// For fields that never narrow the context (summary, dates, votes...).
#[derive(Clone, Copy, Debug, Default)]
pub struct UniversalResolver;

impl ClauseContextResolver for UniversalResolver {
    fn clause_context(&self, _scope: &EvaluationScope<'_>, _clause: &TerminalClause) -> Result<ClauseContext> {
        Ok(ClauseContext::universal())
    }
}
