//! Custom fields scoped only by where they are configured.

use std::sync::Arc;

use querycontext_foundation::{ClauseContext, Result, union};
use querycontext_query::TerminalClause;

use crate::collaborators::FieldConfigSchemes;
use crate::resolver::{ClauseContextResolver, EvaluationScope};
use crate::scheme::SchemeContexts;

/// Resolves a custom field to wherever it is configured, ignoring the
/// operand. Used for free-text custom fields, whose values cannot be
/// matched against options.
#[derive(Clone)]
pub struct FieldSchemeResolver {
    field_id: String,
    schemes: Arc<dyn FieldConfigSchemes>,
    scheme_contexts: SchemeContexts,
}

impl FieldSchemeResolver {
    /// Creates the resolver for custom field `field_id`.
    #[must_use]
    pub fn new(
        field_id: impl Into<String>,
        schemes: Arc<dyn FieldConfigSchemes>,
        scheme_contexts: SchemeContexts,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            schemes,
            scheme_contexts,
        }
    }
}

impl ClauseContextResolver for FieldSchemeResolver {
    fn clause_context(&self, scope: &EvaluationScope<'_>, _clause: &TerminalClause) -> Result<ClauseContext> {
        let schemes = self.schemes.schemes(&self.field_id)?;
        if schemes.iter().any(|scheme| scheme.is_global()) {
            return Ok(ClauseContext::universal());
        }
        let mut contexts = Vec::with_capacity(schemes.len());
        for scheme in &schemes {
            contexts.push(self.scheme_contexts.context_for(scope.user(), scheme)?);
        }
        Ok(union(contexts))
    }
}
