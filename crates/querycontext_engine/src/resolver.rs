//! The per-clause resolver contract.

use querycontext_foundation::{ClauseContext, Error, ErrorContext, Result, User};
use querycontext_query::{Clause, Operator, QueryLiteral, TerminalClause};

use crate::collaborators::{FilterId, OperandResolver, SavedFilter};
use crate::config::EngineConfig;
use crate::engine::QueryContextEngine;
use crate::registry::ClauseHandlerRegistry;
use crate::visitor::ContextResult;

/// Turns one terminal predicate into the context it can reach.
///
/// Resolvers are stateless and shared across evaluations. A resolver never
/// returns an empty context: "cannot narrow" is the universal context.
pub trait ClauseContextResolver: Send + Sync {
    /// The context of `clause` for the actor in `scope`.
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures and malformed literals.
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext>;
}

/// Per-evaluation state handed to resolvers.
///
/// Carries the actor, a way back into the engine for resolvers that expand
/// other queries, and the chain of saved filters currently being expanded.
pub struct EvaluationScope<'a> {
    user: Option<&'a User>,
    engine: &'a QueryContextEngine,
    filters: Vec<FilterId>,
}

impl<'a> EvaluationScope<'a> {
    pub(crate) fn new(engine: &'a QueryContextEngine, user: Option<&'a User>) -> Self {
        Self {
            user,
            engine,
            filters: Vec::new(),
        }
    }

    /// The actor the query is evaluated for.
    #[must_use]
    pub fn user(&self) -> Option<&'a User> {
        self.user
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        self.engine.config()
    }

    /// The field-handler registry.
    #[must_use]
    pub fn registry(&self) -> &dyn ClauseHandlerRegistry {
        self.engine.registry()
    }

    /// Returns true if `filter` is already being expanded further up.
    #[must_use]
    pub fn is_expanding(&self, filter: FilterId) -> bool {
        self.filters.contains(&filter)
    }

    /// Evaluates a clause tree on behalf of a saved filter.
    ///
    /// The tree is treated as a new root, so it is normalized first.
    ///
    /// # Errors
    ///
    /// Propagates evaluation failures, annotated with the filter chain.
    pub fn evaluate_filter(&self, filter: &SavedFilter, clause: &Clause) -> Result<ContextResult> {
        let mut filters = self.filters.clone();
        filters.push(filter.id);
        let nested = EvaluationScope {
            user: self.user,
            engine: self.engine,
            filters,
        };
        self.engine.evaluate(&nested, clause).map_err(|err| {
            let context = err.context.clone().unwrap_or_default().with_filter(filter.name.clone());
            err.with_context(context)
        })
    }
}

// =============================================================================
// Helpers shared by resolvers
// =============================================================================

/// The literals of a clause's operand, or `None` if they cannot be resolved.
pub(crate) fn clause_literals(
    operands: &dyn OperandResolver,
    scope: &EvaluationScope<'_>,
    clause: &TerminalClause,
) -> Result<Option<Vec<QueryLiteral>>> {
    operands
        .values(scope.user(), clause.operand(), clause)
        .map_err(|err| annotate(err, clause))
}

/// Attaches the clause being resolved to an error.
pub(crate) fn annotate(err: Error, clause: &TerminalClause) -> Error {
    if err.context.is_some() {
        return err;
    }
    err.with_context(
        ErrorContext::new()
            .with_field(clause.name())
            .with_clause(clause.to_string()),
    )
}

/// Logs and returns the universal context for an operator a resolver
/// cannot narrow.
pub(crate) fn unsupported(clause: &TerminalClause) -> ClauseContext {
    tracing::debug!(
        field = clause.name(),
        operator = %clause.operator(),
        "operator cannot narrow the context"
    );
    ClauseContext::universal()
}

/// Returns true if the operator is in `supported`.
pub(crate) fn supports(clause: &TerminalClause, supported: &[Operator]) -> bool {
    clause.operator().is_one_of(supported)
}
