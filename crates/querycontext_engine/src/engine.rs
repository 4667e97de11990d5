//! The engine entry point.

use std::fmt;
use std::sync::Arc;

use querycontext_foundation::{QueryContext, Result, User};
use querycontext_query::{Clause, DeMorganNormalizer, NegationNormalizer};

use crate::config::EngineConfig;
use crate::registry::ClauseHandlerRegistry;
use crate::resolver::EvaluationScope;
use crate::visitor::{ContextResult, Position};

/// Computes the context of clause trees.
///
/// The engine holds no per-evaluation state: every call builds its own
/// [`EvaluationScope`], so one engine can serve concurrent evaluations.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use querycontext_engine::{FieldRegistry, QueryContextEngine};
/// use querycontext_query::{Clause, Operand, Operator};
///
/// let engine = QueryContextEngine::new(Arc::new(FieldRegistry::new()));
/// let clause = Clause::terminal("summary", Operator::Like, Operand::string("crash"));
/// let result = engine.context(None, &clause).unwrap();
/// assert!(result.full.is_universal());
/// ```
#[derive(Clone)]
pub struct QueryContextEngine {
    registry: Arc<dyn ClauseHandlerRegistry>,
    normalizer: Arc<dyn NegationNormalizer>,
    config: EngineConfig,
}

impl QueryContextEngine {
    /// Creates an engine with the default configuration and De Morgan
    /// normalization.
    #[must_use]
    pub fn new(registry: Arc<dyn ClauseHandlerRegistry>) -> Self {
        Self {
            registry,
            normalizer: Arc::new(DeMorganNormalizer),
            config: EngineConfig::default(),
        }
    }

    /// Builder method to set the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder method to replace the negation normalizer.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: Arc<dyn NegationNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The field-handler registry.
    #[must_use]
    pub fn registry(&self) -> &dyn ClauseHandlerRegistry {
        self.registry.as_ref()
    }

    pub(crate) fn normalizer(&self) -> &dyn NegationNormalizer {
        self.normalizer.as_ref()
    }

    /// The (full, simple) context of a clause tree for an actor.
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures and malformed literals, and fails
    /// with `UnexpectedNegation` if a NOT survives normalization.
    pub fn context(&self, user: Option<&User>, clause: &Clause) -> Result<ContextResult> {
        let scope = EvaluationScope::new(self, user);
        self.evaluate(&scope, clause)
    }

    /// The projected full context of a query. A query without a WHERE
    /// clause can match anything.
    ///
    /// # Errors
    ///
    /// See [`QueryContextEngine::context`].
    pub fn query_context(&self, user: Option<&User>, clause: Option<&Clause>) -> Result<QueryContext> {
        match clause {
            None => Ok(QueryContext::universal()),
            Some(clause) => Ok(QueryContext::new(&self.context(user, clause)?.full)),
        }
    }

    /// The projected simple context of a query.
    ///
    /// # Errors
    ///
    /// See [`QueryContextEngine::context`].
    pub fn simple_query_context(&self, user: Option<&User>, clause: Option<&Clause>) -> Result<QueryContext> {
        match clause {
            None => Ok(QueryContext::universal()),
            Some(clause) => Ok(QueryContext::new(&self.context(user, clause)?.simple)),
        }
    }

    pub(crate) fn evaluate(&self, scope: &EvaluationScope<'_>, clause: &Clause) -> Result<ContextResult> {
        Ok(self.visit(scope, clause, Position::Root)?.normalized())
    }
}

impl fmt::Debug for QueryContextEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryContextEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
