//! Combination of clause contexts over a clause tree.
//!
//! The walk tracks two results in parallel. The full context honours every
//! predicate; the simple context honours only predicates that name
//! containers or categories explicitly and treats every other predicate as
//! universal.

use querycontext_foundation::{ClauseContext, Error, Result, intersect, union};
use querycontext_query::{Clause, TerminalClause};

use crate::engine::QueryContextEngine;
use crate::resolver::{EvaluationScope, annotate};

/// The (full, simple) pair computed for a clause tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextResult {
    /// Context honouring every predicate.
    pub full: ClauseContext,
    /// Context honouring only explicit container and category predicates.
    pub simple: ClauseContext,
}

impl ContextResult {
    /// Both sides universal.
    #[must_use]
    pub fn universal() -> Self {
        Self {
            full: ClauseContext::universal(),
            simple: ClauseContext::universal(),
        }
    }

    /// Replaces an empty side with the universal context.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            full: self.full.normalized(),
            simple: self.simple.normalized(),
        }
    }
}

/// Where the walk currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Position {
    /// The entry node; negation has not been pushed down yet.
    Root,
    /// Any node below the normalized root.
    Descendant,
}

#[derive(Clone, Copy)]
enum Combine {
    Intersect,
    Union,
}

impl Combine {
    fn apply(self, contexts: Vec<ClauseContext>) -> ClauseContext {
        match self {
            Self::Intersect => intersect(contexts),
            Self::Union => union(contexts),
        }
    }
}

impl QueryContextEngine {
    pub(crate) fn visit(
        &self,
        scope: &EvaluationScope<'_>,
        clause: &Clause,
        position: Position,
    ) -> Result<ContextResult> {
        match (position, clause) {
            (Position::Root, clause) => {
                let normalized = self.normalizer().normalize(clause);
                self.visit(scope, &normalized, Position::Descendant)
            }
            (Position::Descendant, Clause::And(children)) => {
                self.combine(scope, children, Combine::Intersect)
            }
            (Position::Descendant, Clause::Or(children)) => self.combine(scope, children, Combine::Union),
            (Position::Descendant, Clause::Not(_)) => Err(Error::unexpected_negation(clause.to_string())),
            (Position::Descendant, Clause::Terminal(terminal)) => self.terminal(scope, terminal),
            (Position::Descendant, Clause::Was(_) | Clause::Changed(_)) => {
                tracing::debug!(clause = %clause, "history clauses are not analysed");
                Ok(ContextResult::universal())
            }
        }
    }

    fn combine(
        &self,
        scope: &EvaluationScope<'_>,
        children: &[Clause],
        combine: Combine,
    ) -> Result<ContextResult> {
        let mut fulls = Vec::with_capacity(children.len());
        let mut simples = Vec::with_capacity(children.len());
        for child in children {
            let result = self.visit(scope, child, Position::Descendant)?;
            fulls.push(result.full);
            simples.push(result.simple);
        }

        let simple_differs = !same_multiset(&fulls, &simples);
        let full = combine.apply(fulls);
        let simple = if simple_differs {
            combine.apply(simples)
        } else {
            full.clone()
        };
        tracing::trace!(children = children.len(), %full, %simple, "combined children");
        Ok(ContextResult { full, simple })
    }

    fn terminal(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ContextResult> {
        let handlers = self
            .registry()
            .handlers(scope.user(), clause.name())
            .map_err(|err| annotate(err, clause))?;

        let mut contexts = Vec::with_capacity(handlers.len());
        for handler in &handlers {
            let context = handler
                .resolver()
                .clause_context(scope, clause)
                .map_err(|err| annotate(err, clause))?;
            if !context.is_empty() {
                contexts.push(context);
            }
        }

        let full = if contexts.is_empty() {
            ClauseContext::universal()
        } else {
            union(contexts)
        };
        let simple = if self.config().is_explicit(clause.name()) {
            full.clone()
        } else {
            ClauseContext::universal()
        };
        tracing::trace!(clause = %clause, handlers = handlers.len(), %full, "resolved terminal");
        Ok(ContextResult { full, simple })
    }
}

fn same_multiset(a: &[ClauseContext], b: &[ClauseContext]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<&ClauseContext> = a.iter().collect();
    let mut b: Vec<&ClauseContext> = b.iter().collect();
    a.sort();
    b.sort();
    a == b
}
