//! Issue identity: `issue` and `parent` lookups, batched.

use std::sync::Arc;

use querycontext_foundation::{ClauseContext, ContainerCategoryContext, Result};
use querycontext_query::{LiteralKey, Operator, QueryLiteral, TerminalClause};

use crate::collaborators::{IssueLookup, IssueRef, OperandResolver};
use crate::resolver::{ClauseContextResolver, EvaluationScope, annotate, clause_literals, supports, unsupported};

const EQUALITY: &[Operator] = &[Operator::Equals, Operator::In];

/// Resolves literals to issues, a bounded batch at a time.
#[derive(Clone)]
struct BatchedLookup {
    operands: Arc<dyn OperandResolver>,
    issues: Arc<dyn IssueLookup>,
}

impl BatchedLookup {
    fn issues(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<Option<Vec<IssueRef>>> {
        let Some(literals) = clause_literals(self.operands.as_ref(), scope, clause)? else {
            return Ok(None);
        };
        let (ids, keys) = split_literals(&literals).map_err(|err| annotate(err, clause))?;

        let batch = scope.config().batch_size();
        let mut issues = Vec::new();
        for chunk in ids.chunks(batch) {
            issues.extend(self.issues.issues_by_id(scope.user(), chunk)?);
        }
        for chunk in keys.chunks(batch) {
            issues.extend(self.issues.issues_by_key(scope.user(), chunk)?);
        }
        tracing::trace!(
            field = clause.name(),
            literals = literals.len(),
            found = issues.len(),
            "issues resolved"
        );
        Ok(Some(issues))
    }
}

/// Numbers are issue ids, strings are issue keys.
fn split_literals(literals: &[QueryLiteral]) -> Result<(Vec<i64>, Vec<String>)> {
    let mut ids = Vec::new();
    let mut keys = Vec::new();
    for literal in literals {
        match literal.key()? {
            LiteralKey::Number(id) => ids.push(id),
            LiteralKey::Str(key) => keys.push(key.to_string()),
        }
    }
    Ok((ids, keys))
}

fn issue_pairs(issues: impl IntoIterator<Item = IssueRef>) -> ClauseContext {
    issues
        .into_iter()
        .map(|issue| ContainerCategoryContext::of(issue.container, issue.category))
        .collect::<ClauseContext>()
        .normalized()
}

// =============================================================================
// Issue id / key
// =============================================================================

/// Resolves `issue` (`id`, `key`) predicates.
///
/// Equality yields each issue's own (container, category); an ordering
/// comparison only pins the container. Negation narrows nothing.
#[derive(Clone)]
pub struct IssueIdResolver {
    lookup: BatchedLookup,
}

impl IssueIdResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new(operands: Arc<dyn OperandResolver>, issues: Arc<dyn IssueLookup>) -> Self {
        Self {
            lookup: BatchedLookup { operands, issues },
        }
    }
}

impl ClauseContextResolver for IssueIdResolver {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        let relational = clause.operator().is_relational();
        if !relational && !supports(clause, EQUALITY) {
            return Ok(unsupported(clause));
        }
        let Some(issues) = self.lookup.issues(scope, clause)? else {
            return Ok(ClauseContext::universal());
        };

        if relational {
            return Ok(issues
                .into_iter()
                .map(|issue| ContainerCategoryContext::container(issue.container))
                .collect::<ClauseContext>()
                .normalized());
        }
        Ok(issue_pairs(issues))
    }
}

// =============================================================================
// Issue parent
// =============================================================================

/// Resolves `parent` predicates: the context of the named issues' children.
#[derive(Clone)]
pub struct IssueParentResolver {
    lookup: BatchedLookup,
}

impl IssueParentResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new(operands: Arc<dyn OperandResolver>, issues: Arc<dyn IssueLookup>) -> Self {
        Self {
            lookup: BatchedLookup { operands, issues },
        }
    }
}

impl ClauseContextResolver for IssueParentResolver {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        if !supports(clause, EQUALITY) {
            return Ok(unsupported(clause));
        }
        let Some(parents) = self.lookup.issues(scope, clause)? else {
            return Ok(ClauseContext::universal());
        };

        let mut children = Vec::new();
        for parent in parents {
            children.extend(self.lookup.issues.children(scope.user(), parent.id)?);
        }
        Ok(issue_pairs(children))
    }
}
