//! Single and cascading select custom fields.

use std::collections::BTreeSet;
use std::sync::Arc;

use querycontext_foundation::{ClauseContext, Result, union};
use querycontext_query::{Operator, QueryLiteral, TerminalClause};

use crate::collaborators::{
    CascadingOptionDecomposer, ClauseValidator, CustomFieldOptions, FieldConfigSchemes, OperandResolver, OptionId,
    SelectOption,
};
use crate::resolver::{ClauseContextResolver, EvaluationScope, annotate, clause_literals, supports};
use crate::scheme::SchemeContexts;

// =============================================================================
// Shared scheme search
// =============================================================================

/// The options a clause asks for.
///
/// `None` in `positive` stands for the `EMPTY` literal.
#[derive(Debug, Default)]
struct Selection {
    positive: BTreeSet<Option<OptionId>>,
    negative: BTreeSet<OptionId>,
    negative_mode: bool,
}

impl Selection {
    fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }

    fn excludes(&self, option: &SelectOption) -> bool {
        self.negative.contains(&option.id) || option.parent.is_some_and(|parent| self.negative.contains(&parent))
    }

    fn satisfied_by(&self, options: &[SelectOption]) -> bool {
        if self.negative_mode {
            return options
                .iter()
                .any(|option| !self.positive.contains(&Some(option.id)) && !self.negative.contains(&option.id));
        }
        if self.positive.contains(&None) {
            return true;
        }
        options
            .iter()
            .filter(|option| !self.excludes(option))
            .any(|option| self.positive.contains(&Some(option.id)))
    }
}

#[derive(Clone)]
struct SchemeSearch {
    field_id: String,
    operands: Arc<dyn OperandResolver>,
    schemes: Arc<dyn FieldConfigSchemes>,
    options: Arc<dyn CustomFieldOptions>,
    scheme_contexts: SchemeContexts,
    validator: Option<Arc<dyn ClauseValidator>>,
}

impl SchemeSearch {
    /// The clause's literals, or `None` if every scheme should be included.
    fn literals(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<Option<Vec<QueryLiteral>>> {
        if !supports(clause, Operator::EQUALITY_OPERATORS_WITH_EMPTY) {
            tracing::debug!(
                field = clause.name(),
                operator = %clause.operator(),
                "operator cannot select options; including every scheme"
            );
            return Ok(None);
        }
        if let Some(validator) = &self.validator {
            let messages = validator
                .validate(scope.user(), clause)
                .map_err(|err| annotate(err, clause))?;
            if !messages.is_empty() {
                tracing::debug!(field = clause.name(), ?messages, "clause is invalid; including every scheme");
                return Ok(None);
            }
        }
        clause_literals(self.operands.as_ref(), scope, clause)
    }

    fn option_ids(
        &self,
        scope: &EvaluationScope<'_>,
        literals: &[QueryLiteral],
    ) -> Result<Vec<Option<OptionId>>> {
        let mut ids = Vec::new();
        for literal in literals {
            if literal.is_empty() {
                ids.push(None);
            } else {
                ids.extend(
                    self.options
                        .option_ids(scope.user(), &self.field_id, literal)?
                        .into_iter()
                        .map(Some),
                );
            }
        }
        Ok(ids)
    }

    /// Unions the contexts of the schemes whose options satisfy `selection`;
    /// `None` includes every scheme. Scheme contexts are unioned raw, so a
    /// scheme the actor cannot see adds nothing.
    fn context(&self, scope: &EvaluationScope<'_>, selection: Option<&Selection>) -> Result<ClauseContext> {
        let schemes = self.schemes.schemes(&self.field_id)?;
        if schemes.is_empty() || schemes.iter().any(|scheme| scheme.is_global()) {
            return Ok(ClauseContext::universal());
        }

        let mut contexts = Vec::new();
        for scheme in &schemes {
            let satisfied = match selection {
                None => true,
                Some(selection) => selection.satisfied_by(&self.options.scheme_options(&self.field_id, scheme)?),
            };
            if satisfied {
                contexts.push(self.scheme_contexts.context_for(scope.user(), scheme)?);
            }
        }
        Ok(union(contexts))
    }
}

// =============================================================================
// Single select
// =============================================================================

/// Resolves predicates on a single-select custom field.
///
/// The field only exists where one of its configuration schemes applies, so
/// the context is the union of the schemes that offer a matching option.
/// Unsupported operators, invalid clauses and unresolved literals include
/// every scheme.
#[derive(Clone)]
pub struct SelectResolver {
    search: SchemeSearch,
}

impl SelectResolver {
    /// Creates the resolver for custom field `field_id`.
    #[must_use]
    pub fn new(
        field_id: impl Into<String>,
        operands: Arc<dyn OperandResolver>,
        schemes: Arc<dyn FieldConfigSchemes>,
        options: Arc<dyn CustomFieldOptions>,
        scheme_contexts: SchemeContexts,
    ) -> Self {
        Self {
            search: SchemeSearch {
                field_id: field_id.into(),
                operands,
                schemes,
                options,
                scheme_contexts,
                validator: None,
            },
        }
    }

    /// Validates clauses before resolving their literals.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn ClauseValidator>) -> Self {
        self.search.validator = Some(validator);
        self
    }
}

impl ClauseContextResolver for SelectResolver {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        let Some(literals) = self.search.literals(scope, clause)? else {
            return self.search.context(scope, None);
        };
        let selection = Selection {
            positive: self.search.option_ids(scope, &literals)?.into_iter().collect(),
            negative: BTreeSet::new(),
            negative_mode: clause.operator().is_negative(),
        };
        if selection.is_empty() {
            return self.search.context(scope, None);
        }
        self.search.context(scope, Some(&selection))
    }
}

// =============================================================================
// Cascading select
// =============================================================================

/// Resolves predicates on a cascading-select custom field.
///
/// Literals are split by a [`CascadingOptionDecomposer`] into chosen and
/// excluded options. An excluded option also excludes its children.
#[derive(Clone)]
pub struct CascadingSelectResolver {
    search: SchemeSearch,
    decomposer: Arc<dyn CascadingOptionDecomposer>,
}

impl CascadingSelectResolver {
    /// Creates the resolver for custom field `field_id`.
    #[must_use]
    pub fn new(
        field_id: impl Into<String>,
        operands: Arc<dyn OperandResolver>,
        schemes: Arc<dyn FieldConfigSchemes>,
        options: Arc<dyn CustomFieldOptions>,
        scheme_contexts: SchemeContexts,
        decomposer: Arc<dyn CascadingOptionDecomposer>,
    ) -> Self {
        Self {
            search: SchemeSearch {
                field_id: field_id.into(),
                operands,
                schemes,
                options,
                scheme_contexts,
                validator: None,
            },
            decomposer,
        }
    }

    /// Validates clauses before resolving their literals.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn ClauseValidator>) -> Self {
        self.search.validator = Some(validator);
        self
    }
}

impl ClauseContextResolver for CascadingSelectResolver {
    fn clause_context(&self, scope: &EvaluationScope<'_>, clause: &TerminalClause) -> Result<ClauseContext> {
        let Some(literals) = self.search.literals(scope, clause)? else {
            return self.search.context(scope, None);
        };
        let (positive, negative) = self.decomposer.decompose(literals);
        let selection = Selection {
            positive: self.search.option_ids(scope, &positive)?.into_iter().collect(),
            negative: self.search.option_ids(scope, &negative)?.into_iter().flatten().collect(),
            negative_mode: clause.operator().is_negative(),
        };
        if selection.is_empty() {
            return self.search.context(scope, None);
        }
        self.search.context(scope, Some(&selection))
    }
}
