//! A field registry wired against an [`InMemoryCatalog`].

use std::sync::Arc;

use querycontext_engine::collaborators::{LiteralOperandResolver, OperandResolver, SignedLiteralDecomposer};
use querycontext_engine::resolvers::{
    AttributeResolver, CascadingSelectResolver, FieldSchemeResolver, FreeTextResolver, IssueIdResolver,
    IssueParentResolver, IssueTypeResolver, ProjectCategoryResolver, ProjectResolver, SavedFilterResolver,
    SecurityLevelResolver, SelectResolver, StatusResolver, UniversalResolver,
};
use querycontext_engine::{ClauseHandler, ClauseNames, FieldRegistry, SchemeContexts};

use crate::catalog::{CustomFieldKind, InMemoryCatalog};

/// System fields that never narrow the context.
const UNIVERSAL_FIELDS: [&str; 6] = ["priority", "resolution", "assignee", "reporter", "created", "votes"];

/// System text fields searched by `text ~`.
const TEXT_FIELDS: [&str; 4] = ["summary", "description", "comment", "environment"];

/// Registers the system fields and every custom field of `catalog`.
#[must_use]
pub fn standard_registry(catalog: &Arc<InMemoryCatalog>) -> FieldRegistry {
    let operands: Arc<dyn OperandResolver> = Arc::new(LiteralOperandResolver);
    let schemes = SchemeContexts::new(catalog.clone(), catalog.clone());

    let mut registry = FieldRegistry::new()
        .with(ClauseHandler::new(
            ClauseNames::new("project"),
            Arc::new(ProjectResolver::new(operands.clone(), catalog.clone(), catalog.clone())),
        ))
        .with(ClauseHandler::new(
            ClauseNames::new("category"),
            Arc::new(ProjectCategoryResolver::new(operands.clone(), catalog.clone(), catalog.clone())),
        ))
        .with(ClauseHandler::new(
            ClauseNames::new("issuetype").with_alias("type"),
            Arc::new(IssueTypeResolver::new(operands.clone(), catalog.clone())),
        ))
        .with(ClauseHandler::new(
            ClauseNames::new("component"),
            Arc::new(AttributeResolver::new(operands.clone(), catalog.components(), catalog.clone())),
        ))
        .with(ClauseHandler::new(
            ClauseNames::new("fixVersion").with_alias("affectedVersion"),
            Arc::new(AttributeResolver::new(operands.clone(), catalog.versions(), catalog.clone())),
        ))
        .with(ClauseHandler::new(
            ClauseNames::new("status"),
            Arc::new(StatusResolver::new(
                operands.clone(),
                catalog.clone(),
                catalog.clone(),
                catalog.clone(),
                catalog.clone(),
            )),
        ))
        .with(ClauseHandler::new(
            ClauseNames::new("issue")
                .with_alias("id")
                .with_alias("issuekey")
                .with_alias("key"),
            Arc::new(IssueIdResolver::new(operands.clone(), catalog.clone())),
        ))
        .with(ClauseHandler::new(
            ClauseNames::new("parent"),
            Arc::new(IssueParentResolver::new(operands.clone(), catalog.clone())),
        ))
        .with(ClauseHandler::new(
            ClauseNames::new("filter")
                .with_alias("savedFilter")
                .with_alias("request"),
            Arc::new(SavedFilterResolver::new(operands.clone(), catalog.clone(), catalog.clone())),
        ))
        .with(ClauseHandler::new(
            ClauseNames::new("level"),
            Arc::new(SecurityLevelResolver::new(operands.clone(), catalog.clone(), catalog.clone())),
        ))
        .with(ClauseHandler::new(ClauseNames::new("text"), Arc::new(FreeTextResolver)));

    for name in UNIVERSAL_FIELDS {
        registry.register(ClauseHandler::new(ClauseNames::new(name), Arc::new(UniversalResolver)));
    }
    for name in TEXT_FIELDS {
        registry.register(ClauseHandler::new(ClauseNames::new(name), Arc::new(UniversalResolver)).free_text());
    }

    for field in catalog.custom_fields() {
        let handler = match field.kind {
            CustomFieldKind::Select => ClauseHandler::new(
                field.clause_names(),
                Arc::new(
                    SelectResolver::new(
                        field.id(),
                        operands.clone(),
                        catalog.clone(),
                        catalog.clone(),
                        schemes.clone(),
                    )
                    .with_validator(catalog.clone()),
                ),
            ),
            CustomFieldKind::Cascading => ClauseHandler::new(
                field.clause_names(),
                Arc::new(
                    CascadingSelectResolver::new(
                        field.id(),
                        operands.clone(),
                        catalog.clone(),
                        catalog.clone(),
                        schemes.clone(),
                        Arc::new(SignedLiteralDecomposer),
                    )
                    .with_validator(catalog.clone()),
                ),
            ),
            CustomFieldKind::Text => ClauseHandler::new(
                field.clause_names(),
                Arc::new(FieldSchemeResolver::new(field.id(), catalog.clone(), schemes.clone())),
            )
            .free_text(),
        };
        registry.register(handler);
    }

    tracing::debug!(handlers = registry.len(), "standard registry built");
    registry
}
