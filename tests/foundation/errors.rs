//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use querycontext_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_unexpected_negation() {
    let err = Error::unexpected_negation("NOT project = A");
    assert!(matches!(err.kind, ErrorKind::UnexpectedNegation { .. }));
    assert!(format!("{err}").contains("NOT project = A"));
}

#[test]
fn error_malformed_literal() {
    let err = Error::malformed_literal("issue in (EMPTY)", "EMPTY has no key");
    assert!(matches!(err.kind, ErrorKind::MalformedLiteral { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("issue in (EMPTY)"));
    assert!(msg.contains("EMPTY has no key"));
}

#[test]
fn error_collaborator() {
    let err = Error::collaborator("permission manager", "connection reset");
    assert!(matches!(err.kind, ErrorKind::Collaborator { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("permission manager"));
    assert!(msg.contains("connection reset"));
}

#[test]
fn error_internal() {
    let err = Error::internal("unreachable state");
    assert!(matches!(err.kind, ErrorKind::Internal(_)));
    assert!(format!("{err}").contains("unreachable state"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_without_context() {
    let err = Error::internal("boom");
    assert!(err.context.is_none());
}

#[test]
fn error_with_context() {
    let context = ErrorContext::new()
        .with_field("issue")
        .with_clause("issue in (EMPTY)")
        .with_filter("My open bugs");
    let err = Error::internal("boom").with_context(context);

    let context = err.context.as_ref().unwrap();
    assert_eq!(context.field.as_deref(), Some("issue"));
    assert_eq!(context.filters, vec!["My open bugs".to_string()]);

    let rendered = context.to_string();
    assert!(rendered.contains("resolving field issue"));
    assert!(rendered.contains("via filter My open bugs"));
}

#[test]
fn error_is_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&Error::internal("boom"));
}
