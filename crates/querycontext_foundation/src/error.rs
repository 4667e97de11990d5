//! Error types for querycontext.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Most anomalies met while resolving a clause are not errors: an operator a
//! field cannot narrow, a cycle between saved filters, or a corrupt workflow
//! all degrade to the universal context. Only the cases below surface.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the querycontext crates.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for querycontext operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an error for a NOT node met below the root of a clause tree.
    #[must_use]
    pub fn unexpected_negation(clause: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnexpectedNegation {
            clause: clause.into(),
        })
    }

    /// Creates an error for a literal that cannot be decoded into a key.
    #[must_use]
    pub fn malformed_literal(clause: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedLiteral {
            clause: clause.into(),
            reason: reason.into(),
        })
    }

    /// Creates an error reported by an external collaborator.
    #[must_use]
    pub fn collaborator(collaborator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Collaborator {
            collaborator: collaborator.into(),
            message: message.into(),
        })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A NOT clause reached the combination visitor below the root.
    ///
    /// The normalizer must have removed every NOT before descent.
    #[error("unexpected NOT below the root: {clause}")]
    UnexpectedNegation {
        /// The offending clause, rendered.
        clause: String,
    },

    /// A literal was neither a string nor a number where one is required.
    #[error("malformed literal in {clause}: {reason}")]
    MalformedLiteral {
        /// The clause holding the literal, rendered.
        clause: String,
        /// Why the literal could not be decoded.
        reason: String,
    },

    /// An external collaborator (visibility, lookup, registry...) failed.
    #[error("{collaborator} failed: {message}")]
    Collaborator {
        /// Name of the collaborator.
        collaborator: String,
        /// The failure it reported.
        message: String,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Field (clause name) being resolved.
    pub field: Option<String>,
    /// Rendered clause being resolved.
    pub clause: Option<String>,
    /// Enclosing saved filters, innermost first.
    pub filters: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field name.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the rendered clause.
    #[must_use]
    pub fn with_clause(mut self, clause: impl Into<String>) -> Self {
        self.clause = Some(clause.into());
        self
    }

    /// Adds an enclosing saved filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "resolving field {field}")?;
        }
        if let Some(clause) = &self.clause {
            write!(f, " in `{clause}`")?;
        }
        for filter in &self.filters {
            write!(f, "\n  via filter {filter}")?;
        }
        Ok(())
    }
}
