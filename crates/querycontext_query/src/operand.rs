//! Operands and the literal values they resolve to.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use querycontext_foundation::{Error, Result};

// =============================================================================
// QueryLiteral
// =============================================================================

/// A single value an operand denotes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QueryLiteral {
    /// A string value, e.g. a name or a key.
    Str(String),
    /// A numeric value, usually an id.
    Number(i64),
    /// The EMPTY value.
    Empty,
}

/// A literal that is known to carry a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralKey<'a> {
    /// String form.
    Str(&'a str),
    /// Numeric form.
    Number(i64),
}

impl QueryLiteral {
    /// Creates a string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// Returns true for the EMPTY literal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Decodes the literal into its string or numeric form.
    ///
    /// # Errors
    ///
    /// Returns `MalformedLiteral` for EMPTY, which has neither form.
    pub fn key(&self) -> Result<LiteralKey<'_>> {
        match self {
            Self::Str(s) => Ok(LiteralKey::Str(s)),
            Self::Number(n) => Ok(LiteralKey::Number(*n)),
            Self::Empty => Err(Error::malformed_literal(
                self.to_string(),
                "EMPTY has neither a string nor a numeric form",
            )),
        }
    }
}

impl From<&str> for QueryLiteral {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for QueryLiteral {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for QueryLiteral {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for QueryLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Self::Number(n) => write!(f, "{n}"),
            Self::Empty => f.write_str("EMPTY"),
        }
    }
}

impl fmt::Display for LiteralKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

// =============================================================================
// Operand
// =============================================================================

/// The right-hand side of a predicate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operand {
    /// One literal.
    Single(QueryLiteral),
    /// A parenthesised list of operands.
    Multi(Vec<Operand>),
    /// `EMPTY`.
    Empty,
    /// A function call such as `currentUser()`, resolved by the operand
    /// resolver.
    Function {
        /// Function name.
        name: String,
        /// Raw argument strings.
        args: Vec<String>,
    },
}

impl Operand {
    /// A single string operand.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Single(QueryLiteral::Str(value.into()))
    }

    /// A single numeric operand.
    #[must_use]
    pub fn number(value: i64) -> Self {
        Self::Single(QueryLiteral::Number(value))
    }

    /// A list operand.
    #[must_use]
    pub fn list(values: impl IntoIterator<Item = Operand>) -> Self {
        Self::Multi(values.into_iter().collect())
    }

    /// A function-call operand.
    #[must_use]
    pub fn function(name: impl Into<String>, args: impl IntoIterator<Item = String>) -> Self {
        Self::Function {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Returns true for `EMPTY`, or a single EMPTY literal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty | Self::Single(QueryLiteral::Empty))
    }

    /// The literals written directly in the operand, in order.
    ///
    /// Lists are flattened and `EMPTY` yields [`QueryLiteral::Empty`].
    /// Returns `None` when any part is a function call, which only an
    /// operand resolver can evaluate.
    #[must_use]
    pub fn literals(&self) -> Option<Vec<QueryLiteral>> {
        let mut out = Vec::new();
        self.collect_literals(&mut out).then_some(out)
    }

    fn collect_literals(&self, out: &mut Vec<QueryLiteral>) -> bool {
        match self {
            Self::Single(literal) => {
                out.push(literal.clone());
                true
            }
            Self::Empty => {
                out.push(QueryLiteral::Empty);
                true
            }
            Self::Multi(items) => items.iter().all(|item| item.collect_literals(out)),
            Self::Function { .. } => false,
        }
    }
}

impl From<QueryLiteral> for Operand {
    fn from(literal: QueryLiteral) -> Self {
        match literal {
            QueryLiteral::Empty => Self::Empty,
            other => Self::Single(other),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(literal) => write!(f, "{literal}"),
            Self::Empty => f.write_str("EMPTY"),
            Self::Multi(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
            Self::Function { name, args } => write!(f, "{name}({})", args.join(", ")),
        }
    }
}
