//! Boolean clause trees.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::operand::Operand;
use crate::operator::Operator;

/// A node of a query's WHERE tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Clause {
    /// All children must hold.
    And(Vec<Clause>),
    /// At least one child must hold.
    Or(Vec<Clause>),
    /// The child must not hold.
    Not(Box<Clause>),
    /// `field operator operand`.
    Terminal(TerminalClause),
    /// `field was ...`, a predicate over past values.
    Was(WasClause),
    /// `field changed`, a predicate over value transitions.
    Changed(ChangedClause),
}

impl Clause {
    /// An AND node.
    #[must_use]
    pub fn and(children: impl IntoIterator<Item = Clause>) -> Self {
        Self::And(children.into_iter().collect())
    }

    /// An OR node.
    #[must_use]
    pub fn or(children: impl IntoIterator<Item = Clause>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    /// A NOT node.
    #[must_use]
    pub fn not(child: Clause) -> Self {
        Self::Not(Box::new(child))
    }

    /// A terminal predicate.
    #[must_use]
    pub fn terminal(name: impl Into<String>, operator: Operator, operand: impl Into<Operand>) -> Self {
        Self::Terminal(TerminalClause::new(name, operator, operand))
    }

    /// Returns true if a NOT node appears anywhere in the tree.
    #[must_use]
    pub fn contains_not(&self) -> bool {
        match self {
            Self::Not(_) => true,
            Self::And(children) | Self::Or(children) => children.iter().any(Self::contains_not),
            Self::Terminal(_) | Self::Was(_) | Self::Changed(_) => false,
        }
    }

    fn is_compound(&self) -> bool {
        matches!(self, Self::And(_) | Self::Or(_))
    }
}

impl From<TerminalClause> for Clause {
    fn from(clause: TerminalClause) -> Self {
        Self::Terminal(clause)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(children) => write_joined(f, children, " AND "),
            Self::Or(children) => write_joined(f, children, " OR "),
            Self::Not(child) if child.is_compound() => write!(f, "NOT ({child})"),
            Self::Not(child) => write!(f, "NOT {child}"),
            Self::Terminal(clause) => write!(f, "{clause}"),
            Self::Was(clause) => write!(f, "{clause}"),
            Self::Changed(clause) => write!(f, "{clause}"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Clause], separator: &str) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        if child.is_compound() {
            write!(f, "({child})")?;
        } else {
            write!(f, "{child}")?;
        }
    }
    Ok(())
}

// =============================================================================
// Leaf clauses
// =============================================================================

/// `field operator operand`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TerminalClause {
    name: String,
    operator: Operator,
    operand: Operand,
}

impl TerminalClause {
    /// Creates a terminal predicate.
    #[must_use]
    pub fn new(name: impl Into<String>, operator: Operator, operand: impl Into<Operand>) -> Self {
        Self {
            name: name.into(),
            operator,
            operand: operand.into(),
        }
    }

    /// The field name as written in the query.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The operator.
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The operand.
    #[must_use]
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// The same predicate with another field name.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// The same predicate with another operator.
    #[must_use]
    pub fn with_operator(&self, operator: Operator) -> Self {
        Self {
            operator,
            ..self.clone()
        }
    }

    /// The same predicate with another operand.
    #[must_use]
    pub fn with_operand(&self, operand: Operand) -> Self {
        Self {
            operand,
            ..self.clone()
        }
    }
}

impl fmt::Display for TerminalClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.operator, self.operand)
    }
}

/// `field was operand` and its variants.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WasClause {
    /// The field name.
    pub field: String,
    /// One of `was`, `was not`, `was in`, `was not in`.
    pub operator: Operator,
    /// The operand.
    pub operand: Operand,
}

impl fmt::Display for WasClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.operand)
    }
}

/// `field changed`, optionally negated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChangedClause {
    /// The field name.
    pub field: String,
    /// True for "has not changed".
    pub negated: bool,
}

impl fmt::Display for ChangedClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "NOT {} changed", self.field)
        } else {
            write!(f, "{} changed", self.field)
        }
    }
}
