//! Predicate operators.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An operator comparing a field against an operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operator {
    /// `=`
    Equals,
    /// `!=`
    NotEquals,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanEquals,
    /// `<`
    LessThan,
    /// `<=`
    LessThanEquals,
    /// `in`
    In,
    /// `not in`
    NotIn,
    /// `~`
    Like,
    /// `!~`
    NotLike,
    /// `is`
    Is,
    /// `is not`
    IsNot,
    /// `was`
    Was,
    /// `was not`
    WasNot,
    /// `was in`
    WasIn,
    /// `was not in`
    WasNotIn,
    /// `changed`
    Changed,
}

impl Operator {
    /// `=`, `!=`, `in` and `not in`.
    pub const EQUALITY_OPERATORS: &'static [Self] =
        &[Self::Equals, Self::NotEquals, Self::In, Self::NotIn];

    /// The equality operators plus `is` and `is not`.
    pub const EQUALITY_OPERATORS_WITH_EMPTY: &'static [Self] = &[
        Self::Equals,
        Self::NotEquals,
        Self::In,
        Self::NotIn,
        Self::Is,
        Self::IsNot,
    ];

    /// `>`, `>=`, `<` and `<=`.
    pub const RELATIONAL_ONLY_OPERATORS: &'static [Self] = &[
        Self::GreaterThan,
        Self::GreaterThanEquals,
        Self::LessThan,
        Self::LessThanEquals,
    ];

    /// `~`, `!~`, `is` and `is not`.
    pub const TEXT_OPERATORS: &'static [Self] = &[Self::Like, Self::NotLike, Self::Is, Self::IsNot];

    /// The query-language spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanEquals => ">=",
            Self::LessThan => "<",
            Self::LessThanEquals => "<=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Like => "~",
            Self::NotLike => "!~",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::Was => "was",
            Self::WasNot => "was not",
            Self::WasIn => "was in",
            Self::WasNotIn => "was not in",
            Self::Changed => "changed",
        }
    }

    /// The complementary operator, if one exists.
    ///
    /// `changed` has none; its negation lives on the clause.
    #[must_use]
    pub const fn negated(self) -> Option<Self> {
        Some(match self {
            Self::Equals => Self::NotEquals,
            Self::NotEquals => Self::Equals,
            Self::GreaterThan => Self::LessThanEquals,
            Self::LessThanEquals => Self::GreaterThan,
            Self::GreaterThanEquals => Self::LessThan,
            Self::LessThan => Self::GreaterThanEquals,
            Self::In => Self::NotIn,
            Self::NotIn => Self::In,
            Self::Like => Self::NotLike,
            Self::NotLike => Self::Like,
            Self::Is => Self::IsNot,
            Self::IsNot => Self::Is,
            Self::Was => Self::WasNot,
            Self::WasNot => Self::Was,
            Self::WasIn => Self::WasNotIn,
            Self::WasNotIn => Self::WasIn,
            Self::Changed => return None,
        })
    }

    /// Returns true for operators that exclude their operand.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(
            self,
            Self::NotEquals | Self::NotIn | Self::IsNot | Self::NotLike | Self::WasNot | Self::WasNotIn
        )
    }

    /// Returns true for the positive equality class: `=`, `in` and `is`.
    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Equals | Self::In | Self::Is)
    }

    /// Returns true for ordering comparisons.
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::GreaterThanEquals | Self::LessThan | Self::LessThanEquals
        )
    }

    /// Returns true for operators taking a list operand.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::In | Self::NotIn | Self::WasIn | Self::WasNotIn)
    }

    /// Returns true for operators that only test for emptiness.
    #[must_use]
    pub const fn is_empty_only(self) -> bool {
        matches!(self, Self::Is | Self::IsNot)
    }

    /// Returns true for operators over past states.
    #[must_use]
    pub const fn is_history(self) -> bool {
        matches!(
            self,
            Self::Was | Self::WasNot | Self::WasIn | Self::WasNotIn | Self::Changed
        )
    }

    /// Returns true if the operator is one of `supported`.
    #[must_use]
    pub fn is_one_of(self, supported: &[Self]) -> bool {
        supported.contains(&self)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
