//! Query-language clause trees for querycontext.
//!
//! This crate provides:
//! - [`Operator`] - predicate operators and their negations
//! - [`Operand`] and [`QueryLiteral`] - what a predicate compares against
//! - [`Clause`] - boolean clause trees (AND, OR, NOT, terminal, WAS, CHANGED)
//! - [`NegationNormalizer`] - pushes NOT down to the predicates
//!
//! Clauses render back to query text through `Display`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clause;
pub mod normalize;
pub mod operand;
pub mod operator;

pub use clause::{ChangedClause, Clause, TerminalClause, WasClause};
pub use normalize::{DeMorganNormalizer, NegationNormalizer};
pub use operand::{LiteralKey, Operand, QueryLiteral};
pub use operator::Operator;
