//! Negation push-down.
//!
//! Context evaluation never sees a NOT node: before descent the tree is
//! rewritten so that negation lives in the predicates' operators.

use crate::clause::{ChangedClause, Clause, WasClause};

/// Rewrites a clause tree into an equivalent one without NOT nodes.
pub trait NegationNormalizer: Send + Sync {
    /// Returns the normalized tree.
    fn normalize(&self, clause: &Clause) -> Clause;
}

/// De Morgan normalization.
///
/// `NOT (a AND b)` becomes `NOT a OR NOT b`, `NOT (a OR b)` becomes
/// `NOT a AND NOT b`, double negation cancels, and a negated predicate takes
/// the complementary operator (`=` becomes `!=`, `>` becomes `<=`, ...).
/// A negated `changed` flips its own flag.
///
/// A predicate whose operator has no complement keeps its NOT.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeMorganNormalizer;

impl DeMorganNormalizer {
    fn push(clause: &Clause, negate: bool) -> Clause {
        match clause {
            Clause::And(children) => {
                let children = children.iter().map(|c| Self::push(c, negate)).collect();
                if negate {
                    Clause::Or(children)
                } else {
                    Clause::And(children)
                }
            }
            Clause::Or(children) => {
                let children = children.iter().map(|c| Self::push(c, negate)).collect();
                if negate {
                    Clause::And(children)
                } else {
                    Clause::Or(children)
                }
            }
            Clause::Not(child) => Self::push(child, !negate),
            Clause::Terminal(terminal) if negate => match terminal.operator().negated() {
                Some(operator) => Clause::Terminal(terminal.with_operator(operator)),
                None => Clause::not(clause.clone()),
            },
            Clause::Was(was) if negate => match was.operator.negated() {
                Some(operator) => Clause::Was(WasClause {
                    operator,
                    ..was.clone()
                }),
                None => Clause::not(clause.clone()),
            },
            Clause::Changed(changed) if negate => Clause::Changed(ChangedClause {
                negated: !changed.negated,
                ..changed.clone()
            }),
            Clause::Terminal(_) | Clause::Was(_) | Clause::Changed(_) => clause.clone(),
        }
    }
}

impl NegationNormalizer for DeMorganNormalizer {
    fn normalize(&self, clause: &Clause) -> Clause {
        Self::push(clause, false)
    }
}
