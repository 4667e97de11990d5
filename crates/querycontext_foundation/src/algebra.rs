//! Union and intersection over clause contexts.
//!
//! `union` models OR and `intersect` models AND. Inputs are combined raw;
//! only the result is normalized, so an empty result becomes universal and
//! neither can ever answer "impossible".

use crate::context::ClauseContext;

/// Union of the given contexts.
///
/// The universal context absorbs: if any input is universal, the result is
/// universal. Otherwise the result is the plain set union of the inputs, so
/// an empty input contributes nothing.
#[must_use]
pub fn union<I>(contexts: I) -> ClauseContext
where
    I: IntoIterator<Item = ClauseContext>,
{
    let mut acc = ClauseContext::empty();
    for ctx in contexts {
        if ctx.is_universal() {
            return ClauseContext::universal();
        }
        acc = acc.raw_union(ctx);
    }
    acc.normalized()
}

/// Intersection of the given contexts.
///
/// Pairs are met component-wise: `AllContainers` or `AllCategories` yields to
/// the other side, concrete ids survive only when equal. The universal
/// context is the identity. An empty input empties the raw result, and an
/// empty raw result becomes universal.
#[must_use]
pub fn intersect<I>(contexts: I) -> ClauseContext
where
    I: IntoIterator<Item = ClauseContext>,
{
    let mut contexts = contexts.into_iter();
    let Some(first) = contexts.next() else {
        return ClauseContext::universal();
    };
    let mut acc = first;
    for ctx in contexts {
        if ctx.is_universal() {
            continue;
        }
        acc = acc.raw_meet(&ctx);
        if acc.is_empty() {
            break;
        }
    }
    acc.normalized()
}
