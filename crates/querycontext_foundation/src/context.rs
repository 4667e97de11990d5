//! Context value types.
//!
//! A [`ClauseContext`] is the set of (container, category) pairs a clause can
//! possibly match. Both halves of a pair may be the "all" sentinel, and the
//! pair `(AllContainers, AllCategories)` is the universal pair.
//!
//! The set is a thin wrapper around `im::OrdSet`: cloning is O(1) and
//! modifications return a new set sharing structure with the original.

use std::fmt;
use std::iter::FromIterator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{CategoryId, ContainerId};

// =============================================================================
// ContainerContext / CategoryContext
// =============================================================================

/// The container half of a context pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContainerContext {
    /// Every container.
    All,
    /// One specific container.
    Container(ContainerId),
}

impl ContainerContext {
    /// Returns the container id, or `None` for [`ContainerContext::All`].
    #[must_use]
    pub fn id(&self) -> Option<ContainerId> {
        match self {
            Self::All => None,
            Self::Container(id) => Some(*id),
        }
    }

    /// Returns true for [`ContainerContext::All`].
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Greatest lower bound of two container contexts.
    #[must_use]
    pub fn meet(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Self::All, x) | (x, Self::All) => Some(x.clone()),
            (Self::Container(a), Self::Container(b)) if a == b => Some(Self::Container(*a)),
            _ => None,
        }
    }
}

impl From<ContainerId> for ContainerContext {
    fn from(id: ContainerId) -> Self {
        Self::Container(id)
    }
}

impl fmt::Display for ContainerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("AllContainers"),
            Self::Container(id) => write!(f, "{id}"),
        }
    }
}

/// The category half of a context pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CategoryContext {
    /// Every category.
    All,
    /// One specific category.
    Category(CategoryId),
}

impl CategoryContext {
    /// Returns the category id, or `None` for [`CategoryContext::All`].
    #[must_use]
    pub fn id(&self) -> Option<&CategoryId> {
        match self {
            Self::All => None,
            Self::Category(id) => Some(id),
        }
    }

    /// Returns true for [`CategoryContext::All`].
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Greatest lower bound of two category contexts.
    #[must_use]
    pub fn meet(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Self::All, x) | (x, Self::All) => Some(x.clone()),
            (Self::Category(a), Self::Category(b)) if a == b => Some(Self::Category(a.clone())),
            _ => None,
        }
    }
}

impl From<CategoryId> for CategoryContext {
    fn from(id: CategoryId) -> Self {
        Self::Category(id)
    }
}

impl fmt::Display for CategoryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("AllCategories"),
            Self::Category(id) => write!(f, "{id}"),
        }
    }
}

// =============================================================================
// ContainerCategoryContext
// =============================================================================

/// A (container, category) pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContainerCategoryContext {
    container: ContainerContext,
    category: CategoryContext,
}

impl ContainerCategoryContext {
    /// Creates a pair.
    #[must_use]
    pub fn new(container: ContainerContext, category: CategoryContext) -> Self {
        Self {
            container,
            category,
        }
    }

    /// The universal pair `(AllContainers, AllCategories)`.
    #[must_use]
    pub fn universal() -> Self {
        Self::new(ContainerContext::All, CategoryContext::All)
    }

    /// `(container, category)` for two concrete ids.
    #[must_use]
    pub fn of(container: ContainerId, category: impl Into<CategoryId>) -> Self {
        Self::new(
            ContainerContext::Container(container),
            CategoryContext::Category(category.into()),
        )
    }

    /// `(container, AllCategories)`.
    #[must_use]
    pub fn container(container: ContainerId) -> Self {
        Self::new(ContainerContext::Container(container), CategoryContext::All)
    }

    /// `(AllContainers, category)`.
    #[must_use]
    pub fn category(category: impl Into<CategoryId>) -> Self {
        Self::new(ContainerContext::All, CategoryContext::Category(category.into()))
    }

    /// The container half.
    #[must_use]
    pub fn container_context(&self) -> &ContainerContext {
        &self.container
    }

    /// The category half.
    #[must_use]
    pub fn category_context(&self) -> &CategoryContext {
        &self.category
    }

    /// Returns true for the universal pair.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.container.is_all() && self.category.is_all()
    }

    /// The pair reachable by both `self` and `other`, if any.
    ///
    /// `All` on either side yields to the other side; two concrete ids meet
    /// only when equal.
    #[must_use]
    pub fn meet(&self, other: &Self) -> Option<Self> {
        Some(Self::new(
            self.container.meet(&other.container)?,
            self.category.meet(&other.category)?,
        ))
    }
}

impl fmt::Display for ContainerCategoryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.container, self.category)
    }
}

// =============================================================================
// ClauseContext
// =============================================================================

/// The set of (container, category) pairs a clause can reach.
///
/// An empty set is never a valid result of a public operation: every
/// resolver and every algebra operation passes its result through
/// [`ClauseContext::normalized`], which turns "nothing" into universal.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClauseContext(im::OrdSet<ContainerCategoryContext>);

impl ClauseContext {
    /// The universal (global) context: only the universal pair.
    #[must_use]
    pub fn universal() -> Self {
        Self(im::OrdSet::unit(ContainerCategoryContext::universal()))
    }

    /// An empty context. Only meaningful while a result is being built.
    #[must_use]
    pub fn empty() -> Self {
        Self(im::OrdSet::new())
    }

    /// Returns true if this is exactly the universal context.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.0.len() == 1 && self.0.iter().all(ContainerCategoryContext::is_universal)
    }

    /// Returns true if the set has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the pair is in the set.
    #[must_use]
    pub fn contains(&self, pair: &ContainerCategoryContext) -> bool {
        self.0.contains(pair)
    }

    /// Returns a new context with the pair added.
    #[must_use]
    pub fn insert(&self, pair: ContainerCategoryContext) -> Self {
        Self(self.0.update(pair))
    }

    /// Replaces an empty context with the universal one.
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.is_empty() {
            Self::universal()
        } else {
            self
        }
    }

    /// Returns an iterator over the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = &ContainerCategoryContext> {
        self.0.iter()
    }

    /// Raw set union, without normalization or absorption.
    pub(crate) fn raw_union(self, other: Self) -> Self {
        Self(self.0.union(other.0))
    }

    /// Raw pairwise meet of both sets, without normalization.
    pub(crate) fn raw_meet(&self, other: &Self) -> Self {
        self.iter()
            .flat_map(|a| other.iter().filter_map(move |b| a.meet(b)))
            .collect()
    }
}

impl fmt::Debug for ClauseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ClauseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, pair) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{pair}")?;
        }
        f.write_str("}")
    }
}

impl FromIterator<ContainerCategoryContext> for ClauseContext {
    fn from_iter<I: IntoIterator<Item = ContainerCategoryContext>>(iter: I) -> Self {
        Self(im::OrdSet::from_iter(iter))
    }
}

impl IntoIterator for ClauseContext {
    type Item = ContainerCategoryContext;
    type IntoIter = im::ordset::ConsumingIter<ContainerCategoryContext>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ClauseContext {
    type Item = &'a ContainerCategoryContext;
    type IntoIter = im::ordset::Iter<'a, ContainerCategoryContext>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
