//! Grouped, read-only view of a final clause context.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::context::{CategoryContext, ClauseContext, ContainerContext};

/// A clause context grouped by container.
///
/// One group per distinct container of the source context, each holding
/// every category paired with that container. Built once and never mutated.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QueryContext {
    groups: im::OrdMap<ContainerContext, im::OrdSet<CategoryContext>>,
}

impl QueryContext {
    /// Groups a clause context by container.
    #[must_use]
    pub fn new(context: &ClauseContext) -> Self {
        let mut groups: im::OrdMap<ContainerContext, im::OrdSet<CategoryContext>> =
            im::OrdMap::new();
        for pair in context {
            groups
                .entry(pair.container_context().clone())
                .or_insert_with(im::OrdSet::new)
                .insert(pair.category_context().clone());
        }
        Self { groups }
    }

    /// The projection of the universal context.
    #[must_use]
    pub fn universal() -> Self {
        Self::new(&ClauseContext::universal())
    }

    /// Returns true if the only group is `AllContainers` with `AllCategories`.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.groups.len() == 1
            && self
                .groups
                .get(&ContainerContext::All)
                .is_some_and(|categories| {
                    categories.len() == 1 && categories.contains(&CategoryContext::All)
                })
    }

    /// Iterates the groups in container order.
    pub fn groups(&self) -> impl Iterator<Item = (&ContainerContext, &im::OrdSet<CategoryContext>)> {
        self.groups.iter()
    }

    /// Iterates the distinct containers.
    pub fn containers(&self) -> impl Iterator<Item = &ContainerContext> {
        self.groups.keys()
    }

    /// The categories grouped under a container, if it appears.
    #[must_use]
    pub fn categories_for(&self, container: &ContainerContext) -> Option<&im::OrdSet<CategoryContext>> {
        self.groups.get(container)
    }

    /// Returns the number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl From<&ClauseContext> for QueryContext {
    fn from(context: &ClauseContext) -> Self {
        Self::new(context)
    }
}

impl fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.groups.iter()).finish()
    }
}
