//! Field configuration schemes.
//!
//! A custom field is configured per scheme, and each scheme applies to a set
//! of containers and a set of categories (either may be "all"). The context
//! of a scheme is the space of (container, category) pairs it applies to
//! for the current actor.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use querycontext_foundation::{
    CategoryContext, CategoryId, ClauseContext, ContainerCategoryContext, ContainerContext,
    ContainerId, QueryContext, Result, User,
};

use crate::collaborators::{ContainerCategories, ContainerVisibility, Permission};

/// Where a field configuration applies.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldConfigScheme {
    /// Scheme id.
    pub id: u64,
    /// Containers it applies to; `None` means all.
    pub containers: Option<BTreeSet<ContainerId>>,
    /// Categories it applies to; `None` means all.
    pub categories: Option<BTreeSet<CategoryId>>,
}

impl FieldConfigScheme {
    /// A scheme applying everywhere.
    #[must_use]
    pub fn global(id: u64) -> Self {
        Self {
            id,
            containers: None,
            categories: None,
        }
    }

    /// Restricts the scheme to the given containers.
    #[must_use]
    pub fn with_containers(mut self, containers: impl IntoIterator<Item = ContainerId>) -> Self {
        self.containers = Some(containers.into_iter().collect());
        self
    }

    /// Restricts the scheme to the given categories.
    #[must_use]
    pub fn with_categories<C: Into<CategoryId>>(mut self, categories: impl IntoIterator<Item = C>) -> Self {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    /// Applies to every container and every category.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.containers.is_none() && self.categories.is_none()
    }

    /// Applies to every container.
    #[must_use]
    pub fn is_all_containers(&self) -> bool {
        self.containers.is_none()
    }

    /// Applies to every category.
    #[must_use]
    pub fn is_all_categories(&self) -> bool {
        self.categories.is_none()
    }

    fn specificity(&self) -> u8 {
        match (&self.containers, &self.categories) {
            (Some(_), Some(_)) => 3,
            (Some(_), None) => 2,
            (None, Some(_)) => 1,
            (None, None) => 0,
        }
    }
}

/// Computes scheme contexts for an actor.
#[derive(Clone)]
pub struct SchemeContexts {
    visibility: Arc<dyn ContainerVisibility>,
    categories: Arc<dyn ContainerCategories>,
}

impl SchemeContexts {
    /// Creates the helper.
    #[must_use]
    pub fn new(visibility: Arc<dyn ContainerVisibility>, categories: Arc<dyn ContainerCategories>) -> Self {
        Self {
            visibility,
            categories,
        }
    }

    /// The context a scheme applies to, as seen by `user`.
    ///
    /// - global: universal
    /// - all containers, some categories: `(AllContainers, t)` per category
    /// - some containers: each visible scheme container, paired with
    ///   `AllCategories` if the scheme covers all categories, otherwise with
    ///   each scheme category the container offers
    ///
    /// The result is not normalized: a scheme whose containers are all
    /// hidden from `user` yields an empty context, which contributes nothing
    /// when unioned with the field's other schemes.
    ///
    /// # Errors
    ///
    /// Propagates collaborator failures.
    pub fn context_for(&self, user: Option<&User>, scheme: &FieldConfigScheme) -> Result<ClauseContext> {
        let context = match (&scheme.containers, &scheme.categories) {
            (None, None) => return Ok(ClauseContext::universal()),
            (None, Some(categories)) => categories
                .iter()
                .cloned()
                .map(ContainerCategoryContext::category)
                .collect(),
            (Some(containers), categories) => {
                let visible = self.visibility.visible_containers(user, Permission::Browse)?;
                let mut pairs = Vec::new();
                for &container in containers.intersection(&visible) {
                    match categories {
                        None => pairs.push(ContainerCategoryContext::container(container)),
                        Some(categories) => {
                            let offered = self.categories.categories_of(container)?;
                            pairs.extend(
                                categories
                                    .intersection(&offered)
                                    .cloned()
                                    .map(|category| ContainerCategoryContext::of(container, category)),
                            );
                        }
                    }
                }
                pairs.into_iter().collect::<ClauseContext>()
            }
        };
        Ok(context)
    }
}

/// Returns true if a projected query context touches the scheme.
///
/// Only concrete ids are compared: an `AllContainers` group does not touch a
/// container-scoped scheme. `AllCategories` under a scheme container does
/// touch a category-scoped scheme, since the container may hold any of them.
#[must_use]
pub fn is_scheme_visible(query: &QueryContext, scheme: &FieldConfigScheme) -> bool {
    if scheme.is_global() {
        return true;
    }
    query.groups().any(|(container, categories)| {
        let container_matches = match &scheme.containers {
            None => true,
            Some(containers) => matches!(container, ContainerContext::Container(id) if containers.contains(id)),
        };
        container_matches
            && match &scheme.categories {
                None => true,
                Some(scheme_categories) => categories.iter().any(|category| match category {
                    CategoryContext::Category(id) => scheme_categories.contains(id),
                    CategoryContext::All => scheme.containers.is_some(),
                }),
            }
    })
}

/// The most specific scheme visible under a query context.
///
/// Container and category scoped beats container scoped, which beats
/// category scoped, which beats global. Ties go to the earlier scheme.
#[must_use]
pub fn most_specific_scheme<'a>(
    query: &QueryContext,
    schemes: &'a [FieldConfigScheme],
) -> Option<&'a FieldConfigScheme> {
    schemes
        .iter()
        .enumerate()
        .filter(|(_, scheme)| is_scheme_visible(query, scheme))
        .max_by_key(|(index, scheme)| (scheme.specificity(), Reverse(*index)))
        .map(|(_, scheme)| scheme)
}
