//! Engine configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::registry::fold_name;

/// Configuration for the query context engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Maximum number of literals handed to one identity lookup call.
    pub lookup_batch_size: usize,

    /// Clause names that name containers explicitly (feed the simple context).
    pub container_clause_names: Vec<String>,

    /// Clause names that name categories explicitly (feed the simple context).
    pub category_clause_names: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookup_batch_size: 1000,
            container_clause_names: vec!["project".to_string()],
            category_clause_names: vec!["issuetype".to_string(), "type".to_string()],
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration whose identity lookups are never split.
    #[must_use]
    pub fn unbatched() -> Self {
        Self {
            lookup_batch_size: usize::MAX,
            ..Self::default()
        }
    }

    /// Builder method to set the identity lookup batch size.
    ///
    /// Zero is raised to one.
    #[must_use]
    pub fn with_lookup_batch_size(mut self, size: usize) -> Self {
        self.lookup_batch_size = size.max(1);
        self
    }

    /// Builder method to set the explicit container clause names.
    #[must_use]
    pub fn with_container_clause_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.container_clause_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the explicit category clause names.
    #[must_use]
    pub fn with_category_clause_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_clause_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// The effective batch size, never zero.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.lookup_batch_size.max(1)
    }

    /// Returns true if a clause with this name constrains containers or
    /// categories explicitly. Names are case-folded the same way the field
    /// registry folds them.
    #[must_use]
    pub fn is_explicit(&self, clause_name: &str) -> bool {
        let clause_name = fold_name(clause_name);
        self.container_clause_names
            .iter()
            .chain(&self.category_clause_names)
            .any(|name| fold_name(name) == clause_name)
    }
}
