//! Field-name to resolver registry.
//!
//! A field name may map to several handlers (e.g. a system field and a
//! plugin field sharing a name); the visitor unions all of them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use querycontext_foundation::{Result, User};

use crate::resolver::ClauseContextResolver;

/// The names a clause can be written with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClauseNames {
    primary: String,
    aliases: Vec<String>,
}

impl ClauseNames {
    /// Names with a single primary name.
    #[must_use]
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            aliases: Vec::new(),
        }
    }

    /// Adds an alternative name.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// The primary name.
    #[must_use]
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// The primary name followed by every alias.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// A resolver registered under a set of names.
#[derive(Clone)]
pub struct ClauseHandler {
    names: ClauseNames,
    resolver: Arc<dyn ClauseContextResolver>,
    free_text: bool,
}

impl ClauseHandler {
    /// Creates a handler.
    #[must_use]
    pub fn new(names: ClauseNames, resolver: Arc<dyn ClauseContextResolver>) -> Self {
        Self {
            names,
            resolver,
            free_text: false,
        }
    }

    /// Marks the handler as contributing to free-text search.
    #[must_use]
    pub fn free_text(mut self) -> Self {
        self.free_text = true;
        self
    }

    /// The names the handler answers to.
    #[must_use]
    pub fn names(&self) -> &ClauseNames {
        &self.names
    }

    /// The resolver.
    #[must_use]
    pub fn resolver(&self) -> &dyn ClauseContextResolver {
        self.resolver.as_ref()
    }

    /// Returns true if the handler contributes to free-text search.
    #[must_use]
    pub fn is_free_text(&self) -> bool {
        self.free_text
    }
}

impl fmt::Debug for ClauseHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClauseHandler")
            .field("names", &self.names)
            .field("free_text", &self.free_text)
            .finish_non_exhaustive()
    }
}

/// Looks up the handlers for a field.
pub trait ClauseHandlerRegistry: Send + Sync {
    /// Handlers registered for `name` that `user` may use. Matching is
    /// case-insensitive.
    ///
    /// # Errors
    ///
    /// Propagates failures of the backing field store.
    fn handlers(&self, user: Option<&User>, name: &str) -> Result<Vec<ClauseHandler>>;

    /// Every handler contributing to free-text search.
    ///
    /// # Errors
    ///
    /// Propagates failures of the backing field store.
    fn free_text_handlers(&self, user: Option<&User>) -> Result<Vec<ClauseHandler>>;
}

/// The case-folded form clause names are compared by.
pub(crate) fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// In-process registry.
#[derive(Clone, Debug, Default)]
pub struct FieldRegistry {
    handlers: Vec<ClauseHandler>,
    by_name: HashMap<String, Vec<usize>>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under all of its names.
    pub fn register(&mut self, handler: ClauseHandler) {
        let index = self.handlers.len();
        for name in handler.names().all() {
            let slots = self.by_name.entry(fold_name(name)).or_default();
            if !slots.contains(&index) {
                slots.push(index);
            }
        }
        self.handlers.push(handler);
    }

    /// Builder method to register a handler.
    #[must_use]
    pub fn with(mut self, handler: ClauseHandler) -> Self {
        self.register(handler);
        self
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl ClauseHandlerRegistry for FieldRegistry {
    fn handlers(&self, _user: Option<&User>, name: &str) -> Result<Vec<ClauseHandler>> {
        Ok(self
            .by_name
            .get(&fold_name(name))
            .map(|slots| slots.iter().map(|&i| self.handlers[i].clone()).collect())
            .unwrap_or_default())
    }

    fn free_text_handlers(&self, _user: Option<&User>) -> Result<Vec<ClauseHandler>> {
        Ok(self.handlers.iter().filter(|h| h.is_free_text()).cloned().collect())
    }
}
