//! Clause resolvers and the query context engine.
//!
//! This crate provides:
//! - [`QueryContextEngine`] - computes the (full, simple) context of a clause tree
//! - [`ClauseContextResolver`] - turns one terminal predicate into a context
//! - [`FieldRegistry`] - maps field names to their (possibly several) resolvers
//! - [`resolvers`] - one resolver per field kind, plus decorators
//! - [`collaborators`] - the external services resolvers consult
//! - [`scheme`] - field configuration scheme contexts and visibility

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collaborators;
pub mod config;
pub mod engine;
pub mod registry;
pub mod resolver;
pub mod resolvers;
pub mod scheme;
pub mod visitor;

pub use config::EngineConfig;
pub use engine::QueryContextEngine;
pub use registry::{ClauseHandler, ClauseHandlerRegistry, ClauseNames, FieldRegistry};
pub use resolver::{ClauseContextResolver, EvaluationScope};
pub use scheme::{FieldConfigScheme, SchemeContexts};
pub use visitor::ContextResult;
