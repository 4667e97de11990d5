//! Context value types, context algebra, and errors for querycontext.
//!
//! This crate provides:
//! - [`ContainerId`] and [`CategoryId`] - identifiers of projects and issue types
//! - [`ClauseContext`] - the set of (container, category) pairs a clause can reach
//! - [`union`] and [`intersect`] - the context algebra behind OR and AND
//! - [`QueryContext`] - the grouped, read-only projection handed to callers
//! - [`Error`] - rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod algebra;
pub mod context;
pub mod error;
pub mod ids;
pub mod projection;
pub mod user;

pub use algebra::{intersect, union};
pub use context::{CategoryContext, ClauseContext, ContainerCategoryContext, ContainerContext};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use ids::{CategoryId, ContainerId};
pub use projection::QueryContext;
pub use user::User;
