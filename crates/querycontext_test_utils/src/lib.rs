//! Shared test utilities for the querycontext workspace.
//!
//! Provides an in-memory catalog implementing every collaborator, a field
//! registry wired the way a tracker would wire it, and tracing helpers, so
//! integration tests stay short.
//!
//! Add this crate as a `[dev-dependency]`:
//!
//! ```toml
//! [dev-dependencies]
//! querycontext_test_utils = { workspace = true }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod fixtures;
pub mod registry;
pub mod tracing_setup;

pub use catalog::{AttributeTable, CatalogBuilder, CustomField, CustomFieldKind, InMemoryCatalog, TestIssue, TestProject};
pub use fixtures::{sample_catalog, sample_engine};
pub use registry::standard_registry;
