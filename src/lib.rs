//! querycontext - the reachable (project, issue type) space of a search query
//!
//! This crate re-exports all layers of querycontext for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: querycontext_engine: Resolvers, combination visitor, engine
//! Layer 1: querycontext_query: Clause trees, operators, negation normalization
//! Layer 0: querycontext_foundation: Context types, context algebra, errors
//! ```

pub use querycontext_engine as engine;
pub use querycontext_foundation as foundation;
pub use querycontext_query as query;
