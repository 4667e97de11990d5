//! Integration tests for Layer 0: Foundation
//!
//! Tests for context values, the union/intersect algebra, projection and errors.

mod algebra;
mod errors;
mod projection;
