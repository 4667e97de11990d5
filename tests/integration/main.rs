//! Integration tests: Full pipeline
//!
//! Whole queries through the public facade, from a clause tree to the
//! projected query context.

mod end_to_end;
mod properties;
