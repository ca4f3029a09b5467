//! List-query value objects and SQL assembly.
//!
//! # Responsibility
//! - Describe optional equality/substring filters and limit/offset bounds.
//! - Turn those descriptions into one parameterized SELECT statement.
//!
//! # Invariants
//! - Absent or empty filter values never reach the predicate.
//! - Placeholder indices are assigned in a single pass, in call order.

pub mod builder;
pub mod filter;

pub use builder::{BuiltQuery, SelectBuilder};
pub use filter::{CategoryFilter, CommentFilter, ListPage, Pagination, PostFilter};
