//! Forum domain model.
//!
//! # Responsibility
//! - Define the entity shapes persisted by the stores.
//! - Encode soft-delete state as a tagged value instead of a raw timestamp.
//!
//! # Invariants
//! - Entity ids are opaque strings assigned by the service layer and never
//!   change after creation.
//! - Posts, comments and categories are never physically removed.

pub mod category;
pub mod comment;
pub mod deletion;
pub mod post;
pub mod tag;
