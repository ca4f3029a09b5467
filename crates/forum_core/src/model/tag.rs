//! Tag association rows.

use serde::{Deserialize, Serialize};

/// One `(tag, post_id)` association. Tags have no identity of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    pub post_id: String,
}

/// Usage count for one tag text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: i64,
}
