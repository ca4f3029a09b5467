//! Filter and pagination inputs for `list_*` store operations.

use serde::{Deserialize, Serialize};

/// Limit/offset bounds. `0` means "unbounded" and "no skip" respectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Pagination {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

/// Post list filters; all present values are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFilter {
    pub user_id: Option<String>,
    pub category_id: Option<String>,
    /// Exact title match.
    pub title: Option<String>,
    /// Exact body match.
    pub body: Option<String>,
    /// Case-insensitive substring match against the tag-string.
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentFilter {
    pub post_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub category_id: Option<String>,
}

/// List result envelope.
///
/// `count` is the number of returned items, not the total number of rows
/// matching the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub count: usize,
}

impl<T> ListPage<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        let count = items.len();
        Self { items, count }
    }
}
