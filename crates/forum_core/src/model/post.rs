//! Post aggregate root.

use super::deletion::DeletionState;
use serde::{Deserialize, Serialize};

pub type PostId = String;

/// Persisted post row.
///
/// `tags` is the denormalized tag-string; it must stay set-consistent with
/// the `tags` table rows for the same `post_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: PostId,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub category_id: String,
    pub tags: String,
    pub deletion: DeletionState,
    /// Epoch milliseconds, maintained by storage.
    pub updated_at: i64,
}

impl Post {
    /// Builds a not-yet-persisted live post.
    pub fn new(
        post_id: impl Into<PostId>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        category_id: impl Into<String>,
        tags: impl Into<String>,
    ) -> Self {
        Self {
            post_id: post_id.into(),
            user_id: user_id.into(),
            title: title.into(),
            body: body.into(),
            category_id: category_id.into(),
            tags: tags.into(),
            deletion: DeletionState::Active,
            updated_at: 0,
        }
    }
}

/// Mutable post fields replaced by an aggregate update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub title: String,
    pub body: String,
    pub category_id: String,
    pub tags: String,
}
