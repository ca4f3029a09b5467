//! Comment entity.

use super::deletion::DeletionState;
use serde::{Deserialize, Serialize};

pub type CommentId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: CommentId,
    /// Author reference.
    pub user_id: String,
    /// Parent post reference.
    pub post_id: String,
    pub body: String,
    pub deletion: DeletionState,
    pub updated_at: i64,
}

/// Insert payload for a new comment; the id is assigned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub comment_id: CommentId,
    pub user_id: String,
    pub post_id: String,
    pub body: String,
}
