//! Storage core for the forum service.
//!
//! Posts, tags, comments and categories over SQLite. The post aggregate
//! store keeps a post and its tag rows consistent and cascades post
//! soft-deletion to comments, each inside one transaction.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::category::{Category, CategoryId};
pub use model::comment::{Comment, CommentId, NewComment};
pub use model::deletion::DeletionState;
pub use model::post::{Post, PostChanges, PostId};
pub use model::tag::{Tag, TagCount};
pub use query::{CategoryFilter, CommentFilter, ListPage, Pagination, PostFilter};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::comment_repo::{CommentRepository, SqliteCommentRepository};
pub use repo::error::{Entity, StoreError, StoreResult};
pub use repo::post_repo::{PostRepository, SqlitePostRepository};
pub use repo::scope::WriteScope;
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use service::category_service::CategoryService;
pub use service::comment_service::CommentService;
pub use service::post_service::{CreatePostRequest, PostService, UpdatePostRequest};
pub use service::tag_input::{normalize_tag_input, tag_string};
pub use service::tag_service::TagService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
