//! Post use-case service.
//!
//! # Responsibility
//! - Generate post ids and normalize raw tag input.
//! - Keep the post tag-string and the tag list passed to the store derived
//!   from the same normalized values.

use super::tag_input::{normalize_tag_input, tag_string};
use super::{new_id, ServiceResult};
use crate::model::post::{Post, PostChanges};
use crate::query::{ListPage, Pagination, PostFilter};
use crate::repo::post_repo::PostRepository;

/// Request model for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostRequest {
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub category_id: String,
    /// Raw tag input, e.g. `"#x, #y"`.
    pub tags: String,
}

/// Request model for updating a post; tags replace the previous set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePostRequest {
    pub post_id: String,
    pub title: String,
    pub body: String,
    pub category_id: String,
    pub tags: String,
}

pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_post(&self, request: CreatePostRequest) -> ServiceResult<Post> {
        let tags = normalize_tag_input(&request.tags)?;
        let post = Post::new(
            new_id(),
            request.user_id,
            request.title,
            request.body,
            request.category_id,
            tag_string(&tags),
        );
        Ok(self.repo.create_post(&post, &tags)?)
    }

    pub fn update_post(&self, request: UpdatePostRequest) -> ServiceResult<Post> {
        let tags = normalize_tag_input(&request.tags)?;
        let changes = PostChanges {
            title: request.title,
            body: request.body,
            category_id: request.category_id,
            tags: tag_string(&tags),
        };
        Ok(self.repo.update_post(&request.post_id, &changes, &tags)?)
    }

    pub fn get_post(&self, post_id: &str) -> ServiceResult<Post> {
        Ok(self.repo.get_post(post_id)?)
    }

    /// Soft-deletes the post and cascades to its comments.
    pub fn delete_post(&self, post_id: &str) -> ServiceResult<()> {
        Ok(self.repo.delete_post(post_id)?)
    }

    pub fn list_posts(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> ServiceResult<ListPage<Post>> {
        Ok(self.repo.list_posts(filter, pagination)?)
    }
}
