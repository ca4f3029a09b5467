//! Comment use-case service.

use super::{new_id, ServiceResult};
use crate::model::comment::{Comment, NewComment};
use crate::query::{CommentFilter, ListPage, Pagination};
use crate::repo::comment_repo::CommentRepository;

pub struct CommentService<R: CommentRepository> {
    repo: R,
}

impl<R: CommentRepository> CommentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_comment(
        &self,
        user_id: impl Into<String>,
        post_id: impl Into<String>,
        body: impl Into<String>,
    ) -> ServiceResult<Comment> {
        let comment = NewComment {
            comment_id: new_id(),
            user_id: user_id.into(),
            post_id: post_id.into(),
            body: body.into(),
        };
        Ok(self.repo.create_comment(&comment)?)
    }

    pub fn get_comment(&self, comment_id: &str) -> ServiceResult<Comment> {
        Ok(self.repo.get_comment(comment_id)?)
    }

    pub fn update_comment(&self, comment_id: &str, body: &str) -> ServiceResult<Comment> {
        Ok(self.repo.update_comment(comment_id, body)?)
    }

    /// Soft-deletes one comment inside its own scope.
    pub fn delete_comment(&self, comment_id: &str) -> ServiceResult<()> {
        let scope = self.repo.begin_scope()?;
        self.repo.delete_comment(&scope, comment_id)?;
        scope.commit()?;
        Ok(())
    }

    pub fn list_comments(
        &self,
        filter: &CommentFilter,
        pagination: Pagination,
    ) -> ServiceResult<ListPage<Comment>> {
        Ok(self.repo.list_comments(filter, pagination)?)
    }
}
