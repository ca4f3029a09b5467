//! Tag read-side service.

use super::ServiceResult;
use crate::model::tag::{Tag, TagCount};
use crate::query::Pagination;
use crate::repo::tag_repo::TagRepository;

pub struct TagService<R: TagRepository> {
    repo: R,
}

impl<R: TagRepository> TagService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Most used tags across live posts, highest count first.
    pub fn popular_tags(&self, pagination: Pagination) -> ServiceResult<Vec<TagCount>> {
        Ok(self.repo.popular(pagination)?)
    }

    pub fn post_tags(&self, post_id: &str) -> ServiceResult<Vec<Tag>> {
        Ok(self.repo.list_by_post(post_id)?)
    }
}
