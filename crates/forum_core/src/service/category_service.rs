//! Category use-case service.

use super::{new_id, ServiceResult};
use crate::model::category::Category;
use crate::query::{CategoryFilter, ListPage, Pagination};
use crate::repo::category_repo::CategoryRepository;

pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_category(&self, name: &str) -> ServiceResult<Category> {
        Ok(self.repo.create_category(&new_id(), name)?)
    }

    pub fn get_category(&self, category_id: &str) -> ServiceResult<Category> {
        Ok(self.repo.get_category(category_id)?)
    }

    pub fn update_category(&self, category_id: &str, name: &str) -> ServiceResult<Category> {
        Ok(self.repo.update_category(category_id, name)?)
    }

    pub fn delete_category(&self, category_id: &str) -> ServiceResult<()> {
        Ok(self.repo.delete_category(category_id)?)
    }

    pub fn list_categories(
        &self,
        filter: &CategoryFilter,
        pagination: Pagination,
    ) -> ServiceResult<ListPage<Category>> {
        Ok(self.repo.list_categories(filter, pagination)?)
    }
}
