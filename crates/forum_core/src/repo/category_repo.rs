//! Category store.
//!
//! Plain CRUD over `categories` with soft-delete; no transaction coupling to
//! posts. Posts reference categories only through the foreign key.

use super::error::{query_error, write_error, Entity, StoreError, StoreResult};
use super::{ensure_connection_ready, CATEGORIES_SHAPE, LIVE_PREDICATE};
use crate::model::category::Category;
use crate::model::deletion::DeletionState;
use crate::query::{CategoryFilter, ListPage, Pagination, SelectBuilder};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT
    category_id,
    name,
    deleted_at,
    updated_at
FROM categories";

pub trait CategoryRepository {
    fn create_category(&self, category_id: &str, name: &str) -> StoreResult<Category>;
    fn get_category(&self, category_id: &str) -> StoreResult<Category>;
    fn update_category(&self, category_id: &str, name: &str) -> StoreResult<Category>;
    /// Soft-deletes one category; repeated deletes succeed.
    fn delete_category(&self, category_id: &str) -> StoreResult<()>;
    fn list_categories(
        &self,
        filter: &CategoryFilter,
        pagination: Pagination,
    ) -> StoreResult<ListPage<Category>>;
}

pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn, &[CATEGORIES_SHAPE])?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category_id: &str, name: &str) -> StoreResult<Category> {
        ensure_name(name)?;
        self.conn
            .query_row(
                "INSERT INTO categories (category_id, name)
                 VALUES (?1, ?2)
                 RETURNING category_id, name, deleted_at, updated_at;",
                params![category_id, name],
                parse_category_row,
            )
            .map_err(write_error(Entity::Category, "create"))
    }

    fn get_category(&self, category_id: &str) -> StoreResult<Category> {
        self.conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE category_id = ?1 AND {LIVE_PREDICATE};"),
                [category_id],
                parse_category_row,
            )
            .optional()
            .map_err(query_error(Entity::Category, "get"))?
            .ok_or_else(|| StoreError::not_found(Entity::Category, category_id))
    }

    fn update_category(&self, category_id: &str, name: &str) -> StoreResult<Category> {
        ensure_name(name)?;
        self.conn
            .query_row(
                &format!(
                    "UPDATE categories
                     SET name = ?2,
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE category_id = ?1
                       AND {LIVE_PREDICATE}
                     RETURNING category_id, name, deleted_at, updated_at;"
                ),
                params![category_id, name],
                parse_category_row,
            )
            .optional()
            .map_err(write_error(Entity::Category, "update"))?
            .ok_or_else(|| StoreError::not_found(Entity::Category, category_id))
    }

    fn delete_category(&self, category_id: &str) -> StoreResult<()> {
        let changed = self
            .conn
            .execute(
                &format!(
                    "UPDATE categories
                     SET deleted_at = CAST(strftime('%s', 'now') AS INTEGER),
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE category_id = ?1
                       AND {LIVE_PREDICATE};"
                ),
                [category_id],
            )
            .map_err(write_error(Entity::Category, "delete"))?;
        if changed > 0 {
            return Ok(());
        }

        let exists: i64 = self
            .conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE category_id = ?1);",
                [category_id],
                |row| row.get(0),
            )
            .map_err(query_error(Entity::Category, "delete"))?;
        if exists == 1 {
            Ok(())
        } else {
            Err(StoreError::not_found(Entity::Category, category_id))
        }
    }

    fn list_categories(
        &self,
        filter: &CategoryFilter,
        pagination: Pagination,
    ) -> StoreResult<ListPage<Category>> {
        let query = SelectBuilder::new(CATEGORY_SELECT_SQL)
            .filter_fixed(LIVE_PREDICATE)
            .filter_eq("category_id", filter.category_id.as_deref())
            .order_by("name ASC, category_id ASC")
            .paginate(pagination)
            .build();

        let read = || -> rusqlite::Result<Vec<Category>> {
            let mut stmt = self.conn.prepare(&query.sql)?;
            let mut rows = stmt.query(params_from_iter(query.params.iter()))?;
            let mut categories = Vec::new();
            while let Some(row) = rows.next()? {
                categories.push(parse_category_row(row)?);
            }
            Ok(categories)
        };
        let items = read().map_err(query_error(Entity::Category, "list"))?;
        Ok(ListPage::from_items(items))
    }
}

fn ensure_name(name: &str) -> StoreResult<()> {
    if name.trim().is_empty() {
        return Err(StoreError::constraint(
            Entity::Category,
            "category name must not be empty",
        ));
    }
    Ok(())
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        category_id: row.get("category_id")?,
        name: row.get("name")?,
        deletion: DeletionState::from_marker(row.get("deleted_at")?),
        updated_at: row.get("updated_at")?,
    })
}
