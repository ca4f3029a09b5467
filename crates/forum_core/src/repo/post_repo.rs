//! Post aggregate store.
//!
//! # Responsibility
//! - Keep a post row and its tag rows consistent under create and update.
//! - Cascade post soft-deletion to the post's comments.
//! - Serve the filtered post list.
//!
//! # Invariants
//! - Each write runs in exactly one `WriteScope`; any failing step rolls back
//!   the whole scope, so no partial aggregate is ever committed.
//! - Tag rows are replaced, never merged, on update.
//! - Tag rows are left in place on soft-delete.
//! - No version column: concurrent updates are last-writer-wins.

use super::comment_repo::{CommentRepository, SqliteCommentRepository};
use super::error::{query_error, write_error, Entity, StoreError, StoreResult};
use super::scope::WriteScope;
use super::tag_repo::{SqliteTagRepository, TagRepository};
use super::{ensure_connection_ready, LIVE_PREDICATE, POSTS_SHAPE};
use crate::model::deletion::DeletionState;
use crate::model::post::{Post, PostChanges};
use crate::query::{ListPage, Pagination, PostFilter, SelectBuilder};
use log::{debug, info, warn};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::time::Instant;

const POST_SELECT_SQL: &str = "SELECT
    post_id,
    user_id,
    title,
    body,
    category_id,
    tags,
    deleted_at,
    updated_at
FROM posts";

const POST_RETURNING_SQL: &str =
    "RETURNING post_id, user_id, title, body, category_id, tags, deleted_at, updated_at";

pub trait PostRepository {
    /// Inserts the post row plus one tag row per entry of `tags`.
    fn create_post(&self, post: &Post, tags: &[String]) -> StoreResult<Post>;
    /// Replaces mutable fields of a live post and its full tag set.
    fn update_post(
        &self,
        post_id: &str,
        changes: &PostChanges,
        tags: &[String],
    ) -> StoreResult<Post>;
    /// Soft-deletes a live post and every live comment under it.
    fn delete_post(&self, post_id: &str) -> StoreResult<()>;
    fn get_post(&self, post_id: &str) -> StoreResult<Post>;
    fn list_posts(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> StoreResult<ListPage<Post>>;
}

/// SQLite-backed aggregate store composing the tag and comment stores.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
    tags: SqliteTagRepository<'conn>,
    comments: SqliteCommentRepository<'conn>,
}

impl<'conn> SqlitePostRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn, &[POSTS_SHAPE])?;
        Ok(Self {
            conn,
            tags: SqliteTagRepository::try_new(conn)?,
            comments: SqliteCommentRepository::try_new(conn)?,
        })
    }

    fn insert_tags(
        &self,
        scope: &WriteScope<'_>,
        post_id: &str,
        tags: &[String],
    ) -> StoreResult<()> {
        for tag in tags {
            self.tags.create_tag(scope, tag, post_id)?;
        }
        Ok(())
    }

    fn create_in_scope(&self, post: &Post, tags: &[String]) -> StoreResult<Post> {
        let scope = WriteScope::begin(self.conn, Entity::Post)?;

        let created = scope
            .executor()
            .query_row(
                &format!(
                    "INSERT INTO posts (post_id, user_id, title, body, category_id, tags)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     {POST_RETURNING_SQL};"
                ),
                params![
                    post.post_id.as_str(),
                    post.user_id.as_str(),
                    post.title.as_str(),
                    post.body.as_str(),
                    post.category_id.as_str(),
                    post.tags.as_str(),
                ],
                parse_post_row,
            )
            .map_err(write_error(Entity::Post, "create"))?;

        self.insert_tags(&scope, &created.post_id, tags)?;
        scope.commit()?;
        Ok(created)
    }

    fn update_in_scope(
        &self,
        post_id: &str,
        changes: &PostChanges,
        tags: &[String],
    ) -> StoreResult<Post> {
        let scope = WriteScope::begin(self.conn, Entity::Post)?;
        self.tags.delete_by_post(&scope, post_id)?;

        let updated = scope
            .executor()
            .query_row(
                &format!(
                    "UPDATE posts
                     SET title = ?2,
                         body = ?3,
                         category_id = ?4,
                         tags = ?5,
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE post_id = ?1
                       AND {LIVE_PREDICATE}
                     {POST_RETURNING_SQL};"
                ),
                params![
                    post_id,
                    changes.title.as_str(),
                    changes.body.as_str(),
                    changes.category_id.as_str(),
                    changes.tags.as_str(),
                ],
                parse_post_row,
            )
            .optional()
            .map_err(write_error(Entity::Post, "update"))?
            .ok_or_else(|| StoreError::not_found(Entity::Post, post_id))?;

        self.insert_tags(&scope, post_id, tags)?;
        scope.commit()?;
        Ok(updated)
    }

    fn delete_in_scope(&self, post_id: &str) -> StoreResult<usize> {
        let scope = WriteScope::begin(self.conn, Entity::Post)?;

        let changed = scope
            .executor()
            .execute(
                &format!(
                    "UPDATE posts
                     SET deleted_at = CAST(strftime('%s', 'now') AS INTEGER),
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE post_id = ?1
                       AND {LIVE_PREDICATE};"
                ),
                [post_id],
            )
            .map_err(write_error(Entity::Post, "delete"))?;
        if changed == 0 {
            return Err(StoreError::not_found(Entity::Post, post_id));
        }

        let cascaded = self.comments.delete_by_post(&scope, post_id)?;
        scope.commit()?;
        Ok(cascaded)
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&self, post: &Post, tags: &[String]) -> StoreResult<Post> {
        let started_at = Instant::now();
        let result = self.create_in_scope(post, tags);
        log_write("post_create", &post.post_id, started_at, &result);
        result
    }

    fn update_post(
        &self,
        post_id: &str,
        changes: &PostChanges,
        tags: &[String],
    ) -> StoreResult<Post> {
        let started_at = Instant::now();
        let result = self.update_in_scope(post_id, changes, tags);
        log_write("post_update", post_id, started_at, &result);
        result
    }

    fn delete_post(&self, post_id: &str) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = self.delete_in_scope(post_id);
        if let Ok(cascaded) = &result {
            debug!("event=post_delete_cascade module=repo post_id={post_id} comments={cascaded}");
        }
        log_write("post_delete", post_id, started_at, &result);
        result.map(|_| ())
    }

    fn get_post(&self, post_id: &str) -> StoreResult<Post> {
        self.conn
            .query_row(
                &format!("{POST_SELECT_SQL} WHERE post_id = ?1 AND {LIVE_PREDICATE};"),
                [post_id],
                parse_post_row,
            )
            .optional()
            .map_err(query_error(Entity::Post, "get"))?
            .ok_or_else(|| StoreError::not_found(Entity::Post, post_id))
    }

    fn list_posts(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> StoreResult<ListPage<Post>> {
        let query = SelectBuilder::new(POST_SELECT_SQL)
            .filter_fixed(LIVE_PREDICATE)
            .filter_eq("user_id", filter.user_id.as_deref())
            .filter_eq("category_id", filter.category_id.as_deref())
            .filter_contains("tags", filter.tags.as_deref())
            .filter_eq("body", filter.body.as_deref())
            .filter_eq("title", filter.title.as_deref())
            .order_by("updated_at DESC, post_id ASC")
            .paginate(pagination)
            .build();

        let read = || -> rusqlite::Result<Vec<Post>> {
            let mut stmt = self.conn.prepare(&query.sql)?;
            let mut rows = stmt.query(params_from_iter(query.params.iter()))?;
            let mut posts = Vec::new();
            while let Some(row) = rows.next()? {
                posts.push(parse_post_row(row)?);
            }
            Ok(posts)
        };
        let items = read().map_err(query_error(Entity::Post, "list"))?;
        Ok(ListPage::from_items(items))
    }
}

fn log_write<T>(event: &str, post_id: &str, started_at: Instant, result: &StoreResult<T>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!(
            "event={event} module=repo status=ok post_id={post_id} duration_ms={duration_ms}"
        ),
        Err(err) => warn!(
            "event={event} module=repo status=rollback post_id={post_id} duration_ms={duration_ms} error_code={} error={err}",
            err.code()
        ),
    }
}

fn parse_post_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        post_id: row.get("post_id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        body: row.get("body")?,
        category_id: row.get("category_id")?,
        tags: row.get("tags")?,
        deletion: DeletionState::from_marker(row.get("deleted_at")?),
        updated_at: row.get("updated_at")?,
    })
}
