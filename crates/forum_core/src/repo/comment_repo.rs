//! Comment store.
//!
//! # Responsibility
//! - CRUD over `comments` with soft-delete semantics.
//! - Cascade soft-deletion for all comments of one post.
//!
//! # Invariants
//! - Reads and updates only see live comments.
//! - Deletes run inside a caller-supplied `WriteScope` and are idempotent.

use super::error::{query_error, write_error, Entity, StoreError, StoreResult};
use super::scope::WriteScope;
use super::{ensure_connection_ready, COMMENTS_SHAPE, LIVE_PREDICATE};
use crate::model::comment::{Comment, NewComment};
use crate::model::deletion::DeletionState;
use crate::query::{CommentFilter, ListPage, Pagination, SelectBuilder};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const COMMENT_SELECT_SQL: &str = "SELECT
    comment_id,
    user_id,
    post_id,
    body,
    deleted_at,
    updated_at
FROM comments";

pub trait CommentRepository {
    fn create_comment(&self, comment: &NewComment) -> StoreResult<Comment>;
    fn get_comment(&self, comment_id: &str) -> StoreResult<Comment>;
    /// Replaces the body of a live comment.
    fn update_comment(&self, comment_id: &str, body: &str) -> StoreResult<Comment>;
    /// Soft-deletes one comment; deleting an already-deleted comment succeeds.
    fn delete_comment(&self, scope: &WriteScope<'_>, comment_id: &str) -> StoreResult<()>;
    /// Soft-deletes every live comment of `post_id` in one statement.
    fn delete_by_post(&self, scope: &WriteScope<'_>, post_id: &str) -> StoreResult<usize>;
    fn list_comments(
        &self,
        filter: &CommentFilter,
        pagination: Pagination,
    ) -> StoreResult<ListPage<Comment>>;
    /// Opens a scope on this store's connection for standalone deletes.
    fn begin_scope(&self) -> StoreResult<WriteScope<'_>>;
}

pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn, &[COMMENTS_SHAPE])?;
        Ok(Self { conn })
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn create_comment(&self, comment: &NewComment) -> StoreResult<Comment> {
        if comment.body.trim().is_empty() {
            return Err(StoreError::constraint(
                Entity::Comment,
                "comment body must not be empty",
            ));
        }

        self.conn
            .query_row(
                "INSERT INTO comments (comment_id, user_id, post_id, body)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING comment_id, user_id, post_id, body, deleted_at, updated_at;",
                params![
                    comment.comment_id.as_str(),
                    comment.user_id.as_str(),
                    comment.post_id.as_str(),
                    comment.body.as_str(),
                ],
                parse_comment_row,
            )
            .map_err(write_error(Entity::Comment, "create"))
    }

    fn get_comment(&self, comment_id: &str) -> StoreResult<Comment> {
        self.conn
            .query_row(
                &format!("{COMMENT_SELECT_SQL} WHERE comment_id = ?1 AND {LIVE_PREDICATE};"),
                [comment_id],
                parse_comment_row,
            )
            .optional()
            .map_err(query_error(Entity::Comment, "get"))?
            .ok_or_else(|| StoreError::not_found(Entity::Comment, comment_id))
    }

    fn update_comment(&self, comment_id: &str, body: &str) -> StoreResult<Comment> {
        if body.trim().is_empty() {
            return Err(StoreError::constraint(
                Entity::Comment,
                "comment body must not be empty",
            ));
        }

        self.conn
            .query_row(
                &format!(
                    "UPDATE comments
                     SET body = ?2,
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE comment_id = ?1
                       AND {LIVE_PREDICATE}
                     RETURNING comment_id, user_id, post_id, body, deleted_at, updated_at;"
                ),
                params![comment_id, body],
                parse_comment_row,
            )
            .optional()
            .map_err(write_error(Entity::Comment, "update"))?
            .ok_or_else(|| StoreError::not_found(Entity::Comment, comment_id))
    }

    fn delete_comment(&self, scope: &WriteScope<'_>, comment_id: &str) -> StoreResult<()> {
        let conn = scope.executor();
        let changed = conn
            .execute(
                &format!(
                    "UPDATE comments
                     SET deleted_at = CAST(strftime('%s', 'now') AS INTEGER),
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE comment_id = ?1
                       AND {LIVE_PREDICATE};"
                ),
                [comment_id],
            )
            .map_err(write_error(Entity::Comment, "delete"))?;
        if changed > 0 {
            return Ok(());
        }

        let exists: i64 = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM comments WHERE comment_id = ?1);",
                [comment_id],
                |row| row.get(0),
            )
            .map_err(query_error(Entity::Comment, "delete"))?;
        if exists == 1 {
            Ok(())
        } else {
            Err(StoreError::not_found(Entity::Comment, comment_id))
        }
    }

    fn delete_by_post(&self, scope: &WriteScope<'_>, post_id: &str) -> StoreResult<usize> {
        scope
            .executor()
            .execute(
                &format!(
                    "UPDATE comments
                     SET deleted_at = CAST(strftime('%s', 'now') AS INTEGER),
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE post_id = ?1
                       AND {LIVE_PREDICATE};"
                ),
                [post_id],
            )
            .map_err(write_error(Entity::Comment, "delete_by_post"))
    }

    fn list_comments(
        &self,
        filter: &CommentFilter,
        pagination: Pagination,
    ) -> StoreResult<ListPage<Comment>> {
        let query = SelectBuilder::new(COMMENT_SELECT_SQL)
            .filter_fixed(LIVE_PREDICATE)
            .filter_eq("post_id", filter.post_id.as_deref())
            .filter_eq("user_id", filter.user_id.as_deref())
            .order_by("updated_at DESC, comment_id ASC")
            .paginate(pagination)
            .build();

        let read = || -> rusqlite::Result<Vec<Comment>> {
            let mut stmt = self.conn.prepare(&query.sql)?;
            let mut rows = stmt.query(params_from_iter(query.params.iter()))?;
            let mut comments = Vec::new();
            while let Some(row) = rows.next()? {
                comments.push(parse_comment_row(row)?);
            }
            Ok(comments)
        };
        let items = read().map_err(query_error(Entity::Comment, "list"))?;
        Ok(ListPage::from_items(items))
    }

    fn begin_scope(&self) -> StoreResult<WriteScope<'_>> {
        WriteScope::begin(self.conn, Entity::Comment)
    }
}

fn parse_comment_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        comment_id: row.get("comment_id")?,
        user_id: row.get("user_id")?,
        post_id: row.get("post_id")?,
        body: row.get("body")?,
        deletion: DeletionState::from_marker(row.get("deleted_at")?),
        updated_at: row.get("updated_at")?,
    })
}
