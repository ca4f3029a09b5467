//! Tag association store.
//!
//! # Responsibility
//! - Write `(tag, post_id)` rows on behalf of the post aggregate.
//! - Serve per-post and popularity reads.
//!
//! # Invariants
//! - Writes only run inside a caller-supplied `WriteScope`.
//! - Tag text arrives pre-normalized; the store only rejects empty text.
//! - Tags are hard-deleted, never tombstoned.

use super::error::{query_error, write_error, Entity, StoreError, StoreResult};
use super::scope::WriteScope;
use super::{ensure_connection_ready, POSTS_SHAPE, TAGS_SHAPE};
use crate::model::tag::{Tag, TagCount};
use crate::query::{Pagination, SelectBuilder};
use rusqlite::{params, params_from_iter, Connection};

const POPULAR_SELECT_SQL: &str = "SELECT t.tag AS tag, COUNT(*) AS count
FROM tags t
INNER JOIN posts p ON p.post_id = t.post_id";

pub trait TagRepository {
    /// Inserts one association row inside `scope`.
    fn create_tag(&self, scope: &WriteScope<'_>, tag: &str, post_id: &str) -> StoreResult<Tag>;
    /// Removes every association for `post_id`; a post without tags is a no-op.
    fn delete_by_post(&self, scope: &WriteScope<'_>, post_id: &str) -> StoreResult<()>;
    /// Lists associations for one post in insertion order.
    fn list_by_post(&self, post_id: &str) -> StoreResult<Vec<Tag>>;
    /// Ranks tag texts by usage across live posts.
    fn popular(&self, pagination: Pagination) -> StoreResult<Vec<TagCount>>;
}

pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn, &[TAGS_SHAPE, POSTS_SHAPE])?;
        Ok(Self { conn })
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn create_tag(&self, scope: &WriteScope<'_>, tag: &str, post_id: &str) -> StoreResult<Tag> {
        if tag.trim().is_empty() {
            return Err(StoreError::constraint(
                Entity::Tag,
                format!("empty tag text for post {post_id}"),
            ));
        }

        scope
            .executor()
            .query_row(
                "INSERT INTO tags (tag, post_id) VALUES (?1, ?2) RETURNING tag, post_id;",
                params![tag, post_id],
                |row| {
                    Ok(Tag {
                        tag: row.get("tag")?,
                        post_id: row.get("post_id")?,
                    })
                },
            )
            .map_err(write_error(Entity::Tag, "create"))
    }

    fn delete_by_post(&self, scope: &WriteScope<'_>, post_id: &str) -> StoreResult<()> {
        scope
            .executor()
            .execute("DELETE FROM tags WHERE post_id = ?1;", [post_id])
            .map_err(write_error(Entity::Tag, "delete_by_post"))?;
        Ok(())
    }

    fn list_by_post(&self, post_id: &str) -> StoreResult<Vec<Tag>> {
        let read = || -> rusqlite::Result<Vec<Tag>> {
            let mut stmt = self.conn.prepare(
                "SELECT tag, post_id
                 FROM tags
                 WHERE post_id = ?1
                 ORDER BY rowid ASC;",
            )?;
            let mut rows = stmt.query([post_id])?;
            let mut tags = Vec::new();
            while let Some(row) = rows.next()? {
                tags.push(Tag {
                    tag: row.get("tag")?,
                    post_id: row.get("post_id")?,
                });
            }
            Ok(tags)
        };
        read().map_err(query_error(Entity::Tag, "list_by_post"))
    }

    fn popular(&self, pagination: Pagination) -> StoreResult<Vec<TagCount>> {
        let query = SelectBuilder::new(POPULAR_SELECT_SQL)
            .filter_fixed("(p.deleted_at IS NULL OR p.deleted_at = 0)")
            .group_by("t.tag")
            .order_by("count DESC, tag ASC")
            .paginate(pagination)
            .build();

        let read = || -> rusqlite::Result<Vec<TagCount>> {
            let mut stmt = self.conn.prepare(&query.sql)?;
            let mut rows = stmt.query(params_from_iter(query.params.iter()))?;
            let mut ranked = Vec::new();
            while let Some(row) = rows.next()? {
                ranked.push(TagCount {
                    tag: row.get("tag")?,
                    count: row.get("count")?,
                });
            }
            Ok(ranked)
        };
        read().map_err(query_error(Entity::Tag, "popular"))
    }
}
