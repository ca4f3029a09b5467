//! Repository layer: stores for posts, tags, comments and categories.
//!
//! # Responsibility
//! - Keep SQL details inside the persistence boundary.
//! - Compose multi-entity writes through one `WriteScope`.
//!
//! # Invariants
//! - Every read path excludes soft-deleted rows.
//! - Stores refuse connections that are not fully migrated.
//! - Transactional store operations never open their own transaction.

pub mod category_repo;
pub mod comment_repo;
pub mod error;
pub mod post_repo;
pub mod scope;
pub mod tag_repo;

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use error::{StoreError, StoreResult};
use rusqlite::Connection;

/// Row predicate for live (not soft-deleted) rows of a single table.
pub(crate) const LIVE_PREDICATE: &str = "(deleted_at IS NULL OR deleted_at = 0)";

/// Table name plus columns a store reads or writes.
pub(crate) type TableShape = (&'static str, &'static [&'static str]);

pub(crate) const POSTS_SHAPE: TableShape = (
    "posts",
    &[
        "post_id",
        "user_id",
        "title",
        "body",
        "category_id",
        "tags",
        "deleted_at",
        "updated_at",
    ],
);
pub(crate) const COMMENTS_SHAPE: TableShape = (
    "comments",
    &[
        "comment_id",
        "user_id",
        "post_id",
        "body",
        "deleted_at",
        "updated_at",
    ],
);
pub(crate) const CATEGORIES_SHAPE: TableShape =
    ("categories", &["category_id", "name", "deleted_at", "updated_at"]);
pub(crate) const TAGS_SHAPE: TableShape = ("tags", &["tag", "post_id"]);

/// Verifies schema version and table layout before a store is handed out.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    shapes: &[TableShape],
) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn).map_err(StoreError::Schema)?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for (table, columns) in shapes {
        if !table_exists(conn, table).map_err(schema_error)? {
            return Err(StoreError::MissingRequiredTable(table));
        }
        for column in columns.iter() {
            if !table_has_column(conn, table, column).map_err(schema_error)? {
                return Err(StoreError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn schema_error(err: rusqlite::Error) -> StoreError {
    StoreError::Schema(DbError::Sqlite(err))
}
