//! Store error taxonomy shared by every repository.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Entity a store operation acted on; used as error and log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Post,
    Comment,
    Category,
    Tag,
}

impl Entity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
            Self::Category => "category",
            Self::Tag => "tag",
        }
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum StoreError {
    /// Requested id is absent or soft-deleted.
    NotFound { entity: Entity, id: String },
    /// Input rejected before reaching SQL.
    Constraint { entity: Entity, message: String },
    /// Statement, begin or commit failure on a write path.
    Write {
        entity: Entity,
        op: &'static str,
        source: DbError,
    },
    /// Failure on a read path.
    Query {
        entity: Entity,
        op: &'static str,
        source: DbError,
    },
    /// Schema introspection failed while validating a connection.
    Schema(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl StoreError {
    pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn constraint(entity: Entity, message: impl Into<String>) -> Self {
        Self::Constraint {
            entity,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Stable short code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Constraint { .. } => "constraint",
            Self::Write { .. } => "write_failed",
            Self::Query { .. } => "query_failed",
            Self::Schema(_) => "schema_inspection_failed",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_table",
            Self::MissingRequiredColumn { .. } => "missing_column",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Constraint { entity, message } => {
                write!(f, "{entity} constraint violated: {message}")
            }
            Self::Write { entity, op, source } => {
                write!(f, "{entity} {op} failed: {source}")
            }
            Self::Query { entity, op, source } => {
                write!(f, "{entity} {op} query failed: {source}")
            }
            Self::Schema(source) => write!(f, "schema inspection failed: {source}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "store requires table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "store requires column `{column}` in table `{table}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Write { source, .. } | Self::Query { source, .. } | Self::Schema(source) => {
                Some(source)
            }
            _ => None,
        }
    }
}

/// Maps a rusqlite failure on a write path into `StoreError::Write`.
pub(crate) fn write_error(
    entity: Entity,
    op: &'static str,
) -> impl FnOnce(rusqlite::Error) -> StoreError {
    move |err| StoreError::Write {
        entity,
        op,
        source: DbError::Sqlite(err),
    }
}

/// Maps a rusqlite failure on a read path into `StoreError::Query`.
pub(crate) fn query_error(
    entity: Entity,
    op: &'static str,
) -> impl FnOnce(rusqlite::Error) -> StoreError {
    move |err| StoreError::Query {
        entity,
        op,
        source: DbError::Sqlite(err),
    }
}
