//! Connection bootstrap for forum databases.
//!
//! Every returned connection enforces foreign keys, carries the
//! [`UNICODE_LOWER_FN`] SQL function and is migrated to the latest schema.
//! Lock contention waits up to `BUSY_TIMEOUT`.

use super::migrations::{apply_migrations, latest_version};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQL name of the Unicode-aware lowercase function; SQLite's `LOWER()`
/// only folds ASCII.
pub const UNICODE_LOWER_FN: &str = "unicode_lower";

/// Opens (creating if needed) a forum database file and migrates it.
///
/// Emits one `db_open` event with the outcome and duration.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory database; each call is isolated.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let opened = connect()
        .map_err(DbError::from)
        .and_then(|mut conn| bootstrap_connection(&mut conn).map(|()| conn));

    let duration_ms = started_at.elapsed().as_millis();
    match &opened {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={duration_ms} schema_version={}",
            latest_version()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={duration_ms} error_code={} error={err}",
            err.code()
        ),
    }
    opened
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    register_unicode_lower(conn)?;
    apply_migrations(conn)?;
    Ok(())
}

/// Folds text with the same rules as `str::to_lowercase`; `NULL` stays `NULL`.
fn register_unicode_lower(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        UNICODE_LOWER_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|value| value.to_lowercase()))
        },
    )
}
