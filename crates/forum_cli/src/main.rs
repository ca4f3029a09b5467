//! CLI smoke entry point.
//!
//! Usage: `forum_cli [DB_PATH] [LOG_DIR]`
//!
//! Opens (and migrates) the database at `DB_PATH`, or an in-memory one, and
//! prints a short deterministic summary. File logging starts only when
//! `LOG_DIR` is given.

use forum_core::db::migrations::current_user_version;
use forum_core::db::{open_db, open_db_in_memory};
use forum_core::{
    default_log_level, init_logging, CategoryFilter, CategoryService, Pagination, PostFilter,
    PostService, SqliteCategoryRepository, SqlitePostRepository, SqliteTagRepository, TagService,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let db_path = args.next();

    if let Some(log_dir) = args.next() {
        let log_dir = std::env::current_dir()?.join(log_dir);
        init_logging(default_log_level(), &log_dir.to_string_lossy())?;
    }

    let conn = match db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };

    let posts = PostService::new(SqlitePostRepository::try_new(&conn)?);
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn)?);
    let tags = TagService::new(SqliteTagRepository::try_new(&conn)?);

    let live_posts = posts.list_posts(&PostFilter::default(), Pagination::default())?;
    let live_categories =
        categories.list_categories(&CategoryFilter::default(), Pagination::default())?;
    let top_tags = tags.popular_tags(Pagination::new(5, 0))?;

    println!("forum_core version={}", forum_core::core_version());
    println!("schema_version={}", current_user_version(&conn)?);
    println!("posts={}", live_posts.count);
    println!("categories={}", live_categories.count);
    for entry in top_tags {
        println!("tag {} {}", entry.tag, entry.count);
    }
    Ok(())
}
