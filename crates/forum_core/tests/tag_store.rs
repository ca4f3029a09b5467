use forum_core::db::open_db_in_memory;
use forum_core::{
    CategoryRepository, Entity, Pagination, Post, PostRepository, SqliteCategoryRepository,
    SqlitePostRepository, SqliteTagRepository, StoreError, TagCount, TagRepository, WriteScope,
};
use rusqlite::Connection;

#[test]
fn create_tag_rejects_empty_text() {
    let conn = setup();
    let repo = SqliteTagRepository::try_new(&conn).unwrap();

    let scope = WriteScope::begin(&conn, Entity::Tag).unwrap();
    assert!(matches!(
        repo.create_tag(&scope, "", "p1"),
        Err(StoreError::Constraint {
            entity: Entity::Tag,
            ..
        })
    ));
    assert!(matches!(
        repo.create_tag(&scope, "  ", "p1"),
        Err(StoreError::Constraint { .. })
    ));
    scope.rollback().unwrap();
}

#[test]
fn create_tag_requires_existing_post() {
    let conn = setup();
    let repo = SqliteTagRepository::try_new(&conn).unwrap();

    let scope = WriteScope::begin(&conn, Entity::Tag).unwrap();
    assert!(matches!(
        repo.create_tag(&scope, "#a", "missing"),
        Err(StoreError::Write {
            entity: Entity::Tag,
            op: "create",
            ..
        })
    ));
}

#[test]
fn tag_writes_follow_scope_outcome() {
    let conn = setup();
    let repo = SqliteTagRepository::try_new(&conn).unwrap();

    {
        let scope = WriteScope::begin(&conn, Entity::Tag).unwrap();
        repo.create_tag(&scope, "#dropped", "p1").unwrap();
    }
    assert!(repo.list_by_post("p1").unwrap().is_empty());

    let scope = WriteScope::begin(&conn, Entity::Tag).unwrap();
    let created = repo.create_tag(&scope, "#kept", "p1").unwrap();
    scope.commit().unwrap();
    assert_eq!(created.tag, "#kept");
    assert_eq!(repo.list_by_post("p1").unwrap(), vec![created]);
}

#[test]
fn delete_by_post_without_tags_is_noop() {
    let conn = setup();
    let repo = SqliteTagRepository::try_new(&conn).unwrap();

    let scope = WriteScope::begin(&conn, Entity::Tag).unwrap();
    repo.delete_by_post(&scope, "p1").unwrap();
    repo.delete_by_post(&scope, "never-existed").unwrap();
    scope.commit().unwrap();
}

#[test]
fn list_by_post_keeps_insertion_order() {
    let conn = setup();
    let posts = SqlitePostRepository::try_new(&conn).unwrap();
    posts
        .create_post(
            &Post::new("p2", "u1", "T", "B", "c1", "#zeta, #alpha, #mid"),
            &tags(&["#zeta", "#alpha", "#mid"]),
        )
        .unwrap();

    let repo = SqliteTagRepository::try_new(&conn).unwrap();
    let texts: Vec<_> = repo
        .list_by_post("p2")
        .unwrap()
        .into_iter()
        .map(|tag| tag.tag)
        .collect();
    assert_eq!(texts, vec!["#zeta", "#alpha", "#mid"]);
    assert!(repo.list_by_post("p1").unwrap().is_empty());
}

#[test]
fn popular_counts_live_posts_only() {
    let conn = setup();
    let posts = SqlitePostRepository::try_new(&conn).unwrap();
    posts
        .create_post(
            &Post::new("a", "u1", "T", "B", "c1", "#rust, #db"),
            &tags(&["#rust", "#db"]),
        )
        .unwrap();
    posts
        .create_post(
            &Post::new("b", "u1", "T", "B", "c1", "#rust"),
            &tags(&["#rust"]),
        )
        .unwrap();
    posts
        .create_post(
            &Post::new("c", "u1", "T", "B", "c1", "#rust, #go"),
            &tags(&["#rust", "#go"]),
        )
        .unwrap();
    posts.delete_post("c").unwrap();

    let repo = SqliteTagRepository::try_new(&conn).unwrap();
    assert_eq!(
        repo.popular(Pagination::default()).unwrap(),
        vec![count("#rust", 2), count("#db", 1)]
    );
    assert_eq!(
        repo.popular(Pagination::new(1, 0)).unwrap(),
        vec![count("#rust", 2)]
    );
    assert_eq!(
        repo.popular(Pagination::new(0, 1)).unwrap(),
        vec![count("#db", 1)]
    );
}

fn setup() -> Connection {
    let conn = open_db_in_memory().unwrap();
    SqliteCategoryRepository::try_new(&conn)
        .unwrap()
        .create_category("c1", "general")
        .unwrap();
    SqlitePostRepository::try_new(&conn)
        .unwrap()
        .create_post(&Post::new("p1", "u1", "T", "B", "c1", ""), &[])
        .unwrap();
    conn
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn count(tag: &str, count: i64) -> TagCount {
    TagCount {
        tag: tag.to_string(),
        count,
    }
}
