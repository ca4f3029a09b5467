use forum_core::db::open_db_in_memory;
use forum_core::{
    CategoryFilter, CategoryService, CommentFilter, CommentService, CreatePostRequest,
    Pagination, PostFilter, PostService, ServiceError, SqliteCategoryRepository,
    SqliteCommentRepository, SqlitePostRepository, SqliteTagRepository, StoreError, TagCount,
    TagService, UpdatePostRequest,
};
use rusqlite::Connection;

#[test]
fn create_post_normalizes_tags_and_assigns_id() {
    let conn = open_db_in_memory().unwrap();
    let category_id = seed_category(&conn);
    let posts = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
    let tags = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());

    let post = posts
        .create_post(create_request(&category_id, " #x, #y  #x "))
        .unwrap();
    assert!(uuid::Uuid::parse_str(&post.post_id).is_ok());
    assert_eq!(post.tags, "#x, #y");

    let texts: Vec<_> = tags
        .post_tags(&post.post_id)
        .unwrap()
        .into_iter()
        .map(|tag| tag.tag)
        .collect();
    assert_eq!(texts, vec!["#x", "#y"]);
}

#[test]
fn invalid_tag_input_is_rejected_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let category_id = seed_category(&conn);
    let posts = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());

    for raw in ["rust", "#rust, db", "#", "#ok; #no"] {
        let err = posts
            .create_post(create_request(&category_id, raw))
            .unwrap_err();
        assert!(
            matches!(err, ServiceError::InvalidTags(ref value) if value == raw),
            "unexpected error for {raw}: {err}"
        );
    }

    let listed = posts
        .list_posts(&PostFilter::default(), Pagination::default())
        .unwrap();
    assert_eq!(listed.count, 0);
}

#[test]
fn update_post_replaces_tags_and_fields() {
    let conn = open_db_in_memory().unwrap();
    let category_id = seed_category(&conn);
    let posts = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
    let tags = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());
    let post = posts
        .create_post(create_request(&category_id, "#a #b"))
        .unwrap();

    let updated = posts
        .update_post(UpdatePostRequest {
            post_id: post.post_id.clone(),
            title: "Edited".to_string(),
            body: "New body".to_string(),
            category_id: category_id.clone(),
            tags: "#c".to_string(),
        })
        .unwrap();
    assert_eq!(updated.title, "Edited");
    assert_eq!(updated.tags, "#c");
    assert_eq!(posts.get_post(&post.post_id).unwrap(), updated);
    assert_eq!(tags.post_tags(&post.post_id).unwrap().len(), 1);

    let missing = posts
        .update_post(UpdatePostRequest {
            post_id: "ghost".to_string(),
            title: "x".to_string(),
            body: "x".to_string(),
            category_id,
            tags: String::new(),
        })
        .unwrap_err();
    assert!(missing.is_not_found());
}

#[test]
fn comment_service_lifecycle_and_post_cascade() {
    let conn = open_db_in_memory().unwrap();
    let category_id = seed_category(&conn);
    let posts = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
    let comments = CommentService::new(SqliteCommentRepository::try_new(&conn).unwrap());
    let post = posts.create_post(create_request(&category_id, "")).unwrap();

    let first = comments
        .create_comment("u2", post.post_id.as_str(), "nice")
        .unwrap();
    let second = comments
        .create_comment("u3", post.post_id.as_str(), "agreed")
        .unwrap();
    assert_ne!(first.comment_id, second.comment_id);

    assert_eq!(
        comments.update_comment(&first.comment_id, "very nice").unwrap().body,
        "very nice"
    );
    comments.delete_comment(&first.comment_id).unwrap();
    comments.delete_comment(&first.comment_id).unwrap();
    assert!(comments.delete_comment("ghost").unwrap_err().is_not_found());

    posts.delete_post(&post.post_id).unwrap();
    assert!(comments
        .get_comment(&second.comment_id)
        .unwrap_err()
        .is_not_found());
    let listed = comments
        .list_comments(&CommentFilter::default(), Pagination::default())
        .unwrap();
    assert!(listed.items.is_empty());
}

#[test]
fn empty_comment_body_surfaces_store_constraint() {
    let conn = open_db_in_memory().unwrap();
    let category_id = seed_category(&conn);
    let posts = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
    let comments = CommentService::new(SqliteCommentRepository::try_new(&conn).unwrap());
    let post = posts.create_post(create_request(&category_id, "")).unwrap();

    let err = comments
        .create_comment("u2", post.post_id.as_str(), "")
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Store(StoreError::Constraint { .. })
    ));
}

#[test]
fn category_service_assigns_ids_and_lists() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());

    let general = categories.create_category("General").unwrap();
    let news = categories.create_category("News").unwrap();
    assert_ne!(general.category_id, news.category_id);

    categories
        .update_category(&news.category_id, "Announcements")
        .unwrap();
    categories.delete_category(&general.category_id).unwrap();
    assert!(categories
        .get_category(&general.category_id)
        .unwrap_err()
        .is_not_found());

    let listed = categories
        .list_categories(&CategoryFilter::default(), Pagination::default())
        .unwrap();
    assert_eq!(listed.count, 1);
    assert_eq!(listed.items[0].name, "Announcements");
}

#[test]
fn popular_tags_reflect_live_posts() {
    let conn = open_db_in_memory().unwrap();
    let category_id = seed_category(&conn);
    let posts = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
    let tags = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());

    posts
        .create_post(create_request(&category_id, "#rust #db"))
        .unwrap();
    let doomed = posts
        .create_post(create_request(&category_id, "#db"))
        .unwrap();
    posts.delete_post(&doomed.post_id).unwrap();

    assert_eq!(
        tags.popular_tags(Pagination::default()).unwrap(),
        vec![
            TagCount {
                tag: "#db".to_string(),
                count: 1
            },
            TagCount {
                tag: "#rust".to_string(),
                count: 1
            },
        ]
    );
}

fn seed_category(conn: &Connection) -> String {
    CategoryService::new(SqliteCategoryRepository::try_new(conn).unwrap())
        .create_category("general")
        .unwrap()
        .category_id
}

fn create_request(category_id: &str, tags: &str) -> CreatePostRequest {
    CreatePostRequest {
        user_id: "u1".to_string(),
        title: "Hello".to_string(),
        body: "World".to_string(),
        category_id: category_id.to_string(),
        tags: tags.to_string(),
    }
}
