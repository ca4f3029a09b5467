use forum_core::{DeletionState, ListPage, Pagination, Post, PostFilter};
use serde_json::json;

#[test]
fn post_serializes_with_tagged_deletion_state() {
    let mut post = Post::new("p1", "u1", "Title", "Body", "c1", "#x, #y");
    post.updated_at = 1_700_000_000_000;

    let value = serde_json::to_value(&post).unwrap();
    assert_eq!(
        value,
        json!({
            "post_id": "p1",
            "user_id": "u1",
            "title": "Title",
            "body": "Body",
            "category_id": "c1",
            "tags": "#x, #y",
            "deletion": { "state": "active" },
            "updated_at": 1_700_000_000_000_i64,
        })
    );

    post.deletion = DeletionState::DeletedAt(1_700_000_000);
    let value = serde_json::to_value(&post).unwrap();
    assert_eq!(
        value["deletion"],
        json!({ "state": "deleted_at", "at": 1_700_000_000 })
    );

    let decoded: Post = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, post);
}

#[test]
fn list_inputs_deserialize_from_sparse_json() {
    let filter: PostFilter = serde_json::from_value(json!({
        "user_id": "u1",
        "category_id": null,
        "title": null,
        "body": null,
        "tags": "#rust",
    }))
    .unwrap();
    assert_eq!(filter.user_id.as_deref(), Some("u1"));
    assert_eq!(filter.tags.as_deref(), Some("#rust"));
    assert!(filter.category_id.is_none());

    let pagination: Pagination = serde_json::from_value(json!({ "limit": 10, "offset": 20 })).unwrap();
    assert_eq!(pagination, Pagination::new(10, 20));

    let page = ListPage::from_items(vec![1, 2, 3]);
    assert_eq!(
        serde_json::to_value(&page).unwrap(),
        json!({ "items": [1, 2, 3], "count": 3 })
    );
}
