//! Integration tests for the dish content repository.

mod helpers;

use std::time::Duration;

use serde_json::json;

use dishhub_core::error::{ErrorKind, PlatformError};
use dishhub_core::traits::blobs::BlobStore;
use dishhub_core::types::id::UserId;
use dishhub_platform::PlatformOp;
use dishhub_service::parse_tag_input;

use helpers::{BUCKET, COLLECTION, DATABASE, TestApp, jpeg};

#[tokio::test]
async fn test_feed_is_newest_first_and_profile_is_filtered() {
    let app = TestApp::new().await;
    let ana = UserId::from_raw("ana");
    let bo = UserId::from_raw("bo");

    let first = app
        .dishes
        .upload_dish(jpeg("a.jpg"), &ana, Some("Pho"), vec![])
        .await
        .expect("upload");
    let second = app
        .dishes
        .upload_dish(jpeg("b.jpg"), &bo, None, vec![])
        .await
        .expect("upload");
    let third = app
        .dishes
        .upload_dish(jpeg("c.jpg"), &ana, Some("Banh mi"), vec![])
        .await
        .expect("upload");

    let feed = app.dishes.get_all_dishes(10).await.expect("feed");
    let ids: Vec<_> = feed.iter().map(|d| d.id.clone()).collect();
    assert_eq!(ids, vec![third.id.clone(), second.id, first.id.clone()]);

    let limited = app.dishes.get_all_dishes(1).await.expect("feed");
    assert_eq!(limited.len(), 1);

    let mine = app.dishes.get_user_dishes(&ana, 10).await.expect("profile");
    let ids: Vec<_> = mine.iter().map(|d| d.id.clone()).collect();
    assert_eq!(ids, vec![third.id, first.id]);
}

#[tokio::test]
async fn test_uploaded_dish_starts_fresh() {
    let app = TestApp::new().await;
    let owner = UserId::from_raw("ana");

    let dish = app
        .dishes
        .upload_dish(jpeg("pho.jpg"), &owner, None, parse_tag_input("soup, noodles"))
        .await
        .expect("upload");

    assert_eq!(dish.likes, 0);
    assert!(dish.comments.is_empty());
    assert_eq!(dish.caption, "");
    assert_eq!(dish.tags, vec!["soup", "noodles"]);

    let image_id = dish.image_id.clone().expect("image id");
    assert!(app.memory.blobs.contains(BUCKET, &image_id));
    let url = dish.image_url.expect("image url");
    assert!(url.contains(image_id.as_str()));
    assert!(url.contains("width=2000"));
}

#[tokio::test]
async fn test_tag_containing_comma_comes_back_split() {
    let app = TestApp::new().await;
    let dish = app
        .dishes
        .upload_dish(
            jpeg("a.jpg"),
            &UserId::from_raw("ana"),
            None,
            vec!["a,b".to_string(), "c".to_string()],
        )
        .await
        .expect("upload");

    let read = app.dishes.get_dish(&dish.id).await.expect("read");
    assert_eq!(read.tags, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_unreadable_attributes_read_as_defaults_and_block_writes() {
    let app = TestApp::new().await;
    let dish = app
        .dishes
        .upload_dish(jpeg("a.jpg"), &UserId::from_raw("ana"), None, vec![])
        .await
        .expect("upload");

    let docs = &app.memory.documents;
    assert!(docs.put_raw_attribute(DATABASE, COLLECTION, dish.id.as_str(), "likes", json!("lots")));
    assert!(docs.put_raw_attribute(DATABASE, COLLECTION, dish.id.as_str(), "comments", json!("not json")));
    assert!(docs.put_raw_attribute(DATABASE, COLLECTION, dish.id.as_str(), "tags", json!(",, ,x")));

    let read = app.dishes.get_dish(&dish.id).await.expect("read");
    assert_eq!(read.likes, 0);
    assert!(read.comments.is_empty());
    assert_eq!(read.tags, vec!["x"]);

    let author = UserId::from_raw("bo");
    let err = app.dishes.like_dish(&read).await.expect_err("unreadable counter");
    assert_eq!(err.kind, ErrorKind::Update);
    let err = app
        .dishes
        .add_comment(&read, &author, "Bo", "Yum")
        .await
        .expect_err("unreadable comments");
    assert_eq!(err.kind, ErrorKind::Update);

    let stored = app.dishes.get_dish(&dish.id).await.expect("read");
    assert!(stored.likes_unreadable);
    assert!(stored.comments_unreadable);
}

#[tokio::test]
async fn test_decimal_counter_likes_from_its_integer_part() {
    let app = TestApp::new().await;
    let dish = app
        .dishes
        .upload_dish(jpeg("a.jpg"), &UserId::from_raw("ana"), None, vec![])
        .await
        .expect("upload");
    assert!(app.memory.documents.put_raw_attribute(
        DATABASE,
        COLLECTION,
        dish.id.as_str(),
        "likes",
        json!("12.0")
    ));

    let read = app.dishes.get_dish(&dish.id).await.expect("read");
    assert_eq!(read.likes, 12);

    let liked = app.dishes.like_dish(&read).await.expect("like");
    assert_eq!(liked.likes, 13);
}

#[tokio::test]
async fn test_comment_without_author_name_survives_new_comment() {
    let app = TestApp::new().await;
    let dish = app
        .dishes
        .upload_dish(jpeg("a.jpg"), &UserId::from_raw("ana"), None, vec![])
        .await
        .expect("upload");
    let stored = r#"[{"id":"c1","userId":"u1","comment":"Yum","createdAt":"2024-03-01T10:00:00.000Z"},{"id":"c2","userId":"u2","userName":"Bo","comment":"Great","createdAt":"2024-03-01T11:00:00.000Z"}]"#;
    assert!(app.memory.documents.put_raw_attribute(
        DATABASE,
        COLLECTION,
        dish.id.as_str(),
        "comments",
        json!(stored)
    ));

    let read = app.dishes.get_dish(&dish.id).await.expect("read");
    assert_eq!(read.comments.len(), 2);
    assert!(!read.comments_unreadable);

    let updated = app
        .dishes
        .add_comment(&read, &UserId::from_raw("u3"), "Cy", "Lovely")
        .await
        .expect("comment");
    let ids: Vec<_> = updated.comments.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids[..2], ["c1", "c2"]);
    let texts: Vec<_> = updated.comments.iter().map(|c| c.comment.as_str()).collect();
    assert_eq!(texts, vec!["Yum", "Great", "Lovely"]);
    assert_eq!(updated.comments[0].user_name, "");
}

#[tokio::test]
async fn test_like_writes_snapshot_plus_one() {
    let app = TestApp::new().await;
    let dish = app
        .dishes
        .upload_dish(jpeg("a.jpg"), &UserId::from_raw("ana"), None, vec![])
        .await
        .expect("upload");
    let snapshot = app.dishes.update_likes(&dish.id, 5).await.expect("seed likes");

    let liked = app.dishes.like_dish(&snapshot).await.expect("like");
    assert_eq!(liked.likes, 6);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_likes_from_same_snapshot_lose_one() {
    let app = TestApp::new().await;
    let dish = app
        .dishes
        .upload_dish(jpeg("a.jpg"), &UserId::from_raw("ana"), None, vec![])
        .await
        .expect("upload");
    let snapshot = app.dishes.update_likes(&dish.id, 5).await.expect("seed likes");
    app.memory
        .faults
        .set_latency(PlatformOp::UpdateDocument, Duration::from_millis(50));

    let (a, b) = tokio::join!(
        app.dishes.like_dish(&snapshot),
        app.dishes.like_dish(&snapshot)
    );
    a.expect("first like");
    b.expect("second like");

    let read = app.dishes.get_dish(&dish.id).await.expect("read");
    assert_eq!(read.likes, 6);
}

#[tokio::test]
async fn test_comments_append_in_order() {
    let app = TestApp::new().await;
    let author = UserId::from_raw("ana");
    let dish = app
        .dishes
        .upload_dish(jpeg("a.jpg"), &author, None, vec![])
        .await
        .expect("upload");

    let after_a = app
        .dishes
        .add_comment(&dish, &author, "Ana", "A")
        .await
        .expect("comment A");
    let after_b = app
        .dishes
        .add_comment(&after_a, &author, "Ana", "B")
        .await
        .expect("comment B");

    let texts: Vec<_> = after_b.comments.iter().map(|c| c.comment.as_str()).collect();
    assert_eq!(texts, vec!["A", "B"]);
    assert_eq!(after_b.comments[0].user_name, "Ana");
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_comments_from_same_snapshot_keep_one() {
    let app = TestApp::new().await;
    let author = UserId::from_raw("ana");
    let dish = app
        .dishes
        .upload_dish(jpeg("a.jpg"), &author, None, vec![])
        .await
        .expect("upload");
    app.memory
        .faults
        .set_latency(PlatformOp::UpdateDocument, Duration::from_millis(50));

    let (a, b) = tokio::join!(
        app.dishes.add_comment(&dish, &author, "Ana", "A"),
        app.dishes.add_comment(&dish, &author, "Ana", "B")
    );
    a.expect("first comment");
    b.expect("second comment");

    let read = app.dishes.get_dish(&dish.id).await.expect("read");
    assert_eq!(read.comments.len(), 1);
}

#[tokio::test]
async fn test_failed_document_write_leaves_orphaned_image() {
    let app = TestApp::new().await;
    app.memory.faults.fail_next(
        PlatformOp::CreateDocument,
        PlatformError::api(500, "general_server_error", "boom"),
    );

    let err = app
        .dishes
        .upload_dish(jpeg("a.jpg"), &UserId::from_raw("ana"), None, vec![])
        .await
        .expect_err("document write fails");

    assert_eq!(err.kind, ErrorKind::Upload);
    assert_eq!(app.memory.documents.document_count(DATABASE, COLLECTION), 0);

    let ids = app.memory.blobs.file_ids(BUCKET);
    assert_eq!(ids.len(), 1);
    let orphan = app
        .memory
        .blobs
        .get_file(BUCKET, &ids[0])
        .await
        .expect("orphaned image is reachable by its id");
    assert_eq!(orphan.id, ids[0]);
    assert_eq!(app.memory.blobs.read(BUCKET, &ids[0]).expect("content"), jpeg("a.jpg").data);
}

#[tokio::test]
async fn test_delete_succeeds_when_image_is_already_gone() {
    let app = TestApp::new().await;
    let dish = app
        .dishes
        .upload_dish(jpeg("a.jpg"), &UserId::from_raw("ana"), None, vec![])
        .await
        .expect("upload");
    let image_id = dish.image_id.clone().expect("image id");
    app.memory.blobs.remove_silently(BUCKET, &image_id);

    app.dishes
        .delete_dish(&dish.id, Some(&image_id))
        .await
        .expect("delete");

    let err = app.dishes.get_dish(&dish.id).await.expect_err("gone");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_failed_document_delete_is_update_error() {
    let app = TestApp::new().await;
    let dish = app
        .dishes
        .upload_dish(jpeg("a.jpg"), &UserId::from_raw("ana"), None, vec![])
        .await
        .expect("upload");
    app.memory.faults.fail_next(
        PlatformOp::DeleteDocument,
        PlatformError::Network("connection reset".into()),
    );

    let err = app
        .dishes
        .delete_dish(&dish.id, dish.image_id.as_ref())
        .await
        .expect_err("delete fails");
    assert_eq!(err.kind, ErrorKind::Update);
    assert!(app.dishes.get_dish(&dish.id).await.is_ok());
}
