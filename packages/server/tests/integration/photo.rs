use ::common::storage::ObjectStore;
use uuid::Uuid;

use crate::common::{PNG_BYTES, TestApp, lot_a, routes};

#[tokio::test]
async fn owner_can_upload_a_photo_and_gets_a_signed_url() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;
    let terrain_id = app.create_terrain(&token, &lot_a()).await;

    let res = app
        .upload_with_token(
            &routes::photos(terrain_id),
            "front.png",
            "image/png",
            PNG_BYTES.to_vec(),
            &token,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    let photo_id = res.id();
    let key = format!("{terrain_id}/{photo_id}");
    let url = res.body["url"].as_str().unwrap();
    assert!(url.contains(&key));
    assert!(url.ends_with("X-Amz-Expires=3600"));

    let stored = app.store.get(&key).await.expect("object should be stored");
    assert_eq!(stored, PNG_BYTES);
    assert_eq!(app.store.object(&key).unwrap().1, "image/png");
}

#[tokio::test]
async fn uploaded_photos_appear_on_the_terrain() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;
    let terrain_id = app.create_terrain(&token, &lot_a()).await;
    let first = app.upload_photo(terrain_id, &token).await;
    let second = app.upload_photo(terrain_id, &token).await;

    let detail = app.get_without_token(&routes::terrain(terrain_id)).await;
    let listed = app.get_without_token(routes::TERRAINS).await;

    let ids: Vec<_> = detail.body["photos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![first.to_string(), second.to_string()]);
    assert_eq!(listed.body[0]["photos"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn content_type_is_guessed_from_the_file_name() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;
    let terrain_id = app.create_terrain(&token, &lot_a()).await;

    let res = app
        .upload_with_token(
            &routes::photos(terrain_id),
            "view.jpg",
            "application/octet-stream",
            PNG_BYTES.to_vec(),
            &token,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    let key = format!("{terrain_id}/{}", res.id());
    assert_eq!(app.store.object(&key).unwrap().1, "image/jpeg");
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;
    let terrain_id = app.create_terrain(&token, &lot_a()).await;

    let res = app
        .upload_with_token(
            &routes::photos(terrain_id),
            "notes.txt",
            "text/plain",
            b"hello".to_vec(),
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(app.store.keys().is_empty());
}

#[tokio::test]
async fn oversized_photo_is_rejected() {
    let app = TestApp::spawn_with_max_photo_size(8).await;
    let token = app.create_authenticated_user("alice", "securepass").await;
    let terrain_id = app.create_terrain(&token, &lot_a()).await;

    let res = app
        .upload_with_token(
            &routes::photos(terrain_id),
            "front.png",
            "image/png",
            PNG_BYTES.to_vec(),
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert!(app.store.keys().is_empty());
}

#[tokio::test]
async fn other_user_cannot_upload() {
    let app = TestApp::spawn().await;
    let alice = app.create_authenticated_user("alice", "securepass").await;
    let bob = app.create_authenticated_user("bob", "securepass").await;
    let terrain_id = app.create_terrain(&alice, &lot_a()).await;

    let res = app
        .upload_with_token(
            &routes::photos(terrain_id),
            "front.png",
            "image/png",
            PNG_BYTES.to_vec(),
            &bob,
        )
        .await;

    assert_eq!(res.status, 403);
    assert!(app.store.keys().is_empty());
}

#[tokio::test]
async fn upload_to_unknown_terrain_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let res = app
        .upload_with_token(
            &routes::photos(Uuid::now_v7()),
            "front.png",
            "image/png",
            PNG_BYTES.to_vec(),
            &token,
        )
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn owner_can_delete_a_photo() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;
    let terrain_id = app.create_terrain(&token, &lot_a()).await;
    let photo_id = app.upload_photo(terrain_id, &token).await;

    let res = app
        .delete_with_token(&routes::photo(terrain_id, photo_id), &token)
        .await;

    assert_eq!(res.status, 204);
    assert!(app.store.keys().is_empty());
    let detail = app.get_without_token(&routes::terrain(terrain_id)).await;
    assert_eq!(detail.body["photos"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn photo_cannot_be_deleted_through_another_terrain() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;
    let first = app.create_terrain(&token, &lot_a()).await;
    let second = app.create_terrain(&token, &lot_a()).await;
    let photo_id = app.upload_photo(first, &token).await;

    let res = app
        .delete_with_token(&routes::photo(second, photo_id), &token)
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(app.store.keys(), vec![format!("{first}/{photo_id}")]);
}

#[tokio::test]
async fn deleting_a_terrain_removes_its_photos() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;
    let terrain_id = app.create_terrain(&token, &lot_a()).await;
    app.upload_photo(terrain_id, &token).await;
    app.upload_photo(terrain_id, &token).await;
    assert_eq!(app.store.keys().len(), 2);

    let res = app
        .delete_with_token(&routes::terrain(terrain_id), &token)
        .await;

    assert_eq!(res.status, 204);
    assert!(app.store.keys().is_empty());
}
