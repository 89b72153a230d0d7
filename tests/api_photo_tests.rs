// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Photo upload routes against mock object storage.

use activity_tracker::models::Credentials;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn upload_request(ext: &str, body: &'static [u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/photos?ext={}", ext))
        .header(header::CONTENT_TYPE, "image/jpeg")
        .body(Body::from(body))
        .unwrap()
}

fn login(app: &common::TestApp) -> String {
    app.store
        .login(&Credentials {
            email: "photo@example.com".to_string(),
            password: "pw".to_string(),
        })
        .id
}

#[tokio::test]
async fn test_upload_requires_session() {
    let app = common::create_test_app();

    let response = app
        .router
        .oneshot(upload_request("jpg", b"\xff\xd8\xff"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_stores_under_user_prefix() {
    let app = common::create_test_app();
    let user_id = login(&app);

    let response = app
        .router
        .oneshot(upload_request("jpg", b"\xff\xd8\xff"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let uploaded = common::body_json(response).await;
    let key = uploaded["key"].as_str().unwrap();
    assert!(key.starts_with(&format!("activities/{}/", user_id)));
    assert!(key.ends_with(".jpg"));
    assert!(uploaded["url"].as_str().unwrap().contains(key));

    assert_eq!(
        app.state.storage.mock_object(key),
        Some(("image/jpeg".to_string(), 3))
    );
}

#[tokio::test]
async fn test_upload_rejects_bad_extension_and_empty_body() {
    let app = common::create_test_app();
    login(&app);

    let response = app
        .router
        .clone()
        .oneshot(upload_request("j%2Fpg", b"data"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .router
        .oneshot(upload_request("png", b""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_url_and_delete() {
    let app = common::create_test_app();
    login(&app);

    let response = app
        .router
        .clone()
        .oneshot(upload_request("png", b"png-bytes"))
        .await
        .unwrap();
    let key = common::body_json(response).await["key"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .router
        .clone()
        .oneshot(common::empty_request(
            "GET",
            &format!("/api/photos/url?key={}", key),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let url = common::body_json(response).await["url"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(url.ends_with(&format!("public/{}", key)));

    let response = app
        .router
        .oneshot(common::empty_request(
            "DELETE",
            &format!("/api/photos?key={}", key),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.state.storage.mock_object(&key), None);
}

#[tokio::test]
async fn test_url_rejects_path_traversal() {
    let app = common::create_test_app();
    login(&app);

    let response = app
        .router
        .oneshot(common::empty_request(
            "GET",
            "/api/photos/url?key=..%2Fsecret",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
