// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_tracker::config::Config;
use activity_tracker::db::MemorySnapshotStore;
use activity_tracker::models::NewActivity;
use activity_tracker::routes::create_router;
use activity_tracker::services::{IdentityService, StorageService};
use activity_tracker::store::DataStore;
use activity_tracker::AppState;
use axum::body::Body;
use axum::http::{header, Request, Response};
use std::sync::Arc;

/// Test app wired to in-memory persistence and mock AWS services.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub store: DataStore,
    pub persistence: Arc<MemorySnapshotStore>,
    pub state: Arc<AppState>,
}

/// Create a test app with offline mock dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let persistence = Arc::new(MemorySnapshotStore::new());
    let store = DataStore::open(persistence.clone());

    let state = Arc::new(AppState {
        config: Config::default(),
        identity: IdentityService::new_mock(),
        storage: StorageService::new_mock(),
    });

    TestApp {
        router: create_router(state.clone(), store.clone()),
        store,
        persistence,
        state,
    }
}

/// Build a request with a JSON body.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request with no body.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A run with the given date.
#[allow(dead_code)]
pub fn sample_activity(date: &str) -> NewActivity {
    NewActivity {
        activity_type: "run".to_string(),
        date: date.to_string(),
        duration: 30.0,
        distance: 5.0,
        photo: None,
        owner: None,
    }
}
