// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity photo routes (require a session user).
//!
//! The returned key or URL is what the client stores in `Activity.photo`;
//! the store treats it as an opaque string.

use crate::error::{AppError, Result};
use crate::middleware::{require_session, SessionUser};
use crate::services::{generate_file_name, UploadedFile};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_EXTENSION_LEN: usize = 10;
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/photos", post(upload_photo).delete(delete_photo))
        .route("/api/photos/url", get(get_photo_url))
        .route_layer(middleware::from_fn(require_session))
}

#[derive(Debug, Deserialize)]
struct UploadQuery {
    ext: String,
}

#[derive(Debug, Deserialize)]
struct KeyQuery {
    key: String,
}

#[derive(Serialize)]
struct PhotoUrl {
    url: String,
}

/// Upload the request body as a photo for the session user.
async fn upload_photo(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadedFile>)> {
    let ext = query.ext.trim_start_matches('.');
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(AppError::BadRequest(format!(
            "Invalid file extension: {:?}",
            query.ext
        )));
    }
    if body.is_empty() {
        return Err(AppError::BadRequest("Empty upload".to_string()));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE);

    let file_name = generate_file_name(&user.id, ext);
    tracing::info!(user_id = %user.id, key = %file_name, size = body.len(), "Uploading photo");

    let uploaded = state
        .storage
        .upload_file(body.to_vec(), content_type, &file_name)
        .await?;

    Ok((StatusCode::CREATED, Json(uploaded)))
}

async fn get_photo_url(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<PhotoUrl>> {
    let url = state.storage.get_file_url(&query.key).await?;
    Ok(Json(PhotoUrl { url }))
}

async fn delete_photo(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KeyQuery>,
) -> Result<StatusCode> {
    state.storage.delete_file(&query.key).await?;
    Ok(StatusCode::NO_CONTENT)
}
