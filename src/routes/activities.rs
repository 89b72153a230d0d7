// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity routes.

use crate::error::{AppError, Result};
use crate::middleware::UseData;
use crate::models::{Activity, NewActivity};
use crate::AppState;
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(list_activities).post(add_activity))
        .route(
            "/api/activities/{id}",
            put(update_activity).delete(delete_activity),
        )
}

/// All activities, most recent first.
async fn list_activities(UseData(store): UseData) -> Json<Vec<Activity>> {
    Json(store.activities())
}

async fn add_activity(
    UseData(store): UseData,
    Json(activity): Json<NewActivity>,
) -> (StatusCode, Json<Activity>) {
    (StatusCode::CREATED, Json(store.add_activity(activity)))
}

/// Replace an activity. Unknown ids are accepted and ignored.
async fn update_activity(
    UseData(store): UseData,
    Path(id): Path<String>,
    Json(activity): Json<Activity>,
) -> Result<StatusCode> {
    if activity.id != id {
        return Err(AppError::BadRequest(format!(
            "Activity id {} does not match path id {}",
            activity.id, id
        )));
    }

    store.update_activity(activity);
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_activity(UseData(store): UseData, Path(id): Path<String>) -> StatusCode {
    store.delete_activity(&id);
    StatusCode::NO_CONTENT
}
