// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local session routes.
//!
//! These act on the store's session slot only. Credentials are accepted
//! but not verified; see `/api/identity/*` for provider-backed sign-in.

use crate::middleware::UseData;
use crate::models::{Credentials, User};
use crate::AppState;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/signup", post(signup))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
}

/// Current session user, `null` when logged out.
async fn get_session(UseData(store): UseData) -> Json<Option<User>> {
    Json(store.user())
}

async fn signup(UseData(store): UseData, Json(credentials): Json<Credentials>) -> Json<User> {
    Json(store.signup(&credentials))
}

async fn login(UseData(store): UseData, Json(credentials): Json<Credentials>) -> Json<User> {
    Json(store.login(&credentials))
}

async fn logout(UseData(store): UseData) -> StatusCode {
    store.logout();
    StatusCode::NO_CONTENT
}
