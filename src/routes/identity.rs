//! Identity provider routes.
//!
//! Thin pass-through to the Cognito user pool. Results are returned to
//! the client and never written into the local store.

use crate::error::Result;
use crate::models::Credentials;
use crate::services::{IdentityUser, SignUpOutcome};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/identity/signup", post(sign_up))
        .route("/api/identity/login", post(sign_in))
        .route("/api/identity/logout", post(sign_out))
        .route("/api/identity/me", get(current_user))
}

async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<SignUpOutcome>> {
    let outcome = state
        .identity
        .sign_up(&credentials.email, &credentials.password)
        .await?;
    Ok(Json(outcome))
}

async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<IdentityUser>> {
    let user = state
        .identity
        .sign_in(&credentials.email, &credentials.password)
        .await?;
    Ok(Json(user))
}

async fn sign_out(State(state): State<Arc<AppState>>) -> Result<StatusCode> {
    state.identity.sign_out().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn current_user(State(state): State<Arc<AppState>>) -> Result<Json<Option<IdentityUser>>> {
    Ok(Json(state.identity.current_user().await?))
}
