// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session-user middleware.

use crate::error::AppError;
use crate::middleware::provider::UseData;
use crate::models::User;
use axum::{extract::Request, middleware::Next, response::Response};

/// Session user attached to requests that passed [`require_session`].
#[derive(Debug, Clone)]
pub struct SessionUser(pub User);

/// Middleware that requires a logged-in local session.
///
/// Only the store's session slot is consulted; the identity provider is
/// not asked.
pub async fn require_session(
    UseData(store): UseData,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = store.user().ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(SessionUser(user));
    Ok(next.run(request).await)
}
