// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_tracker::error::AppError;
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[test]
fn test_missing_provider_message() {
    assert_eq!(
        AppError::MissingProvider.to_string(),
        "useData must be used within a DataProvider"
    );
}

#[test]
fn test_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
        (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
        (AppError::Identity("x".into()), StatusCode::BAD_GATEWAY),
        (AppError::Storage("x".into()), StatusCode::BAD_GATEWAY),
        (
            AppError::MissingProvider,
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            AppError::Internal(anyhow::anyhow!("boom")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, status) in cases {
        assert_eq!(err.into_response().status(), status);
    }
}
