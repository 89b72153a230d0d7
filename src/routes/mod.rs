// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers for the browser client.

pub mod activities;
pub mod identity;
pub mod photos;
pub mod session;

use crate::middleware::DataProvider;
use crate::store::DataStore;
use crate::AppState;
use axum::http::{header, Method, Uri};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// The configured frontend, or a plain-http dev server on this machine.
///
/// Loopback origins are matched on the parsed host, any port.
fn is_allowed_origin(origin: &str, frontend_url: &str) -> bool {
    if origin == frontend_url {
        return true;
    }

    let Ok(uri) = origin.parse::<Uri>() else {
        return false;
    };
    let loopback = matches!(uri.host(), Some("localhost" | "127.0.0.1"));
    uri.scheme_str() == Some("http") && loopback && uri.path() == "/"
}

/// Build the complete router, with `store` provided to every API route.
pub fn create_router(state: Arc<AppState>, store: DataStore) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                origin
                    .to_str()
                    .is_ok_and(|origin| is_allowed_origin(origin, &frontend_url))
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let api_routes = Router::new()
        .merge(session::routes())
        .merge(activities::routes())
        .merge(photos::routes())
        .merge(identity::routes());

    Router::new()
        .route("/health", get(health_check))
        .merge(DataProvider::new(store).wrap(api_routes))
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRONTEND: &str = "https://tracker.example.com";

    #[test]
    fn test_frontend_and_loopback_dev_servers_allowed() {
        for origin in [
            FRONTEND,
            "http://localhost",
            "http://localhost:5173",
            "http://127.0.0.1:3000",
        ] {
            assert!(is_allowed_origin(origin, FRONTEND), "{origin}");
        }
    }

    #[test]
    fn test_lookalike_origins_rejected() {
        for origin in [
            "http://localhost.attacker.example",
            "http://localhost.attacker.example:5173",
            "http://127.0.0.1.nip.io",
            "http://localhost@attacker.example",
            "https://localhost:5173",
            "https://tracker.example.com.attacker.example",
            "null",
            "",
        ] {
            assert!(!is_allowed_origin(origin, FRONTEND), "{origin}");
        }
    }
}
