// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity-Tracker API Server
//!
//! Serves the local activity store to the browser client and proxies
//! photo storage and identity calls to AWS.

use activity_tracker::{
    config::Config,
    db::FileSnapshotStore,
    routes::create_router,
    services::{storage_credentials, IdentityService, StorageService},
    store::DataStore,
    AppState,
};
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    config.validate()?;
    tracing::info!(port = config.port, region = %config.aws_region, "Starting Activity-Tracker API");

    // Local persistence and the store, hydrated before anything can read it
    let persistence = Arc::new(FileSnapshotStore::open(&config.data_dir)?);
    tracing::info!(path = %persistence.path().display(), "Snapshot file");
    let store = DataStore::open(persistence);

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .load()
        .await;

    let credentials = storage_credentials(&config, &sdk_config);
    let identity = IdentityService::new(&config, &sdk_config);
    let storage = StorageService::new(&config, &sdk_config, credentials);

    // The provider session is informational only; the store keeps its own.
    match identity.current_user().await {
        Ok(Some(user)) => tracing::info!(user_id = %user.user_id, "Identity provider has a session"),
        Ok(None) => tracing::info!("No identity provider session"),
        Err(e) => tracing::warn!(error = %e, "Could not query identity provider session"),
    }

    spawn_change_logger(&store);

    let state = Arc::new(AppState {
        config: config.clone(),
        identity,
        storage,
    });

    let app = create_router(state, store.clone());

    // Loopback only: the API carries the unauthenticated local session.
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.flush().await;
    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Log every state change published by the store.
fn spawn_change_logger(store: &DataStore) {
    let mut changes = store.subscribe();
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let snapshot = changes.borrow_and_update().clone();
            tracing::debug!(
                activities = snapshot.activities.len(),
                logged_in = snapshot.user.is_some(),
                "State changed"
            );
        }
    });
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), tracing_subscriber::filter::ParseError> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("activity_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
