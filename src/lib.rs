// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity-Tracker: a small personal log of workouts
//!
//! This crate holds the reducer-driven data store (session user plus
//! activity list, persisted locally), the Cognito and S3 adapters, and
//! the HTTP surface the browser client talks to.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod time_utils;

use config::Config;
use services::{IdentityService, StorageService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub identity: IdentityService,
    pub storage: StorageService,
}
