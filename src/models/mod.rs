// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod snapshot;
pub mod user;

pub use activity::{Activity, NewActivity};
pub use snapshot::Snapshot;
pub use user::{Credentials, User};
