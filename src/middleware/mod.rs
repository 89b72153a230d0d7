// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (store provider, session, security).

pub mod provider;
pub mod security;
pub mod session;

pub use provider::{DataProvider, UseData};
pub use session::{require_session, SessionUser};
