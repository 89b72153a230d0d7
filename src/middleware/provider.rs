// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hands the data store to handlers.
//!
//! `DataProvider` installs a [`DataStore`] handle on every request of the
//! router it wraps; `UseData` pulls it back out. A handler that asks for
//! the store on a router that was never wrapped fails with
//! [`AppError::MissingProvider`] instead of silently seeing no data.

use crate::error::AppError;
use crate::store::DataStore;
use axum::{extract::FromRequestParts, http::request::Parts, Extension, Router};

/// Scope inside which handlers can reach the data store.
#[derive(Clone)]
pub struct DataProvider {
    store: DataStore,
}

impl DataProvider {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }

    /// Make the store available to every route currently in `router`.
    pub fn wrap<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(Extension(self.store))
    }
}

/// Extractor for the provided data store.
pub struct UseData(pub DataStore);

impl<S> FromRequestParts<S> for UseData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<DataStore>()
            .cloned()
            .map(UseData)
            .ok_or(AppError::MissingProvider)
    }
}
