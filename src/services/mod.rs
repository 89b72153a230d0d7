// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - adapters for the external identity and storage providers.

pub mod credentials;
pub mod identity;
pub mod storage;

pub use credentials::storage_credentials;
pub use identity::{IdentityService, IdentityUser, SignUpOutcome};
pub use storage::{generate_file_name, StorageService, UploadedFile};

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};

/// `Code: message` for AWS service errors, the full error chain otherwise.
pub(crate) fn sdk_error_message<E>(err: &E) -> String
where
    E: ProvideErrorMetadata + std::error::Error,
{
    match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{}: {}", code, message),
        (Some(code), None) => code.to_string(),
        _ => DisplayErrorContext(err).to_string(),
    }
}
