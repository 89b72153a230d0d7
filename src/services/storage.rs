// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! S3 object storage for activity photos.
//!
//! Objects live under the `public/` level prefix. Callers deal only in
//! keys relative to that prefix (`activities/<userId>/<ts>-<rand>.<ext>`).
//! Read access is handed out as presigned GET URLs.

use crate::config::Config;
use crate::error::AppError;
use crate::services::sdk_error_message;
use crate::store::ids::random_base36;
use aws_config::SdkConfig;
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use std::time::Duration;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Access level prefix for objects readable by anyone holding a URL.
const PUBLIC_PREFIX: &str = "public/";

/// Base URL reported for objects in mock mode.
const MOCK_BASE_URL: &str = "https://mock-storage.invalid/";

/// Key and URL of an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UploadedFile {
    pub key: String,
    pub url: String,
}

/// Build an object key for a photo uploaded by `user_id`.
///
/// Shape: `activities/<userId>/<unix millis>-<random>.<ext>`
pub fn generate_file_name(user_id: &str, extension: &str) -> String {
    format!(
        "activities/{}/{}-{}.{}",
        user_id,
        Utc::now().timestamp_millis(),
        random_base36(6),
        extension.trim_start_matches('.')
    )
}

/// S3 client bound to the photo bucket.
struct S3Client {
    client: aws_sdk_s3::Client,
    bucket: String,
}

/// Mock object (test builds and offline runs).
struct MockObject {
    content_type: String,
    size: usize,
}

/// Object storage adapter.
pub struct StorageService {
    client: Option<S3Client>,
    url_expiry: Duration,
    mock_objects: DashMap<String, MockObject>,
}

impl StorageService {
    /// Create a service for the configured bucket.
    ///
    /// With `S3_ENDPOINT` set, requests go path-style to that endpoint
    /// (S3-compatible local servers); otherwise to the regional AWS endpoint.
    pub fn new(
        config: &Config,
        sdk_config: &SdkConfig,
        credentials: SharedCredentialsProvider,
    ) -> Self {
        let mut builder =
            aws_sdk_s3::config::Builder::from(sdk_config).credentials_provider(credentials);
        if let Some(endpoint) = &config.s3_endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(
            bucket = %config.s3_bucket,
            endpoint = config.s3_endpoint.as_deref().unwrap_or("aws"),
            "Object storage configured"
        );

        Self {
            client: Some(S3Client {
                client: aws_sdk_s3::Client::from_conf(builder.build()),
                bucket: config.s3_bucket.clone(),
            }),
            url_expiry: Duration::from_secs(config.url_expiry_secs),
            mock_objects: DashMap::new(),
        }
    }

    /// Create a mock service that keeps objects in memory.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            url_expiry: Duration::from_secs(crate::config::DEFAULT_URL_EXPIRY_SECS),
            mock_objects: DashMap::new(),
        }
    }

    /// Upload `body` under `file_name` and return its key and a URL.
    pub async fn upload_file(
        &self,
        body: Vec<u8>,
        content_type: &str,
        file_name: &str,
    ) -> Result<UploadedFile, AppError> {
        validate_key(file_name)?;

        let Some(s3) = &self.client else {
            self.mock_objects.insert(
                file_name.to_string(),
                MockObject {
                    content_type: content_type.to_string(),
                    size: body.len(),
                },
            );
            return self.uploaded(file_name).await;
        };

        let size = body.len();
        s3.client
            .put_object()
            .bucket(&s3.bucket)
            .key(object_key(file_name))
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("upload: {}", sdk_error_message(&e))))?;
        tracing::info!(key = file_name, size, "Uploaded object");

        self.uploaded(file_name).await
    }

    async fn uploaded(&self, key: &str) -> Result<UploadedFile, AppError> {
        Ok(UploadedFile {
            key: key.to_string(),
            url: self.get_file_url(key).await?,
        })
    }

    /// Presigned GET URL for `key`, valid for the configured expiry.
    ///
    /// The object is not checked for existence.
    pub async fn get_file_url(&self, key: &str) -> Result<String, AppError> {
        validate_key(key)?;

        let Some(s3) = &self.client else {
            return Ok(format!("{}{}", MOCK_BASE_URL, object_key(key)));
        };

        let presigning = PresigningConfig::expires_in(self.url_expiry)
            .map_err(|e| AppError::Storage(format!("Invalid URL expiry: {}", e)))?;
        let request = s3
            .client
            .get_object()
            .bucket(&s3.bucket)
            .key(object_key(key))
            .presigned(presigning)
            .await
            .map_err(|e| AppError::Storage(format!("presign: {}", sdk_error_message(&e))))?;

        Ok(request.uri().to_string())
    }

    /// Remove the object at `key`. Deleting a missing key succeeds.
    pub async fn delete_file(&self, key: &str) -> Result<(), AppError> {
        validate_key(key)?;

        let Some(s3) = &self.client else {
            self.mock_objects.remove(key);
            return Ok(());
        };

        s3.client
            .delete_object()
            .bucket(&s3.bucket)
            .key(object_key(key))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("delete: {}", sdk_error_message(&e))))?;
        tracing::info!(key, "Deleted object");
        Ok(())
    }

    /// Content type and size of a stored object (mock mode only).
    pub fn mock_object(&self, key: &str) -> Option<(String, usize)> {
        self.mock_objects
            .get(key)
            .map(|o| (o.content_type.clone(), o.size))
    }
}

fn object_key(key: &str) -> String {
    format!("{}{}", PUBLIC_PREFIX, key)
}

fn validate_key(key: &str) -> Result<(), AppError> {
    if key.is_empty() || key.starts_with('/') || key.split('/').any(|s| s == "..") {
        return Err(AppError::BadRequest(format!("Invalid object key: {:?}", key)));
    }
    Ok(())
}
