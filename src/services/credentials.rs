// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AWS credentials for S3 requests.
//!
//! Two sources:
//! - static keys from the environment
//! - guest (unauthenticated) credentials from a Cognito identity pool
//!
//! Either source is handed to the S3 client, whose identity cache keeps
//! the credentials until shortly before they expire.

use crate::config::Config;
use aws_config::SdkConfig;
use aws_credential_types::provider::{
    self, error::CredentialsError, future, ProvideCredentials, SharedCredentialsProvider,
};
use aws_credential_types::Credentials;
use aws_sdk_cognitoidentity::Client as IdentityPoolClient;
use std::time::SystemTime;
use tokio::sync::OnceCell;

const STATIC_PROVIDER_NAME: &str = "activity-tracker-env";
const IDENTITY_POOL_PROVIDER_NAME: &str = "activity-tracker-identity-pool";

/// Static credentials if configured, otherwise the identity pool.
pub fn storage_credentials(config: &Config, sdk_config: &SdkConfig) -> SharedCredentialsProvider {
    match &config.aws_credentials {
        Some(creds) => {
            tracing::info!("Using static AWS credentials");
            SharedCredentialsProvider::new(Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                creds.session_token.clone(),
                None,
                STATIC_PROVIDER_NAME,
            ))
        }
        None => {
            tracing::info!(
                identity_pool = %config.identity_pool_id,
                "Using Cognito identity pool guest credentials"
            );
            SharedCredentialsProvider::new(IdentityPoolCredentials::new(
                &config.identity_pool_id,
                sdk_config,
            ))
        }
    }
}

/// Guest credentials from a Cognito identity pool.
///
/// The identity id is looked up once and reused for every refresh.
#[derive(Debug)]
pub struct IdentityPoolCredentials {
    client: IdentityPoolClient,
    identity_pool_id: String,
    identity_id: OnceCell<String>,
}

impl IdentityPoolCredentials {
    pub fn new(identity_pool_id: &str, sdk_config: &SdkConfig) -> Self {
        // GetId and GetCredentialsForIdentity are unauthenticated calls
        let mut builder = aws_sdk_cognitoidentity::config::Builder::from(sdk_config);
        builder.set_credentials_provider(None);

        Self {
            client: IdentityPoolClient::from_conf(builder.build()),
            identity_pool_id: identity_pool_id.to_string(),
            identity_id: OnceCell::new(),
        }
    }

    async fn identity_id(&self) -> Result<&str, CredentialsError> {
        let id = self
            .identity_id
            .get_or_try_init(|| async {
                let output = self
                    .client
                    .get_id()
                    .identity_pool_id(&self.identity_pool_id)
                    .send()
                    .await
                    .map_err(CredentialsError::provider_error)?;

                output
                    .identity_id()
                    .map(str::to_string)
                    .ok_or_else(|| CredentialsError::not_loaded("GetId returned no identity id"))
            })
            .await?;
        Ok(id.as_str())
    }

    async fn fetch(&self) -> provider::Result {
        let identity_id = self.identity_id().await?;

        let output = self
            .client
            .get_credentials_for_identity()
            .identity_id(identity_id)
            .send()
            .await
            .map_err(CredentialsError::provider_error)?;

        let creds = output.credentials().ok_or_else(|| {
            CredentialsError::not_loaded("GetCredentialsForIdentity returned no credentials")
        })?;
        let credentials = into_credentials(creds)?;

        tracing::info!(
            expires_at = ?credentials.expiry(),
            "Obtained identity pool credentials"
        );
        Ok(credentials)
    }
}

impl ProvideCredentials for IdentityPoolCredentials {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        future::ProvideCredentials::new(self.fetch())
    }
}

fn into_credentials(
    creds: &aws_sdk_cognitoidentity::types::Credentials,
) -> Result<Credentials, CredentialsError> {
    let (Some(access_key_id), Some(secret_key)) = (creds.access_key_id(), creds.secret_key())
    else {
        return Err(CredentialsError::invalid_configuration(
            "identity pool credentials are missing a key",
        ));
    };

    let expires_after = creds
        .expiration()
        .map(|dt| SystemTime::try_from(*dt))
        .transpose()
        .map_err(CredentialsError::unhandled)?;

    Ok(Credentials::new(
        access_key_id,
        secret_key,
        creds.session_token().map(str::to_string),
        expires_after,
        IDENTITY_POOL_PROVIDER_NAME,
    ))
}
