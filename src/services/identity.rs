// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cognito user pool client.
//!
//! Handles:
//! - Sign-up with email as username
//! - Password sign-in (USER_PASSWORD_AUTH) with token refresh
//! - Global sign-out
//! - Current-user lookup for the cached session
//!
//! Nothing here touches the local data store. Provider sessions and the
//! store's session user are tracked independently.

use crate::config::Config;
use crate::error::AppError;
use crate::services::sdk_error_message;
use aws_config::SdkConfig;
use aws_sdk_cognitoidentityprovider::error::ProvideErrorMetadata;
use aws_sdk_cognitoidentityprovider::operation::initiate_auth::InitiateAuthOutput;
use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType};
use aws_sdk_cognitoidentityprovider::Client as UserPoolClient;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::RwLock;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Refresh the access token this long before it expires.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 300;

/// A user as known to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IdentityUser {
    /// Provider subject id (`sub`)
    pub user_id: String,
    pub username: String,
    pub email: Option<String>,
}

/// Result of a sign-up call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SignUpOutcome {
    pub user_id: String,
    /// `false` when the pool requires email confirmation first
    pub confirmed: bool,
}

/// Tokens for the signed-in provider session.
#[derive(Clone)]
struct ProviderSession {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: DateTime<Utc>,
}

/// Mock account (test builds and offline runs).
struct MockAccount {
    user_id: String,
    password: String,
}

/// Identity provider adapter.
pub struct IdentityService {
    client: Option<UserPoolClient>,
    client_id: String,
    session: RwLock<Option<ProviderSession>>,
    /// Registry used instead of Cognito when `client` is `None`
    mock_accounts: DashMap<String, MockAccount>,
}

impl IdentityService {
    /// Create a service talking to the configured user pool.
    pub fn new(config: &Config, sdk_config: &SdkConfig) -> Self {
        // The user pool operations used here authenticate with tokens, not SigV4
        let mut builder = aws_sdk_cognitoidentityprovider::config::Builder::from(sdk_config);
        builder.set_credentials_provider(None);

        tracing::info!(user_pool = %config.user_pool_id, "Identity service configured");
        Self {
            client: Some(UserPoolClient::from_conf(builder.build())),
            client_id: config.client_id.clone(),
            session: RwLock::new(None),
            mock_accounts: DashMap::new(),
        }
    }

    /// Create a mock service backed by an in-memory account registry.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            client_id: "mock-client".to_string(),
            session: RwLock::new(None),
            mock_accounts: DashMap::new(),
        }
    }

    /// Register a new account with `email` as username.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AppError> {
        let Some(client) = &self.client else {
            return self.mock_sign_up(email, password);
        };

        let email_attribute = AttributeType::builder()
            .name("email")
            .value(email)
            .build()
            .map_err(|e| AppError::Identity(e.to_string()))?;

        let output = client
            .sign_up()
            .client_id(&self.client_id)
            .username(email)
            .password(password)
            .user_attributes(email_attribute)
            .send()
            .await
            .map_err(|e| identity_error(&e))?;

        tracing::info!(
            user_id = %output.user_sub(),
            confirmed = output.user_confirmed(),
            "Provider sign-up complete"
        );
        Ok(SignUpOutcome {
            user_id: output.user_sub().to_string(),
            confirmed: output.user_confirmed(),
        })
    }

    /// Sign in with a password and cache the provider session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityUser, AppError> {
        let Some(client) = &self.client else {
            return self.mock_sign_in(email, password).await;
        };

        let output = client
            .initiate_auth()
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .client_id(&self.client_id)
            .auth_parameters("USERNAME", email)
            .auth_parameters("PASSWORD", password)
            .send()
            .await
            .map_err(|e| identity_error(&e))?;
        let session = session_from_auth(output, None)?;
        let user = get_user(client, &session.access_token).await?;

        *self.session.write().await = Some(session);
        tracing::info!(user_id = %user.user_id, "Provider sign-in complete");
        Ok(user)
    }

    /// End the provider session. Succeeds if there was none.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };

        if let Some(client) = &self.client {
            client
                .global_sign_out()
                .access_token(&session.access_token)
                .send()
                .await
                .map_err(|e| identity_error(&e))?;
        }
        tracing::info!("Provider sign-out complete");
        Ok(())
    }

    /// User of the cached provider session, or `None` if not signed in.
    pub async fn current_user(&self) -> Result<Option<IdentityUser>, AppError> {
        let Some(session) = self.session.read().await.clone() else {
            return Ok(None);
        };

        let Some(client) = &self.client else {
            return Ok(self.mock_user_for_token(&session.access_token));
        };

        let session = if session.expires_at - Duration::seconds(TOKEN_REFRESH_MARGIN_SECS)
            > Utc::now()
        {
            session
        } else {
            self.refresh(client, session).await?
        };

        get_user(client, &session.access_token).await.map(Some)
    }

    async fn refresh(
        &self,
        client: &UserPoolClient,
        session: ProviderSession,
    ) -> Result<ProviderSession, AppError> {
        let Some(refresh_token) = session.refresh_token else {
            *self.session.write().await = None;
            return Err(AppError::Identity("Session expired".to_string()));
        };

        tracing::debug!("Refreshing provider access token");
        let output = client
            .initiate_auth()
            .auth_flow(AuthFlowType::RefreshTokenAuth)
            .client_id(&self.client_id)
            .auth_parameters("REFRESH_TOKEN", &refresh_token)
            .send()
            .await
            .map_err(|e| identity_error(&e))?;
        let refreshed = session_from_auth(output, Some(refresh_token))?;

        *self.session.write().await = Some(refreshed.clone());
        Ok(refreshed)
    }

    // ─── Mock mode ───────────────────────────────────────────────

    fn mock_sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AppError> {
        if self.mock_accounts.contains_key(email) {
            return Err(AppError::Identity(
                "UsernameExistsException: User already exists".to_string(),
            ));
        }

        let user_id = format!("mock-{}", crate::store::ids::generate_id());
        self.mock_accounts.insert(
            email.to_string(),
            MockAccount {
                user_id: user_id.clone(),
                password: password.to_string(),
            },
        );
        Ok(SignUpOutcome {
            user_id,
            confirmed: true,
        })
    }

    async fn mock_sign_in(&self, email: &str, password: &str) -> Result<IdentityUser, AppError> {
        let user_id = match self.mock_accounts.get(email) {
            Some(account) if account.password == password => account.user_id.clone(),
            _ => {
                return Err(AppError::Identity(
                    "NotAuthorizedException: Incorrect username or password.".to_string(),
                ))
            }
        };

        *self.session.write().await = Some(ProviderSession {
            access_token: format!("mock-token:{}", email),
            refresh_token: None,
            expires_at: Utc::now() + Duration::hours(1),
        });

        Ok(IdentityUser {
            user_id,
            username: email.to_string(),
            email: Some(email.to_string()),
        })
    }

    fn mock_user_for_token(&self, access_token: &str) -> Option<IdentityUser> {
        let email = access_token.strip_prefix("mock-token:")?;
        let account = self.mock_accounts.get(email)?;
        Some(IdentityUser {
            user_id: account.user_id.clone(),
            username: email.to_string(),
            email: Some(email.to_string()),
        })
    }
}

/// Session tokens from an InitiateAuth response.
///
/// Refresh responses do not repeat the refresh token, so the previous one
/// is carried over.
fn session_from_auth(
    output: InitiateAuthOutput,
    previous_refresh_token: Option<String>,
) -> Result<ProviderSession, AppError> {
    let Some(result) = output.authentication_result() else {
        return Err(AppError::Identity(format!(
            "Unsupported sign-in challenge: {}",
            output
                .challenge_name()
                .map(|c| c.as_str())
                .unwrap_or("unknown")
        )));
    };
    let access_token = result
        .access_token()
        .ok_or_else(|| AppError::Identity("Sign-in returned no access token".to_string()))?;

    Ok(ProviderSession {
        access_token: access_token.to_string(),
        refresh_token: result
            .refresh_token()
            .map(str::to_string)
            .or(previous_refresh_token),
        expires_at: Utc::now() + Duration::seconds(i64::from(result.expires_in())),
    })
}

async fn get_user(client: &UserPoolClient, access_token: &str) -> Result<IdentityUser, AppError> {
    let output = client
        .get_user()
        .access_token(access_token)
        .send()
        .await
        .map_err(|e| identity_error(&e))?;

    Ok(user_from_attributes(
        output.username(),
        output.user_attributes().iter().map(|a| (a.name(), a.value())),
    ))
}

fn user_from_attributes<'a>(
    username: &str,
    attributes: impl IntoIterator<Item = (&'a str, Option<&'a str>)>,
) -> IdentityUser {
    let mut user_id = None;
    let mut email = None;
    for (name, value) in attributes {
        match name {
            "sub" => user_id = value.map(str::to_string),
            "email" => email = value.map(str::to_string),
            _ => {}
        }
    }

    IdentityUser {
        user_id: user_id.unwrap_or_else(|| username.to_string()),
        username: username.to_string(),
        email,
    }
}

fn identity_error<E>(e: &E) -> AppError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    AppError::Identity(sdk_error_message(e))
}
