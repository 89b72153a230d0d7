//! Application configuration loaded from environment variables.
//!
//! Mirrors the settings the browser client hands to its cloud SDK at
//! startup: Cognito pools, the S3 bucket, and where local state lives.

use std::env;
use std::path::PathBuf;

/// Default lifetime of presigned photo URLs.
pub const DEFAULT_URL_EXPIRY_SECS: u64 = 3600;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Cloud services ---
    /// AWS region shared by Cognito and S3
    pub aws_region: String,
    /// Cognito user pool ID (e.g. "us-east-1_AbCdEf123")
    pub user_pool_id: String,
    /// Cognito app client ID (public client, no secret)
    pub client_id: String,
    /// Cognito identity pool ID used to obtain S3 credentials
    pub identity_pool_id: String,
    /// Bucket holding activity photos
    pub s3_bucket: String,
    /// Optional S3-compatible endpoint (path-style addressing)
    pub s3_endpoint: Option<String>,
    /// Lifetime of presigned photo URLs
    pub url_expiry_secs: u64,
    /// Static credentials; when absent, guest credentials come from the identity pool
    pub aws_credentials: Option<StaticCredentials>,

    // --- Local ---
    /// Directory holding the persisted state snapshot
    pub data_dir: PathBuf,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// Server port (bound on loopback only)
    pub port: u16,
}

/// Long-lived AWS credentials supplied through the environment.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            aws_region: "us-east-1".to_string(),
            user_pool_id: "us-east-1_TestPool".to_string(),
            client_id: "test_client_id".to_string(),
            identity_pool_id: "us-east-1:00000000-0000-0000-0000-000000000000".to_string(),
            s3_bucket: "test-bucket".to_string(),
            s3_endpoint: None,
            url_expiry_secs: DEFAULT_URL_EXPIRY_SECS,
            aws_credentials: None,
            data_dir: PathBuf::from("./data"),
            frontend_url: "http://localhost:3000".to_string(),
            port: 3000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let aws_credentials = match (
            env::var("AWS_ACCESS_KEY_ID"),
            env::var("AWS_SECRET_ACCESS_KEY"),
        ) {
            (Ok(access_key_id), Ok(secret_access_key)) => Some(StaticCredentials {
                access_key_id: access_key_id.trim().to_string(),
                secret_access_key: secret_access_key.trim().to_string(),
                session_token: env::var("AWS_SESSION_TOKEN").ok(),
            }),
            _ => None,
        };

        Ok(Self {
            aws_region: env::var("AWS_REGION").map_err(|_| ConfigError::Missing("AWS_REGION"))?,
            user_pool_id: env::var("COGNITO_USER_POOL_ID")
                .map_err(|_| ConfigError::Missing("COGNITO_USER_POOL_ID"))?,
            client_id: env::var("COGNITO_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("COGNITO_CLIENT_ID"))?,
            identity_pool_id: env::var("COGNITO_IDENTITY_POOL_ID")
                .map_err(|_| ConfigError::Missing("COGNITO_IDENTITY_POOL_ID"))?,
            s3_bucket: env::var("S3_BUCKET").map_err(|_| ConfigError::Missing("S3_BUCKET"))?,
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|v| !v.is_empty()),
            url_expiry_secs: env::var("S3_URL_EXPIRY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_URL_EXPIRY_SECS),
            aws_credentials,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        })
    }

    /// Check that the cloud settings are usable before any service is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("AWS_REGION", &self.aws_region),
            ("COGNITO_USER_POOL_ID", &self.user_pool_id),
            ("COGNITO_CLIENT_ID", &self.client_id),
            ("COGNITO_IDENTITY_POOL_ID", &self.identity_pool_id),
            ("S3_BUCKET", &self.s3_bucket),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(name));
            }
        }

        // Pool IDs are "<region>_<id>" and "<region>:<uuid>".
        if !self.user_pool_id.starts_with(&format!("{}_", self.aws_region)) {
            return Err(ConfigError::Invalid(format!(
                "user pool {} is not in region {}",
                self.user_pool_id, self.aws_region
            )));
        }
        if !self
            .identity_pool_id
            .starts_with(&format!("{}:", self.aws_region))
        {
            return Err(ConfigError::Invalid(format!(
                "identity pool {} is not in region {}",
                self.identity_pool_id, self.aws_region
            )));
        }
        if self.url_expiry_secs == 0 || self.url_expiry_secs > 604_800 {
            return Err(ConfigError::Invalid(format!(
                "URL expiry must be between 1 and 604800 seconds, got {}",
                self.url_expiry_secs
            )));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("AWS_REGION", "eu-west-1");
        env::set_var("COGNITO_USER_POOL_ID", "eu-west-1_Abc123");
        env::set_var("COGNITO_CLIENT_ID", "client123");
        env::set_var(
            "COGNITO_IDENTITY_POOL_ID",
            "eu-west-1:11111111-2222-3333-4444-555555555555",
        );
        env::set_var("S3_BUCKET", "photos");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.aws_region, "eu-west-1");
        assert_eq!(config.s3_bucket, "photos");
        assert_eq!(config.url_expiry_secs, DEFAULT_URL_EXPIRY_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_bucket() {
        let config = Config {
            s3_bucket: " ".to_string(),
            ..Config::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("S3_BUCKET"))
        ));
    }

    #[test]
    fn test_validate_rejects_pool_in_other_region() {
        let config = Config {
            user_pool_id: "us-west-2_Abc".to_string(),
            ..Config::default()
        };

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
