use std::{env, net::SocketAddr, str::FromStr, time::Duration};
use thiserror::Error;

use crate::imgflip::ImgflipCredentials;

const DEFAULT_IMGFLIP_API_BASE: &str = "https://api.imgflip.com";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
}

#[derive(Clone, Debug)] // Clone needed if passed around, Debug for logging
pub struct Config {
    pub bind_address: SocketAddr,
    // Store region as string for simplicity here, aws_clients can convert
    pub aws_region: String,
    // Optional endpoint for DynamoDB Local / LocalStack
    pub dynamodb_endpoint: Option<String>,
    /// Namespaces the document tables: `{prefix}_memes`, `{prefix}_uploads`,
    /// `{prefix}_status_checks`.
    pub table_prefix: String,
    pub imgflip_api_base: String,
    // Credentials are optional: without them catalog listing still works,
    // composition fails with a configuration error.
    pub imgflip_username: Option<String>,
    pub imgflip_password: Option<String>,
    pub provider_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();

        let bind_address_str =
            env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = SocketAddr::from_str(&bind_address_str)
            .map_err(|e| ConfigError::InvalidVar("BIND_ADDRESS".into(), e.to_string()))?;

        let aws_region =
            env::var("AWS_DEFAULT_REGION").unwrap_or_else(|_| "ca-central-1".to_string());

        // Allow overriding endpoint for DynamoDB Local / LocalStack / testing
        let dynamodb_endpoint = env::var("AWS_ENDPOINT_URL").ok();

        let table_prefix = env::var("TABLE_PREFIX").unwrap_or_else(|_| "memegen".to_string());

        let imgflip_api_base =
            env::var("IMGFLIP_API_BASE").unwrap_or_else(|_| DEFAULT_IMGFLIP_API_BASE.to_string());

        // An empty value counts as unset.
        let imgflip_username = env::var("IMGFLIP_USERNAME").ok().filter(|v| !v.is_empty());
        let imgflip_password = env::var("IMGFLIP_PASSWORD").ok().filter(|v| !v.is_empty());

        let provider_timeout_secs = match env::var("PROVIDER_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidVar("PROVIDER_TIMEOUT_SECS".into(), e.to_string())
            })?,
            Err(_) => 15,
        };

        Ok(Config {
            bind_address,
            aws_region,
            dynamodb_endpoint,
            table_prefix,
            imgflip_api_base,
            imgflip_username,
            imgflip_password,
            provider_timeout: Duration::from_secs(provider_timeout_secs),
        })
    }

    /// Returns the credential pair only when both halves are configured.
    pub fn imgflip_credentials(&self) -> Option<ImgflipCredentials> {
        match (&self.imgflip_username, &self.imgflip_password) {
            (Some(username), Some(password)) => Some(ImgflipCredentials {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    pub fn memes_table(&self) -> String {
        format!("{}_memes", self.table_prefix)
    }

    pub fn uploads_table(&self) -> String {
        format!("{}_uploads", self.table_prefix)
    }

    pub fn status_checks_table(&self) -> String {
        format!("{}_status_checks", self.table_prefix)
    }
}
