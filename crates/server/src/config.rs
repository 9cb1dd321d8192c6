//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `DISPENSA_HOST` - Bind address (default: 127.0.0.1)
//! - `DISPENSA_PORT` - Listen port (default: 3000)
//! - `DISPENSA_BASE_PATH` - Prefix under which every route is mounted
//!   (e.g. `/make-server-fc601971`; default: none)
//! - `DISPENSA_API_TOKEN` - Static bearer token required on data routes
//!   (default: API is open)
//! - `DISPENSA_DATABASE_URL` - `PostgreSQL` connection string, falling back to
//!   `DATABASE_URL` (default: in-memory store)
//! - `DISPENSA_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_API_TOKEN_LENGTH: usize = 16;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Route prefix; empty or starting with `/`, never ending with `/`
    pub base_path: String,
    /// Bearer token required on data routes
    pub api_token: Option<SecretString>,
    /// `PostgreSQL` URL; `None` selects the in-memory store
    pub database_url: Option<SecretString>,
    /// JSON log output
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_path", &self.base_path)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("log_json", &self.log_json)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .finish_non_exhaustive()
    }
}

impl Default for ServerConfig {
    /// Local defaults: loopback, port 3000, open API, in-memory store.
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_path: String::new(),
            api_token: None,
            database_url: None,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or the API token is
    /// too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("DISPENSA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DISPENSA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("DISPENSA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DISPENSA_PORT".to_string(), e.to_string()))?;
        let base_path = normalize_base_path(&get_env_or_default("DISPENSA_BASE_PATH", ""))?;

        let api_token = get_optional_env("DISPENSA_API_TOKEN").map(SecretString::from);
        if let Some(token) = &api_token {
            validate_api_token(token, "DISPENSA_API_TOKEN")?;
        }

        let database_url = get_optional_env("DISPENSA_DATABASE_URL")
            .or_else(|| get_optional_env("DATABASE_URL"))
            .map(SecretString::from);

        let log_json = get_optional_env("DISPENSA_LOG_JSON").is_some();
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            host,
            port,
            base_path,
            api_token,
            database_url,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Normalize a route prefix to `""` or `/segment[/segment...]`.
fn normalize_base_path(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if trimmed.contains(char::is_whitespace) || trimmed.contains(['{', '}', '*']) {
        return Err(ConfigError::InvalidEnvVar(
            "DISPENSA_BASE_PATH".to_string(),
            format!("'{raw}' is not a plain path prefix"),
        ));
    }
    if trimmed.starts_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("/{trimmed}"))
    }
}

/// Reject bearer tokens that are trivially guessable.
fn validate_api_token(token: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = token.expose_secret();
    if value.len() < MIN_API_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_API_TOKEN_LENGTH,
                value.len()
            ),
        ));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}
