//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `DISPENSA_API_URL` - Backend base URL, including any route prefix
//!   (default: <http://127.0.0.1:3000>)
//! - `DISPENSA_API_TOKEN` - Bearer token sent to the backend
//! - `GEMINI_API_KEY` - Google Gemini API key (recipes fall back without it)
//! - `GEMINI_MODEL` - Model ID (default: gemini-2.5-flash)
//! - `GEMINI_API_URL` - Generative Language API base
//!   (default: <https://generativelanguage.googleapis.com/v1beta>)
//! - `OPENFOODFACTS_URL` - Open Food Facts base (default: <https://world.openfoodfacts.org>)
//! - `DISPENSA_SESSION_FILE` - Where the logged-in username is kept
//!   (default: `$XDG_CONFIG_HOME/dispensa/session.json`, else
//!   `$HOME/.config/dispensa/session.json`)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_OPENFOODFACTS_URL: &str = "https://world.openfoodfacts.org";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Cannot locate a session file: set DISPENSA_SESSION_FILE, XDG_CONFIG_HOME or HOME")]
    NoSessionLocation,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub api: ApiConfig,
    pub gemini: GeminiConfig,
    /// Open Food Facts base URL
    pub openfoodfacts_url: Url,
    pub session_file: PathBuf,
}

/// Backend connection.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; routes are appended as path segments
    pub base_url: Url,
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Google Gemini API configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Gemini API key; `None` makes every recipe request fall back
    pub api_key: Option<SecretString>,
    /// Model ID (e.g., gemini-2.5-flash)
    pub model: String,
    pub base_url: Url,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a URL is malformed or no session location
    /// can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig {
            base_url: parse_url_env("DISPENSA_API_URL", DEFAULT_API_URL)?,
            token: get_optional_env("DISPENSA_API_TOKEN").map(SecretString::from),
        };

        let gemini = GeminiConfig {
            api_key: get_optional_env("GEMINI_API_KEY").map(SecretString::from),
            model: get_env_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url: parse_url_env("GEMINI_API_URL", DEFAULT_GEMINI_API_URL)?,
        };

        let openfoodfacts_url = parse_url_env("OPENFOODFACTS_URL", DEFAULT_OPENFOODFACTS_URL)?;

        let session_file = match get_optional_env("DISPENSA_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_file(
                get_optional_env("XDG_CONFIG_HOME").map(PathBuf::from),
                get_optional_env("HOME").map(PathBuf::from),
            )
            .ok_or(ConfigError::NoSessionLocation)?,
        };

        Ok(Self {
            api,
            gemini,
            openfoodfacts_url,
            session_file,
        })
    }
}

/// `<config dir>/dispensa/session.json`, preferring `XDG_CONFIG_HOME`.
#[must_use]
pub fn default_session_file(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    let config_dir = xdg_config_home.or_else(|| home.map(|h| h.join(".config")))?;
    Some(config_dir.join("dispensa").join("session.json"))
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

/// Parse a URL variable, falling back to `default`.
fn parse_url_env(key: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = get_env_or_default(key, default);
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}
