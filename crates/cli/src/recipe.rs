//! Recipe suggestions from Google Gemini.
//!
//! [`RecipeClient::suggest`] never fails: overload errors are retried with
//! exponential backoff, anything else (or running out of retries) yields
//! [`Recipe::fallback`] carrying the error message.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use dispensa_core::recipe::{Recipe, RecipeParseError, build_prompt};
use regex::Regex;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::GeminiConfig;

const TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Markdown code fences around the model's JSON.
static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\n?|```").expect("Invalid regex"));

/// Header carrying the API key, so it never appears in a URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Failures worth retrying.
static OVERLOAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)overload|503").expect("Invalid regex"));

/// Errors from a single generation attempt.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Chiave API mancante nelle variabili d'ambiente.")]
    MissingApiKey,

    /// HTTP request failed. The request URL is stripped before wrapping.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gemini returned an error status or an `error` object.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// No `candidates[0].content.parts[0].text` in the response.
    #[error("Risposta senza testo")]
    EmptyResponse,

    /// The text was not a recipe.
    #[error(transparent)]
    Parse(#[from] RecipeParseError),

    /// The configured base URL cannot take path segments.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl RecipeError {
    /// Whether the model was busy and a later attempt may succeed.
    #[must_use]
    pub fn is_overload(&self) -> bool {
        matches!(self, Self::Api { status: 503, .. }) || OVERLOAD_RE.is_match(&self.to_string())
    }
}

/// Strip Markdown code fences and surrounding whitespace.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE_RE.replace_all(text, "").trim().to_string()
}

/// Bounded exponential backoff for overload errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub retries: u32,
    /// Wait before the first retry; doubled for each further retry.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// =============================================================================
// Client
// =============================================================================

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct RecipeClient {
    inner: Arc<RecipeClientInner>,
}

struct RecipeClientInner {
    client: reqwest::Client,
    config: GeminiConfig,
    retry: RetryPolicy,
}

impl RecipeClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::Http` if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig, retry: RetryPolicy) -> Result<Self, RecipeError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(RecipeClientInner {
                client,
                config,
                retry,
            }),
        })
    }

    /// Suggest a recipe for the given ingredient names.
    ///
    /// Always returns a recipe; see the module docs.
    #[instrument(skip(self), fields(model = %self.inner.config.model))]
    pub async fn suggest(&self, ingredients: &[String]) -> Recipe {
        let prompt = build_prompt(ingredients);
        let mut retries_left = self.inner.retry.retries;
        let mut delay = self.inner.retry.initial_delay;

        loop {
            match self.generate(&prompt).await {
                Ok(recipe) => return recipe,
                Err(e) if retries_left > 0 && e.is_overload() => {
                    tracing::warn!(
                        error = %e,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        retries_left,
                        "Model busy, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retries_left -= 1;
                    delay = delay.saturating_mul(2);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Recipe generation failed, using fallback");
                    return Recipe::fallback(&e.to_string());
                }
            }
        }
    }

    /// One `generateContent` call.
    ///
    /// # Errors
    ///
    /// Returns `RecipeError` for a missing key, transport failure, API error
    /// or a response that does not hold recipe JSON.
    pub async fn generate(&self, prompt: &str) -> Result<Recipe, RecipeError> {
        let config = &self.inner.config;
        let api_key = config.api_key.as_ref().ok_or(RecipeError::MissingApiKey)?;

        let mut url = config.base_url.clone();
        let method = format!("{}:generateContent", config.model);
        url.path_segments_mut()
            .map_err(|()| RecipeError::InvalidBaseUrl(config.base_url.to_string()))?
            .pop_if_empty()
            .extend(["models", method.as_str()]);

        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .inner
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        // Error bodies are not always JSON; fall back to an empty response
        let parsed: GenerateResponse = serde_json::from_str(&body).unwrap_or_default();

        if !status.is_success() || parsed.error.is_some() {
            let message = parsed
                .error
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Errore nella chiamata API".to_string());
            tracing::warn!(status = status.as_u16(), message = %message, "Gemini returned an error");
            return Err(RecipeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = parsed.into_text().ok_or(RecipeError::EmptyResponse)?;
        Ok(Recipe::from_json(&strip_code_fences(&text))?)
    }
}
