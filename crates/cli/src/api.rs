//! HTTP client for the Dispensa backend.
//!
//! [`InventoryApi`] is the seam the dashboard talks through; [`ApiClient`]
//! implements it over reqwest against the server's JSON routes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dispensa_core::{Product, ProductId, ShoppingItem, ShoppingItemId, Username};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ApiConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not what the route returns.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The configured base URL cannot take path segments.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Operations the client needs from the backend.
pub trait InventoryApi {
    fn list_products(
        &self,
        user: &Username,
    ) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    fn add_product(
        &self,
        user: &Username,
        product: &Product,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn update_quantity(
        &self,
        user: &Username,
        id: &ProductId,
        quantity: Decimal,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn delete_product(
        &self,
        user: &Username,
        id: &ProductId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn list_shopping(
        &self,
        user: &Username,
    ) -> impl Future<Output = Result<Vec<ShoppingItem>, ApiError>> + Send;

    fn add_shopping_item(
        &self,
        user: &Username,
        item: &ShoppingItem,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn set_shopping_completed(
        &self,
        user: &Username,
        id: &ShoppingItemId,
        completed: bool,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn delete_shopping_item(
        &self,
        user: &Username,
        id: &ShoppingItemId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Deserialize)]
struct ProductsResponse {
    products: Vec<Value>,
}

#[derive(Deserialize)]
struct ShoppingResponse {
    items: Vec<Value>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct QuantityUpdate {
    #[serde(with = "rust_decimal::serde::float")]
    quantity: Decimal,
}

#[derive(Serialize)]
struct CompletedUpdate {
    completed: bool,
}

/// Decode each record on its own so one malformed entry does not hide the
/// rest of the list.
fn decode_records<T: DeserializeOwned>(records: Vec<Value>, list: &str) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value(record) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(list, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect()
}

// =============================================================================
// Client
// =============================================================================

/// Backend API client.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built, or
    /// `ApiError::InvalidBaseUrl` for a URL such as `mailto:` that has no path.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                token: config.token.clone(),
            }),
        })
    }

    /// Base URL joined with percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let request = match &self.inner.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
        } else {
            Err(Self::handle_error_status(status, response).await)
        }
    }

    /// Turn a non-2xx response into `ApiError::Status`, keeping the server's
    /// `error` message when the body has one.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                }),
            Err(e) => return ApiError::Http(e),
        };

        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

impl InventoryApi for ApiClient {
    #[instrument(skip(self), fields(user = %user))]
    async fn list_products(&self, user: &Username) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(&["products", user.as_str()])?;
        let response: ProductsResponse = self.send(self.inner.client.get(url)).await?;
        Ok(decode_records(response.products, "products"))
    }

    #[instrument(skip(self, product), fields(user = %user, id = %product.id))]
    async fn add_product(&self, user: &Username, product: &Product) -> Result<(), ApiError> {
        let url = self.endpoint(&["products", user.as_str()])?;
        let _: Value = self.send(self.inner.client.post(url).json(product)).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn update_quantity(
        &self,
        user: &Username,
        id: &ProductId,
        quantity: Decimal,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["products", user.as_str(), id.as_str()])?;
        let body = QuantityUpdate { quantity };
        let _: Value = self.send(self.inner.client.put(url).json(&body)).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn delete_product(&self, user: &Username, id: &ProductId) -> Result<(), ApiError> {
        let url = self.endpoint(&["products", user.as_str(), id.as_str()])?;
        let _: Value = self.send(self.inner.client.delete(url)).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn list_shopping(&self, user: &Username) -> Result<Vec<ShoppingItem>, ApiError> {
        let url = self.endpoint(&["shopping", user.as_str()])?;
        let response: ShoppingResponse = self.send(self.inner.client.get(url)).await?;
        Ok(decode_records(response.items, "shopping"))
    }

    #[instrument(skip(self, item), fields(user = %user, id = %item.id))]
    async fn add_shopping_item(&self, user: &Username, item: &ShoppingItem) -> Result<(), ApiError> {
        let url = self.endpoint(&["shopping", user.as_str()])?;
        let _: Value = self.send(self.inner.client.post(url).json(item)).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn set_shopping_completed(
        &self,
        user: &Username,
        id: &ShoppingItemId,
        completed: bool,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["shopping", user.as_str(), id.as_str()])?;
        let body = CompletedUpdate { completed };
        let _: Value = self.send(self.inner.client.put(url).json(&body)).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn delete_shopping_item(
        &self,
        user: &Username,
        id: &ShoppingItemId,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["shopping", user.as_str(), id.as_str()])?;
        let _: Value = self.send(self.inner.client.delete(url)).await?;
        Ok(())
    }
}
