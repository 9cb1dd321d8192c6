//! Integration tests for Dispensa.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dispensa-integration-tests
//! ```
//!
//! Every test starts its own server on an ephemeral loopback port with the
//! in-memory store, so no database or network access is needed. External
//! services (Gemini, Open Food Facts) are replaced by small axum mocks.
//!
//! # Test Categories
//!
//! - `inventory_flow` - Dashboard product operations against a live server
//! - `shopping_flow` - Shopping list operations against a live server
//! - `server_access` - Health, base path and bearer token handling
//! - `recipe_service` - Retry and fallback against a mock Gemini
//! - `barcode_lookup` - Open Food Facts lookups against a mock

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use dispensa_cli::api::ApiClient;
use dispensa_cli::config::ApiConfig;
use dispensa_core::Username;
use dispensa_server::config::ServerConfig;
use dispensa_server::state::AppState;
use dispensa_server::store::Store;
use secrecy::SecretString;
use url::Url;

/// Serve `router` on an ephemeral loopback port and return its base URL.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });

    Url::parse(&format!("http://{addr}/")).expect("test server URL")
}

/// Start the Dispensa server with an in-memory store.
pub async fn spawn_server(config: ServerConfig) -> Url {
    let state = AppState::new(config, Store::memory());
    spawn(dispensa_server::app(state)).await
}

/// Backend client for a spawned server.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn api_client(base_url: Url, token: Option<&str>) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url,
        token: token.map(SecretString::from),
    })
    .expect("api client")
}

/// A valid username.
///
/// # Panics
///
/// Panics if `name` is blank.
#[must_use]
pub fn user(name: &str) -> Username {
    Username::parse(name).expect("valid username")
}
