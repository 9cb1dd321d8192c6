//! Health checks, base path mounting and bearer token handling.

#![allow(clippy::unwrap_used)]

use dispensa_cli::api::{ApiError, InventoryApi};
use dispensa_integration_tests::{api_client, spawn_server, user};
use dispensa_server::config::ServerConfig;
use secrecy::SecretString;
use serde_json::{Value, json};

const TOKEN: &str = "0123456789abcdef0123";

#[tokio::test]
async fn test_health_endpoints() {
    let base = spawn_server(ServerConfig::default()).await;
    let client = reqwest::Client::new();

    let response = client.get(base.join("health").unwrap()).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok"}));

    let response = client
        .get(base.join("health/ready").unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_base_path_prefix() {
    let base = spawn_server(ServerConfig {
        base_path: "/make-server-fc601971".to_string(),
        ..ServerConfig::default()
    })
    .await;

    let prefixed = base.join("make-server-fc601971/").unwrap();
    let products = api_client(prefixed, None)
        .list_products(&user("mario"))
        .await
        .unwrap();
    assert!(products.is_empty());

    let err = api_client(base, None)
        .list_products(&user("mario"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_bearer_token_required() {
    let base = spawn_server(ServerConfig {
        api_token: Some(SecretString::from(TOKEN)),
        ..ServerConfig::default()
    })
    .await;

    let err = api_client(base.clone(), None)
        .list_products(&user("mario"))
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("expected 401, got {other:?}"),
    }

    let err = api_client(base.clone(), Some("wrong-token-wrong-token"))
        .list_shopping(&user("mario"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 401, .. }));

    let items = api_client(base.clone(), Some(TOKEN))
        .list_shopping(&user("mario"))
        .await
        .unwrap();
    assert!(items.is_empty());

    // Health stays open
    let response = reqwest::get(base.join("health").unwrap()).await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let base = spawn_server(ServerConfig::default()).await;
    let response = reqwest::Client::new()
        .get(base.join("health").unwrap())
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("abc-123")
    );
}
