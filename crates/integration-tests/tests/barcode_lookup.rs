//! Open Food Facts lookups against a mock.

#![allow(clippy::unwrap_used)]

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use dispensa_cli::barcode::{LookupError, OpenFoodFactsClient, resolve_name};
use dispensa_integration_tests::spawn;
use serde_json::{Value, json};
use url::Url;

async fn product(Path(file): Path<String>) -> (StatusCode, Json<Value>) {
    match file.as_str() {
        "8001505005707.json" => (
            StatusCode::OK,
            Json(json!({
                "code": "8001505005707",
                "status": 1,
                "product": {
                    "product_name": "Passata di pomodoro",
                    "image_url": "https://images.openfoodfacts.org/passata.jpg"
                }
            })),
        ),
        "500.json" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
        _ => (
            StatusCode::OK,
            Json(json!({"status": 0, "status_verbose": "product not found"})),
        ),
    }
}

async fn mock_off() -> Url {
    spawn(Router::new().route("/api/v0/product/{file}", get(product))).await
}

#[tokio::test]
async fn test_known_barcode() {
    let client = OpenFoodFactsClient::new(mock_off().await).unwrap();

    let info = client.lookup("8001505005707").await.unwrap();
    assert!(info.found);
    assert_eq!(info.name.as_deref(), Some("Passata di pomodoro"));
    assert_eq!(resolve_name(&info, "", "8001505005707"), "Passata di pomodoro");
}

#[tokio::test]
async fn test_unknown_barcode_keeps_typed_name() {
    let client = OpenFoodFactsClient::new(mock_off().await).unwrap();

    let info = client.lookup("12345").await.unwrap();
    assert!(!info.found);
    assert_eq!(resolve_name(&info, "Sugo della nonna", "12345"), "Sugo della nonna");
}

#[tokio::test]
async fn test_server_error() {
    let client = OpenFoodFactsClient::new(mock_off().await).unwrap();

    let err = client.lookup("500").await.unwrap_err();
    assert!(matches!(err, LookupError::Status(500)));
}
