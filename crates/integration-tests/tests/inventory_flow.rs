//! Product operations through the dashboard against a live server.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{Next, from_fn};
use axum::response::IntoResponse;
use chrono::{NaiveDate, TimeZone, Utc};
use dispensa_cli::api::{ApiError, InventoryApi};
use dispensa_cli::dashboard::{Dashboard, DashboardError, LOAD_PRODUCTS_ERROR};
use dispensa_core::{ProductDraft, ProductId, StorageFilter, StorageType};
use dispensa_integration_tests::{api_client, spawn, spawn_server, user};
use dispensa_server::config::ServerConfig;
use dispensa_server::state::AppState;
use dispensa_server::store::Store;
use rust_decimal::Decimal;
use url::Url;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn draft(name: &str, expiry: NaiveDate, storage: StorageType) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        expiry_date: Some(expiry),
        storage_type: storage,
        ..ProductDraft::default()
    }
}

// =============================================================================
// Product Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_add_list_and_sort_products() {
    let base = spawn_server(ServerConfig::default()).await;
    let mut dashboard = Dashboard::new(api_client(base.clone(), None), user("mario"));
    let today = date(2024, 3, 10);

    let t0 = Utc.timestamp_millis_opt(1_702_600_000_000).unwrap();
    let t1 = Utc.timestamp_millis_opt(1_702_600_000_001).unwrap();
    let t2 = Utc.timestamp_millis_opt(1_702_600_000_002).unwrap();
    dashboard
        .add_product(draft("Pasta", date(2024, 9, 1), StorageType::Pantry), t0)
        .await
        .unwrap();
    dashboard
        .add_product(draft("Latte", date(2024, 3, 11), StorageType::Fridge), t1)
        .await
        .unwrap();
    dashboard
        .add_product(draft("Yogurt", date(2024, 3, 8), StorageType::Fridge), t2)
        .await
        .unwrap();

    // A fresh dashboard sees what the server stored
    let mut reloaded = Dashboard::new(api_client(base, None), user("mario"));
    reloaded.load_products().await.unwrap();
    assert_eq!(reloaded.products().len(), 3);
    assert_eq!(reloaded.error(), None);

    let names: Vec<_> = reloaded
        .visible_products(today)
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["Yogurt", "Latte", "Pasta"]);

    reloaded.set_filter(StorageFilter::Only(StorageType::Pantry));
    let pantry = reloaded.visible_products(today);
    assert_eq!(pantry.len(), 1);
    assert_eq!(pantry[0].id, ProductId::new("1702600000000"));

    let counts = reloaded.counts();
    assert_eq!((counts.fridge, counts.pantry), (2, 1));
}

#[tokio::test]
async fn test_quantity_changes_persist() {
    let base = spawn_server(ServerConfig::default()).await;
    let mut dashboard = Dashboard::new(api_client(base.clone(), None), user("anna"));

    let product = dashboard
        .add_product(draft("Uova", date(2024, 5, 1), StorageType::Fridge), Utc::now())
        .await
        .unwrap();
    assert_eq!(product.quantity, Decimal::ONE);

    assert_eq!(dashboard.increment(&product.id).await.unwrap(), Decimal::TWO);
    assert_eq!(dashboard.decrement(&product.id).await.unwrap(), Decimal::ONE);
    assert_eq!(dashboard.decrement(&product.id).await.unwrap(), Decimal::ZERO);
    // Never below zero
    assert_eq!(dashboard.decrement(&product.id).await.unwrap(), Decimal::ZERO);

    dashboard
        .update_quantity(&product.id, Decimal::new(25, 1))
        .await
        .unwrap();

    let stored = api_client(base, None)
        .list_products(&user("anna"))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].quantity, Decimal::new(25, 1));
}

#[tokio::test]
async fn test_delete_and_unknown_ids() {
    let base = spawn_server(ServerConfig::default()).await;
    let api = api_client(base.clone(), None);
    let mut dashboard = Dashboard::new(api_client(base, None), user("luca"));

    let product = dashboard
        .add_product(draft("Burro", date(2024, 4, 1), StorageType::Fridge), Utc::now())
        .await
        .unwrap();

    // Unknown ids are a no-op on the server
    api.delete_product(&user("luca"), &ProductId::new("999"))
        .await
        .unwrap();
    api.update_quantity(&user("luca"), &ProductId::new("999"), Decimal::TEN)
        .await
        .unwrap();
    assert_eq!(api.list_products(&user("luca")).await.unwrap().len(), 1);

    // The dashboard refuses ids it has not loaded
    let err = dashboard
        .increment(&ProductId::new("999"))
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::UnknownProduct(_)));

    dashboard.delete_product(&product.id).await.unwrap();
    assert!(dashboard.products().is_empty());
    assert!(api.list_products(&user("luca")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_users_are_isolated() {
    let base = spawn_server(ServerConfig::default()).await;
    let mut mario = Dashboard::new(api_client(base.clone(), None), user("mario"));
    mario
        .add_product(draft("Latte", date(2024, 3, 11), StorageType::Fridge), Utc::now())
        .await
        .unwrap();

    let api = api_client(base, None);
    assert!(api.list_products(&user("anna")).await.unwrap().is_empty());
    // Usernames with spaces and accents travel as one path segment
    assert!(api.list_products(&user("Zia Rosà")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_incomplete_draft_is_not_sent() {
    let base = spawn_server(ServerConfig::default()).await;
    let mut dashboard = Dashboard::new(api_client(base.clone(), None), user("mario"));

    let err = dashboard
        .add_product(
            ProductDraft {
                name: "Latte".to_string(),
                ..ProductDraft::default()
            },
            Utc::now(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::Draft(_)));

    let api = api_client(base, None);
    assert!(api.list_products(&user("mario")).await.unwrap().is_empty());
}

// =============================================================================
// Failure Tests
// =============================================================================

#[tokio::test]
async fn test_failed_load_sets_error_banner() {
    // Nothing listens on the discard port
    let base = Url::parse("http://127.0.0.1:9/").unwrap();
    let mut dashboard = Dashboard::new(api_client(base, None), user("mario"));

    let err = dashboard.load_products().await.unwrap_err();
    assert!(matches!(err, DashboardError::Api(ApiError::Http(_))));
    assert_eq!(dashboard.error(), Some(LOAD_PRODUCTS_ERROR));
    assert!(dashboard.products().is_empty());
}

/// Server that answers 503 to everything while `down` is set.
async fn spawn_flaky_server(down: Arc<AtomicBool>) -> Url {
    let app = dispensa_server::app(AppState::new(ServerConfig::default(), Store::memory()))
        .layer(from_fn(move |request: Request, next: Next| {
            let down = Arc::clone(&down);
            async move {
                if down.load(Ordering::SeqCst) {
                    StatusCode::SERVICE_UNAVAILABLE.into_response()
                } else {
                    next.run(request).await
                }
            }
        }));
    spawn(app).await
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_list() {
    let down = Arc::new(AtomicBool::new(false));
    let base = spawn_flaky_server(Arc::clone(&down)).await;
    let mut dashboard = Dashboard::new(api_client(base, None), user("mario"));

    let t0 = Utc.timestamp_millis_opt(1_702_600_000_000).unwrap();
    let t1 = Utc.timestamp_millis_opt(1_702_600_000_001).unwrap();
    dashboard
        .add_product(draft("Latte", date(2024, 3, 11), StorageType::Fridge), t0)
        .await
        .unwrap();
    dashboard
        .add_product(draft("Pasta", date(2024, 9, 1), StorageType::Pantry), t1)
        .await
        .unwrap();
    dashboard.load_products().await.unwrap();
    let before = dashboard.products().to_vec();
    assert_eq!(before.len(), 2);

    down.store(true, Ordering::SeqCst);
    let err = dashboard.load_products().await.unwrap_err();
    assert!(matches!(
        err,
        DashboardError::Api(ApiError::Status { status: 503, .. })
    ));
    assert_eq!(dashboard.error(), Some(LOAD_PRODUCTS_ERROR));
    assert_eq!(dashboard.products(), before.as_slice());

    // The banner clears on the next successful load
    down.store(false, Ordering::SeqCst);
    dashboard.load_products().await.unwrap();
    assert_eq!(dashboard.error(), None);
    assert_eq!(dashboard.products(), before.as_slice());
}
