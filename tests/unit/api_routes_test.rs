//! Unit tests for the HTTP routes, driven in-process through `tower::ServiceExt`.
//!
//! Each test builds the full router over a fresh in-memory SQLite store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use rstest::rstest;
use serde_json::{json, Value};
use tower::ServiceExt;

use wishlist::api::{build_router, SharedStore};
use wishlist::app::App;
use wishlist::config::{AppConfig, ServerConfig};
use wishlist::storage::{SqliteStore, WishlistStore};
use wishlist::types::errors::StorageError;
use wishlist::types::wishlist::{NewWishlistItem, WishlistItem, WishlistItemPatch};

fn setup() -> Router {
    let store: SharedStore = Arc::new(SqliteStore::open_in_memory().expect("in-memory store"));
    build_router(store, &ServerConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(app, request).await
}

async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn item(value: &Value) -> WishlistItem {
    serde_json::from_value(value.clone()).expect("response should be a wishlist item")
}

// ─── Scenarios ───

#[tokio::test]
async fn test_create_update_delete_lifecycle() {
    let app = setup();

    let (status, created) = send(
        &app,
        Method::POST,
        "/wishlist",
        Some(json!({"link": "https://a.example"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["link"], "https://a.example");
    assert_eq!(created["notes"], Value::Null);
    assert_eq!(created["created_at"], created["updated_at"]);

    tokio::time::sleep(Duration::from_millis(5)).await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/wishlist/1",
        Some(json!({"link": "https://a.example", "notes": "gift idea"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], "gift idea");
    let updated = item(&updated);
    assert!(updated.updated_at > updated.created_at);
    assert_eq!(updated.created_at, item(&created).created_at);

    let (status, body) = send(&app, Method::DELETE, "/wishlist/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = send(&app, Method::GET, "/wishlist/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Item not found"}));
}

#[tokio::test]
async fn test_create_without_link_creates_nothing() {
    let app = setup();

    let (status, body) = send(&app, Method::POST, "/wishlist", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Link is required"}));

    let (status, list) = send(&app, Method::GET, "/wishlist", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}

// ─── Collection endpoint ───

#[tokio::test]
async fn test_list_returns_newest_first() {
    let app = setup();
    for link in ["https://first.example", "https://second.example", "https://third.example"] {
        let (status, _) = send(&app, Method::POST, "/wishlist", Some(json!({"link": link}))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, list) = send(&app, Method::GET, "/wishlist", None).await;
    assert_eq!(status, StatusCode::OK);
    let links: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["link"].as_str().unwrap())
        .collect();
    assert_eq!(
        links,
        vec!["https://third.example", "https://second.example", "https://first.example"]
    );
}

#[tokio::test]
async fn test_create_keeps_supplied_notes() {
    let app = setup();
    let (status, created) = send(
        &app,
        Method::POST,
        "/wishlist",
        Some(json!({"link": "https://b.example", "notes": "size M"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["notes"], "size M");

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, Method::GET, &format!("/wishlist/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_with_empty_notes_stores_null() {
    let app = setup();
    let (_, created) = send(
        &app,
        Method::POST,
        "/wishlist",
        Some(json!({"link": "https://b.example", "notes": ""})),
    )
    .await;
    assert_eq!(created["notes"], Value::Null);
}

#[tokio::test]
async fn test_create_stores_link_exactly_as_sent() {
    let app = setup();
    let (status, created) = send(
        &app,
        Method::POST,
        "/wishlist",
        Some(json!({"link": "  https://c.example  "})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["link"], "  https://c.example  ");

    let id = item(&created).id;
    let (status, fetched) = send(&app, Method::GET, &format!("/wishlist/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["link"], "  https://c.example  ");
}

#[tokio::test]
async fn test_put_stores_link_exactly_as_sent() {
    let app = setup();
    let (_, created) = send(
        &app,
        Method::POST,
        "/wishlist",
        Some(json!({"link": "https://d.example"})),
    )
    .await;
    let id = item(&created).id;

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/wishlist/{}", id),
        Some(json!({"link": "https://d.example/new "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["link"], "https://d.example/new ");
}

#[rstest]
#[case(json!({}))]
#[case(json!({"link": ""}))]
#[case(json!({"link": "   "}))]
#[case(json!({"link": null, "notes": "orphan"}))]
#[tokio::test]
async fn test_create_rejects_missing_link(#[case] body: Value) {
    let app = setup();
    let (status, response) = send(&app, Method::POST, "/wishlist", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Link is required");
}

#[rstest]
#[case("not json")]
#[case("{\"link\": 42}")]
#[case("[1, 2, 3]")]
#[tokio::test]
async fn test_create_rejects_malformed_body(#[case] raw: &str) {
    let app = setup();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/wishlist")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(raw.to_string()))
        .unwrap();
    let (status, response) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Invalid request body");
}

#[tokio::test]
async fn test_create_without_content_type_is_accepted() {
    let app = setup();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/wishlist")
        .body(Body::from(r#"{"link":"https://a.example"}"#))
        .unwrap();
    let (status, created) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["link"], "https://a.example");

    let (_, list) = send(&app, Method::GET, "/wishlist", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_put_without_content_type_is_accepted() {
    let app = setup();
    let (_, created) = send(
        &app,
        Method::POST,
        "/wishlist",
        Some(json!({"link": "https://a.example"})),
    )
    .await;
    let id = item(&created).id;

    let request = Request::builder()
        .method(Method::PUT)
        .uri(format!("/wishlist/{}", id))
        .body(Body::from(r#"{"link":"https://b.example"}"#))
        .unwrap();
    let (status, updated) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["link"], "https://b.example");
}

#[tokio::test]
async fn test_create_with_empty_body_is_rejected() {
    let app = setup();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/wishlist")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");
}

// ─── Item endpoint ───

#[tokio::test]
async fn test_get_missing_item_returns_404() {
    let app = setup();
    let (status, _) = send(&app, Method::GET, "/wishlist/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case(Method::GET)]
#[case(Method::DELETE)]
#[tokio::test]
async fn test_malformed_id_returns_400(#[case] method: Method) {
    let app = setup();
    let (status, body) = send(&app, method, "/wishlist/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid item id");
}

#[tokio::test]
async fn test_put_malformed_id_returns_400() {
    let app = setup();
    let (status, body) = send(
        &app,
        Method::PUT,
        "/wishlist/1.5",
        Some(json!({"link": "https://a.example"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid item id");
}

#[tokio::test]
async fn test_put_missing_item_returns_404() {
    let app = setup();
    let (status, _) = send(
        &app,
        Method::PUT,
        "/wishlist/42",
        Some(json!({"link": "https://a.example"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_without_link_returns_400_and_keeps_item() {
    let app = setup();
    let (_, created) = send(
        &app,
        Method::POST,
        "/wishlist",
        Some(json!({"link": "https://a.example", "notes": "keep"})),
    )
    .await;

    let (status, body) = send(&app, Method::PUT, "/wishlist/1", Some(json!({"notes": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Link is required");

    let (_, fetched) = send(&app, Method::GET, "/wishlist/1", None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_put_without_notes_keeps_previous_notes() {
    let app = setup();
    send(
        &app,
        Method::POST,
        "/wishlist",
        Some(json!({"link": "https://a.example", "notes": "birthday"})),
    )
    .await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/wishlist/1",
        Some(json!({"link": "https://b.example"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["link"], "https://b.example");
    assert_eq!(updated["notes"], "birthday");
}

#[tokio::test]
async fn test_put_with_null_notes_clears_them() {
    let app = setup();
    send(
        &app,
        Method::POST,
        "/wishlist",
        Some(json!({"link": "https://a.example", "notes": "birthday"})),
    )
    .await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/wishlist/1",
        Some(json!({"link": "https://a.example", "notes": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], Value::Null);
}

#[tokio::test]
async fn test_delete_twice_returns_404() {
    let app = setup();
    send(&app, Method::POST, "/wishlist", Some(json!({"link": "https://a.example"}))).await;

    let (status, _) = send(&app, Method::DELETE, "/wishlist/1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::DELETE, "/wishlist/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Item not found");
}

#[tokio::test]
async fn test_api_prefix_serves_same_routes() {
    let app = setup();
    let (status, created) = send(
        &app,
        Method::POST,
        "/api/wishlist",
        Some(json!({"link": "https://a.example"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, fetched) = send(&app, Method::GET, "/wishlist/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, list) = send(&app, Method::GET, "/api/wishlist", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_health_reports_backend() {
    let app = setup();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "backend": "sqlite"}));
}

#[tokio::test]
async fn test_app_router_serves_store() {
    let store: SharedStore = Arc::new(SqliteStore::open_in_memory().unwrap());
    let app = App::with_store(AppConfig::default(), store.clone());
    let router = app.router();

    let (status, created) = send(
        &router,
        Method::POST,
        "/wishlist",
        Some(json!({"link": "https://a.example"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let stored = store.get_by_id(1).await.unwrap().expect("row written through the router");
    assert_eq!(item(&created), stored);
}

// ─── Storage faults ───

/// Store whose every operation fails, for exercising the 500 path.
struct BrokenStore;

fn fault() -> StorageError {
    StorageError::Connection("secret-host:5432 refused".to_string())
}

#[async_trait]
impl WishlistStore for BrokenStore {
    fn backend_name(&self) -> &'static str {
        "broken"
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Err(fault())
    }

    async fn list_all(&self) -> Result<Vec<WishlistItem>, StorageError> {
        Err(fault())
    }

    async fn get_by_id(&self, _id: i64) -> Result<Option<WishlistItem>, StorageError> {
        Err(fault())
    }

    async fn create(&self, _item: NewWishlistItem) -> Result<WishlistItem, StorageError> {
        Err(fault())
    }

    async fn update(
        &self,
        _id: i64,
        _patch: WishlistItemPatch,
    ) -> Result<Option<WishlistItem>, StorageError> {
        Err(fault())
    }

    async fn remove(&self, _id: i64) -> Result<bool, StorageError> {
        Err(fault())
    }
}

fn broken_app() -> Router {
    build_router(Arc::new(BrokenStore), &ServerConfig::default())
}

#[rstest]
#[case(Method::GET, "/wishlist", None, "Failed to fetch wishlist items")]
#[case(Method::POST, "/wishlist", Some(json!({"link": "https://a.example"})), "Failed to create wishlist item")]
#[case(Method::GET, "/wishlist/1", None, "Failed to fetch wishlist item")]
#[case(Method::PUT, "/wishlist/1", Some(json!({"link": "https://a.example"})), "Failed to update wishlist item")]
#[case(Method::DELETE, "/wishlist/1", None, "Failed to delete wishlist item")]
#[tokio::test]
async fn test_storage_fault_returns_generic_500(
    #[case] method: Method,
    #[case] uri: &str,
    #[case] body: Option<Value>,
    #[case] message: &str,
) {
    let app = broken_app();
    let (status, response) = send(&app, method, uri, body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response, json!({"error": message}));
    assert!(!response.to_string().contains("secret-host"));
}

#[tokio::test]
async fn test_validation_runs_before_storage() {
    let app = broken_app();
    let (status, _) = send(&app, Method::POST, "/wishlist", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_unavailable_when_store_faults() {
    let app = broken_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
    assert_eq!(body["backend"], "broken");
}
