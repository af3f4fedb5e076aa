//! Wishlist HTTP routes.
//!
//! Collection endpoint: `GET /wishlist`, `POST /wishlist`.
//! Item endpoint: `GET /wishlist/:id`, `PUT /wishlist/:id`, `DELETE /wishlist/:id`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::storage::WishlistStore;
use crate::types::wishlist::{ItemPayload, NewWishlistItem, WishlistItem, WishlistItemPatch};

/// Storage handle shared by every handler.
pub type SharedStore = Arc<dyn WishlistStore>;

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
}

/// Create wishlist routes
pub fn wishlist_routes(store: SharedStore) -> Router {
    Router::new()
        .route("/wishlist", get(list_items_handler).post(create_item_handler))
        .route(
            "/wishlist/:id",
            get(get_item_handler)
                .put(replace_item_handler)
                .delete(delete_item_handler),
        )
        .with_state(store)
}

/// Create the health check route
pub fn health_routes(store: SharedStore) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(store)
}

// ==================
// Helper Functions
// ==================

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::Validation("Invalid item id".to_string()))
}

/// Parses the body as JSON whether or not the client sent a JSON content type.
fn parse_payload(body: &Bytes) -> Result<ItemPayload, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "rejected request body");
        ApiError::Validation("Invalid request body".to_string())
    })
}

/// Takes the link out of the payload unchanged. Blank links are rejected.
fn required_link(payload: &mut ItemPayload) -> Result<String, ApiError> {
    match payload.link.take() {
        Some(link) if !link.trim().is_empty() => Ok(link),
        _ => Err(ApiError::Validation("Link is required".to_string())),
    }
}

// ==================
// Collection Handlers
// ==================

async fn list_items_handler(
    State(store): State<SharedStore>,
) -> Result<Json<Vec<WishlistItem>>, ApiError> {
    let items = store
        .list_all()
        .await
        .map_err(ApiError::storage("fetch wishlist items"))?;
    Ok(Json(items))
}

async fn create_item_handler(
    State(store): State<SharedStore>,
    body: Bytes,
) -> Result<(StatusCode, Json<WishlistItem>), ApiError> {
    let mut payload = parse_payload(&body)?;
    let link = required_link(&mut payload)?;

    let item = store
        .create(NewWishlistItem::new(link, payload.notes.flatten()))
        .await
        .map_err(ApiError::storage("create wishlist item"))?;

    tracing::info!(id = item.id, "created wishlist item");
    Ok((StatusCode::CREATED, Json(item)))
}

// ==================
// Item Handlers
// ==================

async fn get_item_handler(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<WishlistItem>, ApiError> {
    let id = parse_id(&id)?;
    store
        .get_by_id(id)
        .await
        .map_err(ApiError::storage("fetch wishlist item"))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn replace_item_handler(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<WishlistItem>, ApiError> {
    let id = parse_id(&id)?;
    let mut payload = parse_payload(&body)?;
    let link = required_link(&mut payload)?;

    let patch = WishlistItemPatch {
        link: Some(link),
        notes: payload.notes,
    };
    let item = store
        .update(id, patch)
        .await
        .map_err(ApiError::storage("update wishlist item"))?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(id, "updated wishlist item");
    Ok(Json(item))
}

async fn delete_item_handler(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = parse_id(&id)?;
    let removed = store
        .remove(id)
        .await
        .map_err(ApiError::storage("delete wishlist item"))?;
    if !removed {
        return Err(ApiError::NotFound);
    }

    tracing::info!(id, "deleted wishlist item");
    Ok(Json(SuccessResponse { success: true }))
}

async fn health_handler(State(store): State<SharedStore>) -> (StatusCode, Json<HealthResponse>) {
    let backend = store.backend_name().to_string();
    match store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                backend,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable".to_string(),
                    backend,
                }),
            )
        }
    }
}
