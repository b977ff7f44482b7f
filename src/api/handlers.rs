//! HTTP request handlers for the outline API
//!
//! Handlers translate verbs and paths into store operations and store
//! results into responses. The store signals a missing or undeletable
//! node with a sentinel return, which becomes a 404 here; nothing in
//! this module touches the tree directly.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::outline::{NodeKey, OutlineStore};

/// Shared state handed to every handler
pub type SharedStore = Arc<OutlineStore>;

/// JSON request body for create and update operations.
///
/// An absent or malformed body deserializes to the default, which
/// carries empty text. That leniency is deliberate: clients may POST
/// with no body at all.
#[derive(Debug, Default, Deserialize)]
pub struct ItemBody {
    /// Item text, empty when omitted
    #[serde(default)]
    pub text: String,
}

impl ItemBody {
    fn from_bytes(body: &Bytes) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

/// Query parameters for the updates poll
#[derive(Debug, Default, Deserialize)]
pub struct UpdatesQuery {
    /// Timestamp lower bound; absent or unparsable means 0
    pub since: Option<String>,
}

impl UpdatesQuery {
    fn since(&self) -> f64 {
        self.since
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0)
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Crate version
    pub version: String,
}

fn item_not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": "Item not found"}))).into_response()
}

fn parent_not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": "Parent not found"}))).into_response()
}

/// `GET /outline/` - fetch the root node
pub async fn get_root(State(store): State<SharedStore>) -> Response {
    match store.get_item(&NodeKey::root()) {
        Some(node) => Json(node).into_response(),
        // the root is created at startup and can never be deleted
        None => item_not_found(),
    }
}

/// `POST /outline/` - create an item under the root
pub async fn create_in_root(State(store): State<SharedStore>, body: Bytes) -> Response {
    create_under(&store, NodeKey::root(), &body)
}

/// `GET /outline/<path>/` - fetch an item
pub async fn get_item(State(store): State<SharedStore>, Path(path): Path<String>) -> Response {
    let key = NodeKey::from_request_path(&path);
    match store.get_item(&key) {
        Some(node) => Json(node).into_response(),
        None => item_not_found(),
    }
}

/// `POST /outline/<path>/` - create an item under `<path>`
pub async fn create_item(
    State(store): State<SharedStore>,
    Path(path): Path<String>,
    body: Bytes,
) -> Response {
    create_under(&store, NodeKey::from_request_path(&path), &body)
}

fn create_under(store: &OutlineStore, parent: NodeKey, body: &Bytes) -> Response {
    let text = ItemBody::from_bytes(body).text;
    match store.create_item(&parent, text) {
        Some(node) => (StatusCode::CREATED, Json(node)).into_response(),
        None => parent_not_found(),
    }
}

/// `PUT /outline/<path>/` - replace an item's text
pub async fn update_item(
    State(store): State<SharedStore>,
    Path(path): Path<String>,
    body: Bytes,
) -> Response {
    let key = NodeKey::from_request_path(&path);
    let text = ItemBody::from_bytes(&body).text;
    match store.update_item(&key, text) {
        Some(node) => Json(node).into_response(),
        None => item_not_found(),
    }
}

/// `DELETE /outline/<path>/` - delete an item and its subtree
pub async fn delete_item(State(store): State<SharedStore>, Path(path): Path<String>) -> Response {
    let key = NodeKey::from_request_path(&path);
    if store.delete_item(&key) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        item_not_found()
    }
}

/// `GET /updates/?since=<float>` - poll for recently-changed keys
///
/// The change log is left in place for other independent pollers; only
/// the age-based sweep inside the store prunes it.
pub async fn get_updates(
    State(store): State<SharedStore>,
    Query(query): Query<UpdatesQuery>,
) -> Response {
    let updated = store.updated_since(query.since());
    Json(json!({ "updated": updated })).into_response()
}

/// `GET /health` - health check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
