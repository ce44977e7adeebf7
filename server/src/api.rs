//! # REST API
//!
//! Builds the axum router that exposes the vault over HTTP. All endpoints
//! share application state through axum's `State` extractor.
//!
//! Which routes are mounted depends on the store's mode.
//!
//! ## Collection mode
//!
//! | Method | Path               | Description                      |
//! |--------|--------------------|----------------------------------|
//! | POST   | `/api/add`         | Add an item, returns its id      |
//! | GET    | `/api/all`         | Every item in insertion order    |
//! | DELETE | `/api/delete/:id`  | Remove an item                   |
//! | POST   | `/api/edit/:id`    | Replace an item's content        |
//!
//! ## Single-secret mode
//!
//! | Method | Path               | Description                      |
//! |--------|--------------------|----------------------------------|
//! | POST   | `/api/save`        | Overwrite the secret             |
//! | GET    | `/api/load`        | Read the secret                  |
//!
//! `GET /health` is mounted in both modes.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use vault_store::{SharedStore, StoreError, StoreMode, StoreResult, VaultItem, VaultStore};

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone: everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The vault store, behind a single lock.
    pub store: SharedStore,
    /// Reference to Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the axum [`Router`] for the store's mode, with CORS and tracing.
///
/// CORS admits only `allowed_origin` and only the methods the mounted routes
/// use.
pub fn create_router(state: AppState, allowed_origin: HeaderValue) -> Router {
    let mode = state.store.read().mode();

    let (routes, methods) = match mode {
        StoreMode::Collection => (
            Router::new()
                .route("/api/add", post(add_handler))
                .route("/api/all", get(list_handler))
                .route("/api/delete/:id", delete(delete_handler))
                .route("/api/edit/:id", post(edit_handler)),
            vec![Method::GET, Method::POST, Method::DELETE],
        ),
        StoreMode::SingleSecret => (
            Router::new()
                .route("/api/save", post(save_handler))
                .route("/api/load", get(load_handler)),
            vec![Method::GET, Method::POST],
        ),
    };

    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE]);

    routes
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Body of add, edit and save. Decoded from the raw body whatever the
/// `Content-Type` header says. A missing `content` binds as empty; any other
/// fields (a client-sent `id` or `created_at`) are ignored.
#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: String,
}

/// Success body of the mutating endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(rename = "STATUS")]
    pub status: String,
    /// Set by `/api/add` only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl StatusResponse {
    fn ok(status: &str) -> Self {
        Self {
            status: status.into(),
            id: None,
        }
    }
}

/// Response payload for `GET /api/all`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub items: Vec<VaultItem>,
}

/// Response payload for `GET /api/load`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SecretResponse {
    pub content: String,
}

/// Error body returned by every endpoint on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "ERROR")]
    pub error: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures a handler reports to the client.
#[derive(Debug)]
pub enum ApiError {
    /// Body missing, not JSON, or of the wrong shape.
    InvalidData,
    /// No item with the requested id.
    NotFound,
    /// Single secret never saved.
    Empty,
    /// The persistence file could not be written; nothing changed.
    Storage,
    /// The operation belongs to the other mode. Unreachable through the
    /// router, which mounts only the active mode's routes.
    Unsupported,
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Empty => ApiError::Empty,
            StoreError::Unsupported { .. } => ApiError::Unsupported,
            StoreError::Io(_) | StoreError::Serialization(_) => ApiError::Storage,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidData => (StatusCode::BAD_REQUEST, "invalid data"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found"),
            ApiError::Empty => (StatusCode::NOT_FOUND, "empty"),
            ApiError::Storage => (StatusCode::INTERNAL_SERVER_ERROR, "storage failure"),
            ApiError::Unsupported => (StatusCode::METHOD_NOT_ALLOWED, "unsupported"),
        };
        (
            status,
            Json(ErrorResponse {
                error: message.into(),
            }),
        )
            .into_response()
    }
}

impl AppState {
    /// Decodes a request body, counting rejections.
    fn bind(&self, body: &[u8]) -> Result<String, ApiError> {
        match serde_json::from_slice::<ContentRequest>(body) {
            Ok(req) => Ok(req.content),
            Err(e) => {
                tracing::debug!(reason = %e, "rejected request body");
                self.metrics.rejected_requests_total.inc();
                Err(ApiError::InvalidData)
            }
        }
    }

    /// Runs `op` under the write lock on the blocking pool, so the file
    /// rewrite never stalls an async worker. Returns the result together with
    /// the item count after the mutation.
    async fn mutate<T, F>(&self, op: F) -> Result<(T, usize), ApiError>
    where
        F: FnOnce(&mut VaultStore) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let outcome = tokio::task::spawn_blocking(move || {
            let mut store = store.write();
            op(&mut store).map(|value| (value, store.len()))
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "store mutation task failed");
            ApiError::Storage
        })?;

        outcome.map_err(|e| self.fail(e))
    }

    /// Converts a store error, counting persistence failures.
    fn fail(&self, e: StoreError) -> ApiError {
        if e.is_persistence() {
            self.metrics.persistence_failures_total.inc();
        }
        e.into()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health`: returns 200 while the process is up.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `POST /api/add`: appends an item and returns its generated id.
async fn add_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    let content = state.bind(&body)?;

    let (id, total) = state.mutate(move |store| store.add(content)).await?;
    state.metrics.record_mutation(total);

    Ok(Json(StatusResponse {
        status: "saved".into(),
        id: Some(id),
    }))
}

/// `GET /api/all`: every item, unpaginated, in insertion order.
async fn list_handler(State(state): State<AppState>) -> Result<Json<ItemsResponse>, ApiError> {
    let items = state.store.read().list()?.to_vec();
    Ok(Json(ItemsResponse { items }))
}

/// `DELETE /api/delete/:id`: removes the item with exactly this id.
async fn delete_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, ApiError> {
    let ((), total) = state.mutate(move |store| store.delete(&id)).await?;
    state.metrics.record_mutation(total);

    Ok(Json(StatusResponse::ok("deleted")))
}

/// `POST /api/edit/:id`: replaces the content of the item with this id.
async fn edit_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    let content = state.bind(&body)?;

    let ((), total) = state.mutate(move |store| store.edit(&id, content)).await?;
    state.metrics.record_mutation(total);

    Ok(Json(StatusResponse::ok("updated")))
}

/// `POST /api/save`: overwrites the single secret.
async fn save_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    let content = state.bind(&body)?;
    state.mutate(move |store| store.save_secret(content)).await?;
    state.metrics.mutations_total.inc();

    Ok(Json(StatusResponse::ok("saved")))
}

/// `GET /api/load`: the single secret, or 404 if nothing was saved.
async fn load_handler(State(state): State<AppState>) -> Result<Json<SecretResponse>, ApiError> {
    let content = state.store.read().load_secret()?.to_string();
    Ok(Json(SecretResponse { content }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
