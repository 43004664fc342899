//! HTTP surface over the faceting core.
//!
//! Selection state lives with the client: toggle routes take the current
//! selection in the body and return the next one.

mod categories;
mod listings;
mod locations;
mod selection;
mod snapshot;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use mandi_core::{CoreError, Snapshot};
use serde::Serialize;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    request_id, stamp_snapshot_version, RequestId, REQUEST_ID_HEADER, SNAPSHOT_VERSION_HEADER,
};

const MAX_PAGE_SIZE: usize = 200;

/// Shared server state. The snapshot is swapped whole on refresh; handlers
/// clone the inner `Arc` and work on that version to completion.
#[derive(Clone)]
pub struct AppState {
    snapshot: Arc<RwLock<Arc<Snapshot>>>,
    pub page_size: usize,
}

impl AppState {
    #[must_use]
    pub fn new(snapshot: Snapshot, page_size: usize) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            page_size,
        }
    }

    pub async fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Installs a new snapshot and returns it.
    pub async fn replace(&self, build: impl FnOnce(&Snapshot) -> Snapshot) -> Arc<Snapshot> {
        let mut guard = self.snapshot.write().await;
        let next = Arc::new(build(&guard));
        *guard = Arc::clone(&next);
        next
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    snapshot_version: u64,
    listing_count: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: RequestId) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id.0),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Request page size, falling back to the configured default and capped.
pub(super) fn normalize_page_size(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}

pub(super) fn map_core_error(request_id: String, error: &CoreError) -> ApiError {
    match error {
        CoreError::InvalidSortKey(_) | CoreError::InvalidLocationRef(_) => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        CoreError::SnapshotIo { .. } | CoreError::SnapshotParse { .. } => {
            tracing::error!(error = %error, "snapshot operation failed");
            ApiError::new(request_id, "internal_error", "snapshot operation failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE, REQUEST_ID_HEADER])
        .expose_headers([REQUEST_ID_HEADER, SNAPSHOT_VERSION_HEADER])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/listings/search", post(listings::search_listings))
        .route("/api/v1/facets", post(listings::list_facets))
        .route(
            "/api/v1/categories/resolve",
            post(categories::resolve_category),
        )
        .route("/api/v1/categories/count", post(categories::count_category))
        .route("/api/v1/locations/count", post(locations::count_location))
        .route(
            "/api/v1/selection/categories/toggle",
            post(selection::toggle_category),
        )
        .route(
            "/api/v1/selection/locations/toggle-branch",
            post(selection::toggle_location_branch),
        )
        .route(
            "/api/v1/selection/locations/toggle-leaf",
            post(selection::toggle_location_leaf),
        )
        .route(
            "/api/v1/snapshot/listings",
            put(snapshot::replace_listings),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    stamp_snapshot_version,
                )),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let snapshot = state.current().await;
    ApiResponse::new(
        HealthData {
            status: "ok",
            snapshot_version: snapshot.version,
            listing_count: snapshot.listings.len(),
        },
        req_id,
    )
}
