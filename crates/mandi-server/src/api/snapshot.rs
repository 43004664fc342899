use axum::{extract::State, Extension, Json};
use mandi_core::{coerce::collect_lenient, Listing};
use serde::Serialize;
use serde_json::Value;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ReplaceData {
    pub version: u64,
    pub listing_count: usize,
    /// Entries dropped because they could not be read as listings.
    pub skipped: usize,
}

/// Replaces the listing set, keeping both taxonomies. In-flight requests
/// finish against the version they started with.
pub(super) async fn replace_listings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(entries): Json<Vec<Value>>,
) -> Json<ApiResponse<ReplaceData>> {
    let submitted = entries.len();
    let listings: Vec<Listing> = collect_lenient(entries);
    let listing_count = listings.len();
    let skipped = submitted - listing_count;

    let next = state.replace(|current| current.with_listings(listings)).await;
    tracing::info!(
        version = next.version,
        listing_count,
        skipped,
        "listing snapshot replaced"
    );

    ApiResponse::new(
        ReplaceData {
            version: next.version,
            listing_count,
            skipped,
        },
        req_id,
    )
}
