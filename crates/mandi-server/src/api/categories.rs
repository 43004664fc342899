use axum::{extract::State, Extension, Json};
use mandi_core::{explain_category, CategoryLookup, Resolution};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CountData {
    pub count: usize,
}

pub(super) async fn resolve_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(lookup): Json<CategoryLookup>,
) -> Result<Json<ApiResponse<Resolution>>, ApiError> {
    let snapshot = state.current().await;
    let resolution = explain_category(&snapshot.categories, &lookup).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("no category matches id {}", lookup.id),
        )
    })?;
    Ok(ApiResponse::new(resolution, req_id))
}

/// Unresolvable lookups count as zero rather than 404 so a facet row can
/// always render a number.
pub(super) async fn count_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(lookup): Json<CategoryLookup>,
) -> Json<ApiResponse<CountData>> {
    let snapshot = state.current().await;
    let count = mandi_core::count_category(&snapshot.categories, &lookup, &snapshot.listings);
    ApiResponse::new(CountData { count }, req_id)
}
