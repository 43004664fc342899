use axum::{extract::State, Extension, Json};
use mandi_core::{
    apply, build_facets, candidates, FacetTrees, Listing, ListingQuery, SelectionState, SortKey,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_core_error, normalize_page_size, ApiError, ApiResponse, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    /// Kebab-case sort key; validated here so an unknown key is a 400.
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub selection: SelectionState,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchData {
    pub items: Vec<Listing>,
    pub total_count: usize,
    pub page_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub snapshot_version: u64,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FacetsRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub selection: SelectionState,
}

#[derive(Debug, Serialize)]
pub(super) struct FacetsData {
    pub snapshot_version: u64,
    #[serde(flatten)]
    pub trees: FacetTrees,
}

pub(super) async fn search_listings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let sort = match body.sort.as_deref() {
        Some(raw) => raw
            .parse::<SortKey>()
            .map_err(|e| map_core_error(req_id.0.clone(), &e))?,
        None => SortKey::default(),
    };
    let page_size = normalize_page_size(body.page_size, state.page_size);
    let query = ListingQuery {
        text: body.query.unwrap_or_default(),
        min_price: body.min_price,
        max_price: body.max_price,
        sort,
        page: body.page.unwrap_or(1),
        page_size,
    };

    let snapshot = state.current().await;
    let page = apply(
        &snapshot.listings,
        &query,
        &body.selection,
        &snapshot.categories,
    );
    tracing::debug!(
        total = page.total_count,
        page = page.page,
        version = snapshot.version,
        "listing search"
    );

    let data = SearchData {
        items: page.items.into_iter().cloned().collect(),
        total_count: page.total_count,
        page_count: page.page_count,
        page: page.page,
        page_size,
        snapshot_version: snapshot.version,
    };
    Ok(ApiResponse::new(data, req_id))
}

pub(super) async fn list_facets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<FacetsRequest>,
) -> Json<ApiResponse<FacetsData>> {
    let query = ListingQuery {
        text: body.query.unwrap_or_default(),
        min_price: body.min_price,
        max_price: body.max_price,
        ..ListingQuery::default()
    };

    let snapshot = state.current().await;
    let pool = candidates(&snapshot.listings, &query);
    let trees = build_facets(
        &snapshot.categories,
        &snapshot.locations,
        &body.selection,
        &pool,
    );

    ApiResponse::new(
        FacetsData {
            snapshot_version: snapshot.version,
            trees,
        },
        req_id,
    )
}
