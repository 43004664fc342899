use axum::{extract::State, Extension, Json};
use mandi_core::{count_location_target, LocationTarget};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::categories::CountData;
use super::{ApiResponse, AppState};

/// `ref` is either a tagged branch `{"level": "district", "id": 27}` or a
/// ward composite (`7` or `"7-2"`).
#[derive(Debug, Deserialize)]
pub(super) struct LocationCountRequest {
    #[serde(rename = "ref")]
    pub target: LocationTarget,
}

pub(super) async fn count_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<LocationCountRequest>,
) -> Json<ApiResponse<CountData>> {
    let snapshot = state.current().await;
    let count = count_location_target(&snapshot.locations, body.target, &snapshot.listings);
    ApiResponse::new(CountData { count }, req_id)
}
