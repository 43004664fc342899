//! Stateless selection transitions: the client sends its current selection
//! and gets the next one back.

use axum::{extract::State, Extension, Json};
use mandi_core::{
    CategoryLookup, CompositeLocationRef, LocationRef, SelectionAction, SelectionState,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ToggleRequest<T> {
    #[serde(default)]
    pub selection: SelectionState,
    pub target: T,
}

#[derive(Debug, Serialize)]
pub(super) struct ToggleData {
    pub selection: SelectionState,
    /// False when the target did not resolve and nothing moved.
    pub changed: bool,
}

async fn transition(
    state: &AppState,
    req_id: RequestId,
    selection: SelectionState,
    action: &SelectionAction,
) -> Json<ApiResponse<ToggleData>> {
    let snapshot = state.current().await;
    let next = selection
        .clone()
        .reduce(&snapshot.categories, &snapshot.locations, action);
    let changed = next != selection;
    if !changed {
        tracing::debug!(?action, "selection toggle left state unchanged");
    }
    ApiResponse::new(
        ToggleData {
            selection: next,
            changed,
        },
        req_id,
    )
}

pub(super) async fn toggle_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ToggleRequest<CategoryLookup>>,
) -> Json<ApiResponse<ToggleData>> {
    let action = SelectionAction::ToggleCategoryBranch(body.target);
    transition(&state, req_id, body.selection, &action).await
}

pub(super) async fn toggle_location_branch(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ToggleRequest<LocationRef>>,
) -> Json<ApiResponse<ToggleData>> {
    let action = SelectionAction::ToggleLocationBranch(body.target);
    transition(&state, req_id, body.selection, &action).await
}

pub(super) async fn toggle_location_leaf(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ToggleRequest<CompositeLocationRef>>,
) -> Json<ApiResponse<ToggleData>> {
    let action = SelectionAction::ToggleLocationLeaf(body.target);
    transition(&state, req_id, body.selection, &action).await
}
