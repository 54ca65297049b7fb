//! Navigation item endpoints under `/api/navigation-items`.
//!
//! Single-item responses are nodes: the item's fields plus its `children`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use navconfig_core::{
    NavigationItem, NavigationItemId, NavigationItemPatch, NavigationNode, NewNavigationItem,
};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /` — creates one item; the fresh node has no children yet.
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<NewNavigationItem>, JsonRejection>,
) -> Result<(StatusCode, Json<NavigationNode>), ApiError> {
    let Json(input) = payload?;
    let created = state.run(move |service| service.create(input)).await?;
    Ok((StatusCode::CREATED, Json(NavigationNode::leaf(created))))
}

/// `GET /` — the whole forest.
pub async fn list_tree(State(state): State<AppState>) -> Result<Json<Vec<NavigationNode>>, ApiError> {
    let tree = state.run(|service| service.get_tree()).await?;
    Ok(Json(tree))
}

/// `GET /flat` — every item without nesting.
pub async fn list_flat(State(state): State<AppState>) -> Result<Json<Vec<NavigationItem>>, ApiError> {
    let items = state.run(|service| service.get_all_flat()).await?;
    Ok(Json(items))
}

/// `GET /role/{role}` — forest restricted to one role.
pub async fn tree_by_role(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<NavigationNode>>, ApiError> {
    let Path(role) = path?;
    let tree = state
        .run(move |service| service.get_tree_by_role(&role))
        .await?;
    Ok(Json(tree))
}

/// `GET /{id}` — one item with its subtree.
pub async fn get_item(
    State(state): State<AppState>,
    path: Result<Path<NavigationItemId>, PathRejection>,
) -> Result<Json<NavigationNode>, ApiError> {
    let Path(id) = path?;
    let node = state.run(move |service| service.get_subtree(id)).await?;
    Ok(Json(node))
}

pub async fn list_children(
    State(state): State<AppState>,
    path: Result<Path<NavigationItemId>, PathRejection>,
) -> Result<Json<Vec<NavigationItem>>, ApiError> {
    let Path(id) = path?;
    let children = state.run(move |service| service.get_children(id)).await?;
    Ok(Json(children))
}

/// `GET /{id}/ancestors` — breadcrumb from the root down to the parent.
pub async fn list_ancestors(
    State(state): State<AppState>,
    path: Result<Path<NavigationItemId>, PathRejection>,
) -> Result<Json<Vec<NavigationItem>>, ApiError> {
    let Path(id) = path?;
    let chain = state.run(move |service| service.ancestors(id)).await?;
    Ok(Json(chain))
}

/// `PUT /{id}` — partial update. Absent fields stay as stored; an explicit
/// `null` clears `parent_id` or `microfrontend_url`.
pub async fn update_item(
    State(state): State<AppState>,
    path: Result<Path<NavigationItemId>, PathRejection>,
    payload: Result<Json<NavigationItemPatch>, JsonRejection>,
) -> Result<Json<NavigationNode>, ApiError> {
    let Path(id) = path?;
    let Json(patch) = payload?;
    let node = state
        .run(move |service| {
            service.update(id, patch)?;
            service.get_subtree(id)
        })
        .await?;
    Ok(Json(node))
}

/// `DELETE /{id}` — removes the item and every descendant.
pub async fn delete_item(
    State(state): State<AppState>,
    path: Result<Path<NavigationItemId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    state.run(move |service| service.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
