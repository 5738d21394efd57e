//! Asset registry endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use domain::models::{
    Asset, CreateAssetRequest, ListAssetsQuery, ListAssetsResponse, UpdateAssetRequest,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::AssetRegistry;

fn registry(state: &AppState) -> AssetRegistry {
    AssetRegistry::new(
        state.pool.clone(),
        &state.config.ledger,
        state.audit.clone(),
    )
}

#[derive(Debug, Serialize)]
pub struct DeleteAssetResponse {
    pub message: String,
}

/// List assets with optional filters.
///
/// GET /api/v1/assets?category=&status=&q=
pub async fn list_assets(
    State(state): State<AppState>,
    Query(query): Query<ListAssetsQuery>,
) -> Result<Json<ListAssetsResponse>, ApiError> {
    let data = registry(&state).list(&query).await?;
    let count = data.len();
    Ok(Json(ListAssetsResponse { data, count }))
}

/// GET /api/v1/assets/inactive
pub async fn list_inactive_assets(
    State(state): State<AppState>,
) -> Result<Json<ListAssetsResponse>, ApiError> {
    let data = registry(&state).list_inactive().await?;
    let count = data.len();
    Ok(Json(ListAssetsResponse { data, count }))
}

/// Register a new asset.
///
/// POST /api/v1/assets
pub async fn create_asset(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateAssetRequest>,
) -> Result<(StatusCode, Json<Asset>), ApiError> {
    let asset = registry(&state).register(request, actor.as_str()).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// GET /api/v1/assets/:id
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Asset>, ApiError> {
    Ok(Json(registry(&state).get(id).await?))
}

/// Partially update an asset, including decommission and reactivation.
///
/// PUT /api/v1/assets/:id
pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: Actor,
    Json(request): Json<UpdateAssetRequest>,
) -> Result<Json<Asset>, ApiError> {
    Ok(Json(
        registry(&state).update(id, request, actor.as_str()).await?,
    ))
}

/// DELETE /api/v1/assets/:id
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: Actor,
) -> Result<Json<DeleteAssetResponse>, ApiError> {
    let asset = registry(&state).delete(id, actor.as_str()).await?;
    Ok(Json(DeleteAssetResponse {
        message: format!("Asset {} deleted", asset.code),
    }))
}
