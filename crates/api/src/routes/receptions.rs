//! Reception endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use domain::models::{
    CreateReceptionRequest, DeleteReceptionResponse, ListReceptionsResponse, ReceptionView,
    UpdateReceptionRequest,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::ReceptionProcessor;

fn processor(state: &AppState) -> ReceptionProcessor {
    ReceptionProcessor::new(
        state.pool.clone(),
        &state.config.ledger,
        state.audit.clone(),
    )
}

/// List receptions, latest return first.
///
/// GET /api/v1/receptions
pub async fn list_receptions(
    State(state): State<AppState>,
) -> Result<Json<ListReceptionsResponse>, ApiError> {
    let data = processor(&state).list().await?;
    let count = data.len();
    Ok(Json(ListReceptionsResponse { data, count }))
}

/// Register returned assets.
///
/// POST /api/v1/receptions
pub async fn create_reception(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateReceptionRequest>,
) -> Result<(StatusCode, Json<ReceptionView>), ApiError> {
    let view = processor(&state).create(request, actor.as_str()).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/receptions/:id
pub async fn get_reception(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ReceptionView>, ApiError> {
    Ok(Json(processor(&state).get(id).await?))
}

/// Edit reception metadata. The asset list must be resubmitted unchanged.
///
/// PUT /api/v1/receptions/:id
pub async fn update_reception(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: Actor,
    Json(request): Json<UpdateReceptionRequest>,
) -> Result<Json<ReceptionView>, ApiError> {
    let view = processor(&state).update(id, request, actor.as_str()).await?;
    Ok(Json(view))
}

/// DELETE /api/v1/receptions/:id
pub async fn delete_reception(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: Actor,
) -> Result<Json<DeleteReceptionResponse>, ApiError> {
    Ok(Json(processor(&state).delete(id, actor.as_str()).await?))
}
