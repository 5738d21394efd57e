//! Assignment endpoint handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use domain::models::{
    AssignmentView, CreateAssignmentRequest, CurrentHoldingsQuery, ListAssignmentsResponse,
    ListCurrentHoldingsResponse,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::services::AssignmentProcessor;

fn processor(state: &AppState) -> AssignmentProcessor {
    AssignmentProcessor::new(
        state.pool.clone(),
        &state.config.ledger,
        state.audit.clone(),
    )
}

/// GET /api/v1/assignments
pub async fn list_assignments(
    State(state): State<AppState>,
) -> Result<Json<ListAssignmentsResponse>, ApiError> {
    let data = processor(&state).list().await?;
    let count = data.len();
    Ok(Json(ListAssignmentsResponse { data, count }))
}

/// Assign a batch of assets to one responsible.
///
/// POST /api/v1/assignments
pub async fn create_assignment(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<AssignmentView>), ApiError> {
    let view = processor(&state).create(request, actor.as_str()).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Current holders, optionally for one responsible.
///
/// GET /api/v1/assignments/current?responsible_id=<id>
pub async fn list_current_holdings(
    State(state): State<AppState>,
    Query(query): Query<CurrentHoldingsQuery>,
) -> Result<Json<ListCurrentHoldingsResponse>, ApiError> {
    let data = processor(&state)
        .current_holdings(query.responsible_id)
        .await?;
    let count = data.len();
    Ok(Json(ListCurrentHoldingsResponse { data, count }))
}
