//! Movement log handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::{ListMovementsQuery, ListMovementsResponse, Movement, MovementAction};
use persistence::repositories::MovementRepository;
use shared::pagination::PageRequest;

use crate::app::AppState;
use crate::error::ApiError;

/// List movements newest first.
///
/// GET /api/v1/movements?page=&per_page=&action=
pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<ListMovementsQuery>,
) -> Result<Json<ListMovementsResponse>, ApiError> {
    if let Some(action) = query.action.as_deref().filter(|a| !a.is_empty()) {
        action
            .parse::<MovementAction>()
            .map_err(ApiError::validation)?;
    }

    let page = PageRequest::new(query.page, query.per_page);
    let repo = MovementRepository::new(state.pool.clone());
    let (entities, total) = repo.list(&query, &page).await?;

    Ok(Json(ListMovementsResponse {
        data: entities.into_iter().map(Movement::from).collect(),
        pagination: page.info(total),
    }))
}
