//! Area and responsible directory handlers.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{
    Area, CreateAreaRequest, CreateResponsibleRequest, ListAreasResponse,
    ListResponsiblesResponse, Responsible,
};
use domain::InventoryError;
use persistence::repositories::DirectoryRepository;
use shared::validation::normalize_text;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// GET /api/v1/areas
pub async fn list_areas(State(state): State<AppState>) -> Result<Json<ListAreasResponse>, ApiError> {
    let repo = DirectoryRepository::new(state.pool.clone());
    let data: Vec<Area> = repo.list_areas().await?.into_iter().map(Area::from).collect();
    let count = data.len();
    Ok(Json(ListAreasResponse { data, count }))
}

/// POST /api/v1/areas
pub async fn create_area(
    State(state): State<AppState>,
    Json(request): Json<CreateAreaRequest>,
) -> Result<(StatusCode, Json<Area>), ApiError> {
    let request = CreateAreaRequest {
        name: normalize_text(Some(&request.name)).unwrap_or_default(),
    };
    request.validate()?;

    let repo = DirectoryRepository::new(state.pool.clone());
    let area: Area = repo
        .create_area(&request.name)
        .await
        .map_err(|e| match InventoryError::from(e) {
            InventoryError::Conflict(_) => {
                ApiError::Conflict(format!("Area {} already exists", request.name))
            }
            other => other.into(),
        })?
        .into();

    info!(area_id = area.id, "Area created");
    Ok((StatusCode::CREATED, Json(area)))
}

/// GET /api/v1/responsibles
pub async fn list_responsibles(
    State(state): State<AppState>,
) -> Result<Json<ListResponsiblesResponse>, ApiError> {
    let repo = DirectoryRepository::new(state.pool.clone());
    let data: Vec<Responsible> = repo
        .list_responsibles()
        .await?
        .into_iter()
        .map(Responsible::from)
        .collect();
    let count = data.len();
    Ok(Json(ListResponsiblesResponse { data, count }))
}

/// POST /api/v1/responsibles
pub async fn create_responsible(
    State(state): State<AppState>,
    Json(request): Json<CreateResponsibleRequest>,
) -> Result<(StatusCode, Json<Responsible>), ApiError> {
    let request = CreateResponsibleRequest {
        first_name: normalize_text(Some(&request.first_name)).unwrap_or_default(),
        last_name: normalize_text(request.last_name.as_deref()),
    };
    request.validate()?;

    let repo = DirectoryRepository::new(state.pool.clone());
    let responsible: Responsible = repo
        .create_responsible(
            &request.first_name,
            request.last_name.as_deref().unwrap_or_default(),
        )
        .await?
        .into();

    info!(responsible_id = responsible.id, "Responsible created");
    Ok((StatusCode::CREATED, Json(responsible)))
}
