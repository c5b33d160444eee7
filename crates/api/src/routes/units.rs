//! Unit endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{Unit, UnitRequest, UnitResponse, UnitSearchRequest};
use domain::services::pricing;
use persistence::entities::UnitEntity;
use persistence::repositories::{UnitInput, UnitRepository};
use shared::pagination::{PageRequest, PageResponse};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserId;

fn to_response(entity: UnitEntity) -> UnitResponse {
    Unit::from(entity).into()
}

fn unit_input(state: &AppState, request: UnitRequest) -> UnitInput {
    UnitInput {
        number_of_rooms: request.number_of_rooms,
        accommodation_type: request.accommodation_type,
        floor: request.floor,
        base_price: request.base_price,
        total_price: pricing::total_price(request.base_price, state.config.booking.markup_percent),
        description: request.description,
    }
}

/// Create a unit.
///
/// POST /api/v1/units
pub async fn create_unit(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(request): Json<UnitRequest>,
) -> Result<(StatusCode, Json<UnitResponse>), ApiError> {
    request.validate()?;

    let repo = UnitRepository::new(state.pool.clone());
    let unit = repo.create(&unit_input(&state, request), user_id).await?;
    state.cache.evict().await;

    info!(
        unit_id = %unit.id,
        user_id = %user_id,
        total_price = %unit.total_price,
        "Unit created"
    );

    Ok((StatusCode::CREATED, Json(to_response(unit))))
}

/// GET /api/v1/units/:id
pub async fn get_unit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UnitResponse>, ApiError> {
    let repo = UnitRepository::new(state.pool.clone());
    let unit = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Unit not found".to_string()))?;

    Ok(Json(to_response(unit)))
}

/// Replace a unit's details and recompute its total price.
///
/// PUT /api/v1/units/:id
pub async fn update_unit(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<Uuid>,
    Json(request): Json<UnitRequest>,
) -> Result<Json<UnitResponse>, ApiError> {
    request.validate()?;

    let repo = UnitRepository::new(state.pool.clone());
    let unit = repo
        .update(id, &unit_input(&state, request), user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Unit not found".to_string()))?;
    state.cache.evict().await;

    info!(unit_id = %id, user_id = %user_id, "Unit updated");

    Ok(Json(to_response(unit)))
}

/// DELETE /api/v1/units/:id
pub async fn delete_unit(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = UnitRepository::new(state.pool.clone());
    if !repo.delete(id, user_id).await? {
        return Err(ApiError::NotFound("Unit not found".to_string()));
    }
    state.cache.evict().await;

    info!(unit_id = %id, user_id = %user_id, "Unit deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Search available units.
///
/// POST /api/v1/units/search
///
/// Returns 400 for an unknown sort field or direction, or a price range
/// whose minimum exceeds its maximum.
pub async fn search_units(
    State(state): State<AppState>,
    Json(request): Json<UnitSearchRequest>,
) -> Result<Json<PageResponse<UnitResponse>>, ApiError> {
    request.validate()?;
    request.sort().map_err(ApiError::validation)?;

    if let (Some(min), Some(max)) = (request.min_price, request.max_price) {
        if min > max {
            return Err(ApiError::validation(
                "minPrice must not be greater than maxPrice",
            ));
        }
    }

    let page = PageRequest::new(request.page, request.size);
    let repo = UnitRepository::new(state.pool.clone());
    let (units, total) = repo.search(&request, page).await?;

    debug!(total = total, page = page.page, "Unit search");

    let content = units.into_iter().map(to_response).collect();
    Ok(Json(PageResponse::new(content, page, total)))
}

/// Number of units currently available for booking.
///
/// GET /api/v1/units/available/count
///
/// Served from the cache; a miss reads the database and refills it.
pub async fn available_units_count(State(state): State<AppState>) -> Result<Json<i64>, ApiError> {
    if let Some(count) = state.cache.get_count().await {
        return Ok(Json(count));
    }

    debug!("Available units count cache miss");
    let repo = UnitRepository::new(state.pool.clone());
    let count = repo.count_available().await?;
    state.cache.put_count(count).await;

    Ok(Json(count))
}
