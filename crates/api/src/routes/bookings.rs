//! Booking endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::{Booking, BookingRequest, BookingResponse, BookingStatus};
use domain::services::{audit_helpers, check_can_cancel, check_can_confirm, validate_stay_dates};
use persistence::entities::BookingEntity;
use persistence::repositories::{BookingRepository, CreateBookingInput, CreateBookingOutcome};
use shared::pagination::{PageRequest, PageResponse};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserId;
use crate::middleware::metrics::{record_booking_closed, record_booking_created};

fn to_response(entity: BookingEntity) -> BookingResponse {
    Booking::from(entity).into()
}

async fn load_booking(repo: &BookingRepository, id: Uuid) -> Result<Booking, ApiError> {
    repo.find_by_id(id)
        .await?
        .map(Booking::from)
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))
}

fn concurrent_change() -> ApiError {
    ApiError::Conflict("Booking was modified concurrently, please retry".to_string())
}

/// Reserve a unit.
///
/// POST /api/v1/bookings
///
/// Returns 201 with the booking in PENDING_PAYMENT status.
/// Returns 400 for dates in the past or a check-out before check-in.
/// Returns 404 if the unit does not exist.
/// Returns 409 if the unit is unavailable or already booked for those dates.
pub async fn create_booking(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    request.validate()?;

    let now = Utc::now();
    validate_stay_dates(request.check_in_date, request.check_out_date, now)?;

    let input = CreateBookingInput {
        unit_id: request.unit_id,
        user_id,
        check_in_date: request.check_in_date,
        check_out_date: request.check_out_date,
        markup_percent: state.config.booking.markup_percent,
        payment_deadline: now + state.config.payment_timeout(),
    };

    let repo = BookingRepository::new(state.pool.clone());
    let booking = match repo.create_with_unit_lock(&input).await? {
        CreateBookingOutcome::Created(booking) => booking,
        CreateBookingOutcome::UnitNotFound => {
            return Err(ApiError::NotFound("Unit not found".to_string()))
        }
        CreateBookingOutcome::UnitUnavailable => {
            return Err(ApiError::Conflict("Unit is not available".to_string()))
        }
        CreateBookingOutcome::Overlapping => {
            return Err(ApiError::Conflict(
                "Unit is already booked for the selected dates".to_string(),
            ))
        }
    };

    state.cache.evict().await;
    record_booking_created();

    info!(
        booking_id = %booking.id,
        unit_id = %booking.unit_id,
        user_id = %user_id,
        total_price = %booking.total_price,
        payment_deadline = ?booking.payment_deadline,
        "Booking created"
    );

    Ok((StatusCode::CREATED, Json(to_response(booking))))
}

/// GET /api/v1/bookings/:id
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let booking = load_booking(&repo, id).await?;
    Ok(Json(booking.into()))
}

/// Confirm a pending booking. Only its owner may do so.
///
/// POST /api/v1/bookings/:id/confirm
pub async fn confirm_booking(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let booking = load_booking(&repo, id).await?;
    check_can_confirm(&booking, user_id)?;

    let confirmed = repo
        .transition(
            id,
            BookingStatus::PendingPayment,
            BookingStatus::Confirmed,
            false,
            &audit_helpers::booking_confirmed(user_id, id),
        )
        .await?
        .ok_or_else(concurrent_change)?;

    info!(booking_id = %id, user_id = %user_id, "Booking confirmed");

    Ok(Json(to_response(confirmed)))
}

/// Cancel a booking and release its unit. Only its owner may do so.
///
/// POST /api/v1/bookings/:id/cancel
///
/// Returns 409 if the booking is already cancelled or completed.
pub async fn cancel_booking(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let booking = load_booking(&repo, id).await?;
    check_can_cancel(&booking, user_id)?;

    let cancelled = repo
        .transition(
            id,
            booking.status,
            BookingStatus::Cancelled,
            true,
            &audit_helpers::booking_cancelled(user_id, id),
        )
        .await?
        .ok_or_else(|| {
            warn!(booking_id = %id, "Booking changed while cancelling");
            concurrent_change()
        })?;

    state.cache.evict().await;
    record_booking_closed(BookingStatus::Cancelled.as_str(), "user");

    info!(
        booking_id = %id,
        unit_id = %cancelled.unit_id,
        user_id = %user_id,
        "Booking cancelled, unit released"
    );

    Ok(Json(to_response(cancelled)))
}

/// Bookings of the caller, newest first.
///
/// GET /api/v1/bookings/user?page=0&size=10
pub async fn get_user_bookings(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<BookingResponse>>, ApiError> {
    let page = page.normalized();
    let repo = BookingRepository::new(state.pool.clone());
    let (bookings, total) = repo.find_by_user(user_id, page).await?;

    let content = bookings.into_iter().map(to_response).collect();
    Ok(Json(PageResponse::new(content, page, total)))
}
