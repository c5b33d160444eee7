//! Payment endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    BookingStatus, Payment, PaymentRequest, PaymentResponse, PaymentStatus, PaymentStatusQuery,
};
use domain::services::audit_helpers;
use persistence::entities::PaymentEntity;
use persistence::repositories::{
    BookingRepository, CreatePaymentInput, PaymentRepository, ProcessPaymentOutcome,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserId;
use crate::middleware::metrics::record_payment_processed;

fn to_response(entity: PaymentEntity) -> PaymentResponse {
    Payment::from(entity).into()
}

fn payment_not_found() -> ApiError {
    ApiError::NotFound("Payment not found".to_string())
}

/// Register a payment for a booking that awaits payment.
///
/// POST /api/v1/payments
///
/// Returns 404 if the booking does not exist.
/// Returns 409 if the booking is not in PENDING_PAYMENT status.
pub async fn create_payment(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(request): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    request.validate()?;

    let booking = BookingRepository::new(state.pool.clone())
        .find_by_id(request.booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    if booking.status != BookingStatus::PendingPayment.as_str() {
        return Err(ApiError::Conflict(
            "Booking is not in pending payment status".to_string(),
        ));
    }

    let input = CreatePaymentInput {
        booking_id: request.booking_id,
        amount: request.amount,
        payment_method: request.payment_method,
        transaction_id: request.transaction_id,
    };
    let payment = PaymentRepository::new(state.pool.clone())
        .create(&input, user_id)
        .await?;

    info!(
        payment_id = %payment.id,
        booking_id = %payment.booking_id,
        amount = %payment.amount,
        "Payment created"
    );

    Ok((StatusCode::CREATED, Json(to_response(payment))))
}

/// GET /api/v1/payments/:id
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let payment = PaymentRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(payment_not_found)?;

    Ok(Json(to_response(payment)))
}

/// GET /api/v1/payments/booking/:booking_id
pub async fn get_payments_by_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let payments = PaymentRepository::new(state.pool.clone())
        .find_by_booking(booking_id)
        .await?;

    Ok(Json(payments.into_iter().map(to_response).collect()))
}

/// Record a status reported by the client, e.g. FAILED.
///
/// PUT /api/v1/payments/:id/status?status=FAILED
pub async fn update_payment_status(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<Uuid>,
    Query(query): Query<PaymentStatusQuery>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let payment = PaymentRepository::new(state.pool.clone())
        .update_status(id, query.status, user_id)
        .await?
        .ok_or_else(payment_not_found)?;

    info!(payment_id = %id, status = %query.status, "Payment status updated");

    Ok(Json(to_response(payment)))
}

/// Complete a pending payment, confirming its booking.
///
/// POST /api/v1/payments/:id/process
pub async fn process_payment(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let outcome = PaymentRepository::new(state.pool.clone())
        .complete_with_booking(id, user_id)
        .await?;

    let payment = match outcome {
        ProcessPaymentOutcome::Completed(payment) => payment,
        ProcessPaymentOutcome::PaymentNotFound => return Err(payment_not_found()),
        ProcessPaymentOutcome::PaymentNotPending => {
            return Err(ApiError::Conflict(
                "Payment is not in pending status".to_string(),
            ))
        }
        ProcessPaymentOutcome::BookingNotPending => {
            return Err(ApiError::Conflict(
                "Booking is not in pending payment status".to_string(),
            ))
        }
    };

    record_payment_processed();
    info!(
        payment_id = %id,
        booking_id = %payment.booking_id,
        "Payment completed, booking confirmed"
    );

    Ok(Json(to_response(payment)))
}

/// Refund a completed payment.
///
/// POST /api/v1/payments/:id/refund
pub async fn refund_payment(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let repo = PaymentRepository::new(state.pool.clone());
    let payment = repo.find_by_id(id).await?.ok_or_else(payment_not_found)?;

    if payment.status != PaymentStatus::Completed.as_str() {
        return Err(ApiError::Conflict(
            "Payment is not in completed status".to_string(),
        ));
    }

    let refunded = repo
        .transition(
            id,
            PaymentStatus::Completed,
            PaymentStatus::Refunded,
            &audit_helpers::payment_refunded(user_id, id, payment.booking_id),
        )
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("Payment was modified concurrently, please retry".to_string())
        })?;

    info!(payment_id = %id, booking_id = %refunded.booking_id, "Payment refunded");

    Ok(Json(to_response(refunded)))
}

/// Cancel every pending payment of a booking.
///
/// POST /api/v1/payments/booking/:booking_id/cancel
///
/// Returns the payments that were cancelled.
pub async fn cancel_pending_payments(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let cancelled = PaymentRepository::new(state.pool.clone())
        .cancel_pending_for_booking(booking_id, user_id)
        .await?;

    info!(
        booking_id = %booking_id,
        cancelled = cancelled.len(),
        "Pending payments cancelled"
    );

    Ok(Json(cancelled.into_iter().map(to_response).collect()))
}
