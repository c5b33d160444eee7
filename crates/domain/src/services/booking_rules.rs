//! Date and lifecycle rules for bookings.

use crate::error::DomainError;
use crate::models::{Booking, BookingStatus};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Rejects stays that start or end in the past, or end before they start.
pub fn validate_stay_dates(
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    if check_in < now {
        return Err(DomainError::InvalidInput(
            "Check-in date cannot be in the past".to_string(),
        ));
    }
    if check_out < now {
        return Err(DomainError::InvalidInput(
            "Check-out date cannot be in the past".to_string(),
        ));
    }
    if check_out < check_in {
        return Err(DomainError::InvalidInput(
            "Check-out date must be after check-in date".to_string(),
        ));
    }
    Ok(())
}

/// Inclusive interval intersection: touching boundaries count as overlap.
pub fn overlaps(
    existing_check_in: DateTime<Utc>,
    existing_check_out: DateTime<Utc>,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
) -> bool {
    existing_check_in <= check_out && existing_check_out >= check_in
}

/// Only the owner may confirm, and only while payment is pending.
pub fn check_can_confirm(booking: &Booking, user_id: Uuid) -> Result<(), DomainError> {
    if !booking.is_owned_by(user_id) {
        return Err(DomainError::Forbidden(
            "User is not authorized to confirm this booking".to_string(),
        ));
    }
    if !booking.status.can_transition_to(BookingStatus::Confirmed) {
        return Err(DomainError::Conflict(
            "Booking is not in PENDING_PAYMENT status".to_string(),
        ));
    }
    Ok(())
}

/// Only the owner may cancel, and only a booking that is still active.
pub fn check_can_cancel(booking: &Booking, user_id: Uuid) -> Result<(), DomainError> {
    if !booking.is_owned_by(user_id) {
        return Err(DomainError::Forbidden(
            "User is not authorized to cancel this booking".to_string(),
        ));
    }
    match booking.status {
        BookingStatus::Cancelled => Err(DomainError::Conflict(
            "Booking is already cancelled".to_string(),
        )),
        BookingStatus::Completed => Err(DomainError::Conflict(
            "Completed bookings cannot be cancelled".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn booking(owner: Uuid, status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            unit_id: Uuid::new_v4(),
            user_id: owner,
            check_in_date: now + Duration::days(1),
            check_out_date: now + Duration::days(4),
            total_price: Decimal::new(11500, 2),
            status,
            payment_deadline: Some(now + Duration::minutes(15)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_valid_stay() {
        let now = Utc::now();
        assert!(validate_stay_dates(now + Duration::days(1), now + Duration::days(2), now).is_ok());
        // Same-day stays are allowed.
        let day = now + Duration::days(1);
        assert!(validate_stay_dates(day, day, now).is_ok());
    }

    #[test]
    fn test_past_check_in_rejected() {
        let now = Utc::now();
        let err = validate_stay_dates(now - Duration::hours(1), now + Duration::days(2), now)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidInput("Check-in date cannot be in the past".to_string())
        );
    }

    #[test]
    fn test_check_out_before_check_in_rejected() {
        let now = Utc::now();
        let err = validate_stay_dates(now + Duration::days(3), now + Duration::days(2), now)
            .unwrap_err();
        assert!(err.to_string().contains("after check-in"));
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let base = Utc::now();
        let day = |n: i64| base + Duration::days(n);

        // Existing stay 10..15.
        assert!(overlaps(day(10), day(15), day(12), day(13)));
        assert!(overlaps(day(10), day(15), day(5), day(10)));
        assert!(overlaps(day(10), day(15), day(15), day(20)));
        assert!(overlaps(day(10), day(15), day(5), day(20)));
        assert!(!overlaps(day(10), day(15), day(16), day(20)));
        assert!(!overlaps(day(10), day(15), day(1), day(9)));
    }

    #[test]
    fn test_confirm_rules() {
        let owner = Uuid::new_v4();
        assert!(check_can_confirm(&booking(owner, BookingStatus::PendingPayment), owner).is_ok());
        assert!(matches!(
            check_can_confirm(&booking(owner, BookingStatus::PendingPayment), Uuid::new_v4()),
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            check_can_confirm(&booking(owner, BookingStatus::Confirmed), owner),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn test_cancel_rules() {
        let owner = Uuid::new_v4();
        assert!(check_can_cancel(&booking(owner, BookingStatus::PendingPayment), owner).is_ok());
        assert!(check_can_cancel(&booking(owner, BookingStatus::Confirmed), owner).is_ok());
        assert_eq!(
            check_can_cancel(&booking(owner, BookingStatus::Cancelled), owner).unwrap_err(),
            DomainError::Conflict("Booking is already cancelled".to_string())
        );
        assert!(matches!(
            check_can_cancel(&booking(owner, BookingStatus::Completed), owner),
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            check_can_cancel(&booking(owner, BookingStatus::Confirmed), Uuid::new_v4()),
            Err(DomainError::Forbidden(_))
        ));
    }
}
