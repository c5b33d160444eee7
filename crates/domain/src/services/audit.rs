//! Builders for audit trail events.

/// One constructor per audited action, so descriptions stay consistent
/// between request handlers and background jobs.
pub mod audit_helpers {
    use crate::models::{EventType, NewEvent, PaymentStatus};
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    pub fn unit_created(user_id: Uuid, unit_id: Uuid) -> NewEvent {
        NewEvent::new(user_id, EventType::UnitCreated, unit_id, format!("Unit created: {}", unit_id))
    }

    pub fn unit_updated(user_id: Uuid, unit_id: Uuid) -> NewEvent {
        NewEvent::new(user_id, EventType::UnitUpdated, unit_id, format!("Unit updated: {}", unit_id))
    }

    pub fn unit_deleted(user_id: Uuid, unit_id: Uuid) -> NewEvent {
        NewEvent::new(user_id, EventType::UnitDeleted, unit_id, format!("Unit deleted: {}", unit_id))
    }

    pub fn booking_created(
        user_id: Uuid,
        booking_id: Uuid,
        total_price: Decimal,
        payment_deadline: DateTime<Utc>,
    ) -> NewEvent {
        NewEvent::new(
            user_id,
            EventType::BookingCreated,
            booking_id,
            format!(
                "Booking created with total price {} and payment deadline {}",
                total_price,
                payment_deadline.to_rfc3339()
            ),
        )
    }

    pub fn booking_confirmed(user_id: Uuid, booking_id: Uuid) -> NewEvent {
        NewEvent::new(user_id, EventType::BookingConfirmed, booking_id, "Booking confirmed")
    }

    pub fn booking_cancelled(user_id: Uuid, booking_id: Uuid) -> NewEvent {
        NewEvent::new(user_id, EventType::BookingCancelled, booking_id, "Booking cancelled")
    }

    pub fn booking_expired(owner_id: Uuid, booking_id: Uuid) -> NewEvent {
        NewEvent::new(
            owner_id,
            EventType::BookingExpired,
            booking_id,
            "Booking expired and cancelled",
        )
    }

    pub fn booking_completed(owner_id: Uuid, booking_id: Uuid) -> NewEvent {
        NewEvent::new(
            owner_id,
            EventType::BookingCompleted,
            booking_id,
            "Booking completed after check-out",
        )
    }

    pub fn payment_created(user_id: Uuid, payment_id: Uuid, booking_id: Uuid) -> NewEvent {
        NewEvent::new(
            user_id,
            EventType::PaymentCreated,
            payment_id,
            format!("Payment created for booking: {}", booking_id),
        )
    }

    pub fn payment_status_updated(
        user_id: Uuid,
        payment_id: Uuid,
        status: PaymentStatus,
    ) -> NewEvent {
        NewEvent::new(
            user_id,
            EventType::PaymentStatusUpdated,
            payment_id,
            format!("Payment status updated to: {}", status),
        )
    }

    pub fn payment_completed(user_id: Uuid, payment_id: Uuid, booking_id: Uuid) -> NewEvent {
        NewEvent::new(
            user_id,
            EventType::PaymentCompleted,
            payment_id,
            format!("Payment completed for booking: {}", booking_id),
        )
    }

    pub fn payment_refunded(user_id: Uuid, payment_id: Uuid, booking_id: Uuid) -> NewEvent {
        NewEvent::new(
            user_id,
            EventType::PaymentRefunded,
            payment_id,
            format!("Payment refunded for booking: {}", booking_id),
        )
    }

    pub fn payment_cancelled(user_id: Uuid, payment_id: Uuid, booking_id: Uuid) -> NewEvent {
        NewEvent::new(
            user_id,
            EventType::PaymentCancelled,
            payment_id,
            format!("Payment cancelled for booking: {}", booking_id),
        )
    }

    pub fn user_created(user_id: Uuid) -> NewEvent {
        NewEvent::new(user_id, EventType::UserCreated, user_id, format!("User created: {}", user_id))
    }

    pub fn user_updated(user_id: Uuid) -> NewEvent {
        NewEvent::new(user_id, EventType::UserUpdated, user_id, format!("User updated: {}", user_id))
    }

    pub fn user_deleted(user_id: Uuid) -> NewEvent {
        NewEvent::new(user_id, EventType::UserDeleted, user_id, format!("User deleted: {}", user_id))
    }
}
