//! Audit trail events.
//!
//! Every state-changing operation on units, bookings, payments and users
//! leaves one row in the `events` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    UnitCreated,
    UnitUpdated,
    UnitDeleted,
    BookingCreated,
    BookingConfirmed,
    BookingCancelled,
    BookingExpired,
    BookingCompleted,
    PaymentCreated,
    PaymentStatusUpdated,
    PaymentCompleted,
    PaymentRefunded,
    PaymentCancelled,
    UserCreated,
    UserUpdated,
    UserDeleted,
}

impl EventType {
    pub const ALL: [EventType; 16] = [
        EventType::UnitCreated,
        EventType::UnitUpdated,
        EventType::UnitDeleted,
        EventType::BookingCreated,
        EventType::BookingConfirmed,
        EventType::BookingCancelled,
        EventType::BookingExpired,
        EventType::BookingCompleted,
        EventType::PaymentCreated,
        EventType::PaymentStatusUpdated,
        EventType::PaymentCompleted,
        EventType::PaymentRefunded,
        EventType::PaymentCancelled,
        EventType::UserCreated,
        EventType::UserUpdated,
        EventType::UserDeleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::UnitCreated => "UNIT_CREATED",
            EventType::UnitUpdated => "UNIT_UPDATED",
            EventType::UnitDeleted => "UNIT_DELETED",
            EventType::BookingCreated => "BOOKING_CREATED",
            EventType::BookingConfirmed => "BOOKING_CONFIRMED",
            EventType::BookingCancelled => "BOOKING_CANCELLED",
            EventType::BookingExpired => "BOOKING_EXPIRED",
            EventType::BookingCompleted => "BOOKING_COMPLETED",
            EventType::PaymentCreated => "PAYMENT_CREATED",
            EventType::PaymentStatusUpdated => "PAYMENT_STATUS_UPDATED",
            EventType::PaymentCompleted => "PAYMENT_COMPLETED",
            EventType::PaymentRefunded => "PAYMENT_REFUNDED",
            EventType::PaymentCancelled => "PAYMENT_CANCELLED",
            EventType::UserCreated => "USER_CREATED",
            EventType::UserUpdated => "USER_UPDATED",
            EventType::UserDeleted => "USER_DELETED",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .copied()
            .find(|event_type| event_type.as_str() == s)
            .ok_or_else(|| format!("Invalid event type: {}", s))
    }
}

/// A recorded audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_type: EventType,
    pub entity_id: Option<Uuid>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// An event that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub user_id: Uuid,
    pub event_type: EventType,
    pub entity_id: Option<Uuid>,
    pub description: String,
}

impl NewEvent {
    pub fn new(
        user_id: Uuid,
        event_type: EventType,
        entity_id: Uuid,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            event_type,
            entity_id: Some(entity_id),
            description: description.into(),
        }
    }
}
