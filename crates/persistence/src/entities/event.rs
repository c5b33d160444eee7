//! Event entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Event;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_type: String,
    pub entity_id: Option<Uuid>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl EventEntity {
    /// Convert to domain model. Rows with an unknown type are skipped.
    pub fn into_domain(self) -> Option<Event> {
        let event_type = self.event_type.parse().ok()?;
        Some(Event {
            id: self.id,
            user_id: self.user_id,
            event_type,
            entity_id: self.entity_id,
            description: self.description,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::EventType;

    #[test]
    fn test_into_domain() {
        let entity = EventEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_type: "BOOKING_EXPIRED".to_string(),
            entity_id: Some(Uuid::new_v4()),
            description: "Booking expired and cancelled".to_string(),
            created_at: Utc::now(),
        };
        let event = entity.clone().into_domain().unwrap();
        assert_eq!(event.event_type, EventType::BookingExpired);

        let unknown = EventEntity {
            event_type: "SOMETHING_ELSE".to_string(),
            ..entity
        };
        assert!(unknown.into_domain().is_none());
    }
}
