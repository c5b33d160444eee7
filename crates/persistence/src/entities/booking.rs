//! Booking entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Booking, BookingStatus};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use super::parse_column;

/// Database row mapping for the bookings table.
#[derive(Debug, Clone, FromRow)]
pub struct BookingEntity {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub user_id: Uuid,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: String,
    pub payment_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingEntity {
    /// Convert to domain model.
    pub fn into_domain(self) -> Booking {
        let status = parse_column(&self.status, "status", self.id, BookingStatus::Cancelled);

        Booking {
            id: self.id,
            unit_id: self.unit_id,
            user_id: self.user_id,
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            total_price: self.total_price,
            status,
            payment_deadline: self.payment_deadline,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<BookingEntity> for Booking {
    fn from(entity: BookingEntity) -> Self {
        entity.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entity(status: &str) -> BookingEntity {
        let now = Utc::now();
        BookingEntity {
            id: Uuid::new_v4(),
            unit_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            check_in_date: now + Duration::days(1),
            check_out_date: now + Duration::days(2),
            total_price: Decimal::new(5750, 2),
            status: status.to_string(),
            payment_deadline: Some(now + Duration::minutes(15)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_into_domain_parses_status() {
        let booking = entity("PENDING_PAYMENT").into_domain();
        assert_eq!(booking.status, BookingStatus::PendingPayment);
        assert!(booking.payment_deadline.is_some());
    }

    #[test]
    fn test_unknown_status_is_treated_as_cancelled() {
        let booking: Booking = entity("ON_HOLD").into();
        assert_eq!(booking.status, BookingStatus::Cancelled);
    }
}
