//! Booking repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::{BookingStatus, NewEvent};
use domain::services::{audit_helpers, pricing};
use rust_decimal::Decimal;
use shared::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use super::{BOOKING_COLUMNS, UNIT_COLUMNS};
use crate::entities::{BookingEntity, UnitEntity};
use crate::metrics::QueryTimer;
use crate::repositories::EventRepository;

static ACTIVE_STATUSES: [&str; 2] = ["PENDING_PAYMENT", "CONFIRMED"];

/// Input data for reserving a unit.
#[derive(Debug, Clone)]
pub struct CreateBookingInput {
    pub unit_id: Uuid,
    pub user_id: Uuid,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub markup_percent: Decimal,
    pub payment_deadline: DateTime<Utc>,
}

/// Result of [`BookingRepository::create_with_unit_lock`].
#[derive(Debug)]
pub enum CreateBookingOutcome {
    Created(BookingEntity),
    UnitNotFound,
    UnitUnavailable,
    Overlapping,
}

/// Repository for booking database operations.
#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Creates a new BookingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reserves a unit.
    ///
    /// The unit row is locked for the duration of the transaction so two
    /// concurrent requests cannot both pass the availability and overlap
    /// checks. On success the unit is marked unavailable and a
    /// BOOKING_CREATED event is written in the same transaction.
    pub async fn create_with_unit_lock(
        &self,
        input: &CreateBookingInput,
    ) -> Result<CreateBookingOutcome, sqlx::Error> {
        let timer = QueryTimer::new("create_booking");
        let mut tx = self.pool.begin().await?;

        let unit = sqlx::query_as::<_, UnitEntity>(&format!(
            "SELECT {} FROM units WHERE id = $1 FOR UPDATE",
            UNIT_COLUMNS
        ))
        .bind(input.unit_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(unit) = unit else {
            timer.record();
            return Ok(CreateBookingOutcome::UnitNotFound);
        };
        if !unit.available {
            timer.record();
            return Ok(CreateBookingOutcome::UnitUnavailable);
        }

        let overlapping: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE unit_id = $1
              AND status = ANY($2)
              AND check_in_date <= $3
              AND check_out_date >= $4
            "#,
        )
        .bind(input.unit_id)
        .bind(&ACTIVE_STATUSES[..])
        .bind(input.check_out_date)
        .bind(input.check_in_date)
        .fetch_one(&mut *tx)
        .await?;
        if overlapping > 0 {
            timer.record();
            return Ok(CreateBookingOutcome::Overlapping);
        }

        let total_price = pricing::total_price(unit.base_price, input.markup_percent);

        let booking = sqlx::query_as::<_, BookingEntity>(&format!(
            r#"
            INSERT INTO bookings (unit_id, user_id, check_in_date, check_out_date, total_price, status, payment_deadline)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(input.unit_id)
        .bind(input.user_id)
        .bind(input.check_in_date)
        .bind(input.check_out_date)
        .bind(total_price)
        .bind(BookingStatus::PendingPayment.as_str())
        .bind(input.payment_deadline)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE units SET available = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(input.unit_id)
            .execute(&mut *tx)
            .await?;

        EventRepository::record_in(
            &mut tx,
            &audit_helpers::booking_created(
                input.user_id,
                booking.id,
                booking.total_price,
                input.payment_deadline,
            ),
        )
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(CreateBookingOutcome::Created(booking))
    }

    /// Find booking by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_booking_by_id");
        let result = sqlx::query_as::<_, BookingEntity>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Bookings of a user, newest first, with the total count.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<BookingEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("find_bookings_by_user");

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let bookings = sqlx::query_as::<_, BookingEntity>(&format!(
            r#"
            SELECT {} FROM bookings
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
            BOOKING_COLUMNS
        ))
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        timer.record();
        Ok((bookings, total))
    }

    /// Moves a booking from `from` to `to`, optionally releasing its unit,
    /// and records `event`, all in one transaction.
    ///
    /// The update only applies while the booking is still in `from`, so a
    /// concurrent transition makes this return `None` instead of
    /// overwriting it.
    pub async fn transition(
        &self,
        booking_id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
        release_unit: bool,
        event: &NewEvent,
    ) -> Result<Option<BookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("transition_booking");
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, BookingEntity>(&format!(
            r#"
            UPDATE bookings
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(booking_id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(booking) = booking else {
            timer.record();
            return Ok(None);
        };

        if release_unit {
            sqlx::query("UPDATE units SET available = TRUE, updated_at = NOW() WHERE id = $1")
                .bind(booking.unit_id)
                .execute(&mut *tx)
                .await?;
        }

        EventRepository::record_in(&mut tx, event).await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(booking))
    }

    /// Pending bookings whose payment deadline passed before `now`.
    pub async fn find_expired(&self, now: DateTime<Utc>) -> Result<Vec<BookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_expired_bookings");
        let result = sqlx::query_as::<_, BookingEntity>(&format!(
            r#"
            SELECT {} FROM bookings
            WHERE status = 'PENDING_PAYMENT' AND payment_deadline < $1
            ORDER BY payment_deadline
            "#,
            BOOKING_COLUMNS
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Confirmed bookings whose check-out date is at or before `now`.
    pub async fn find_completed(&self, now: DateTime<Utc>) -> Result<Vec<BookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_completed_bookings");
        let result = sqlx::query_as::<_, BookingEntity>(&format!(
            r#"
            SELECT {} FROM bookings
            WHERE status = 'CONFIRMED' AND check_out_date <= $1
            ORDER BY check_out_date
            "#,
            BOOKING_COLUMNS
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
