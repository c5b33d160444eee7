//! Payment repository for database operations.

use domain::models::{BookingStatus, NewEvent, PaymentMethod, PaymentStatus};
use domain::services::audit_helpers;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::PAYMENT_COLUMNS;
use crate::entities::PaymentEntity;
use crate::metrics::QueryTimer;
use crate::repositories::EventRepository;

/// Input data for registering a payment.
#[derive(Debug, Clone)]
pub struct CreatePaymentInput {
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
}

/// Result of [`PaymentRepository::complete_with_booking`].
#[derive(Debug)]
pub enum ProcessPaymentOutcome {
    Completed(PaymentEntity),
    PaymentNotFound,
    PaymentNotPending,
    BookingNotPending,
}

/// Repository for payment database operations.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a PENDING payment and its PAYMENT_CREATED event.
    pub async fn create(
        &self,
        input: &CreatePaymentInput,
        actor: Uuid,
    ) -> Result<PaymentEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_payment");
        let mut tx = self.pool.begin().await?;

        let payment = sqlx::query_as::<_, PaymentEntity>(&format!(
            r#"
            INSERT INTO payments (booking_id, amount, status, payment_method, transaction_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(input.booking_id)
        .bind(input.amount)
        .bind(PaymentStatus::Pending.as_str())
        .bind(input.payment_method.as_str())
        .bind(input.transaction_id.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        EventRepository::record_in(
            &mut tx,
            &audit_helpers::payment_created(actor, payment.id, payment.booking_id),
        )
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(payment)
    }

    /// Find payment by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_payment_by_id");
        let result = sqlx::query_as::<_, PaymentEntity>(&format!(
            "SELECT {} FROM payments WHERE id = $1",
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All payments of a booking, oldest first.
    pub async fn find_by_booking(&self, booking_id: Uuid) -> Result<Vec<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_payments_by_booking");
        let result = sqlx::query_as::<_, PaymentEntity>(&format!(
            "SELECT {} FROM payments WHERE booking_id = $1 ORDER BY created_at, id",
            PAYMENT_COLUMNS
        ))
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Sets any status and records PAYMENT_STATUS_UPDATED.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        actor: Uuid,
    ) -> Result<Option<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_payment_status");
        let mut tx = self.pool.begin().await?;

        let payment = sqlx::query_as::<_, PaymentEntity>(&format!(
            r#"
            UPDATE payments SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(payment) = &payment {
            EventRepository::record_in(
                &mut tx,
                &audit_helpers::payment_status_updated(actor, payment.id, status),
            )
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(payment)
    }

    /// Moves a payment from `from` to `to` and records `event`. Returns
    /// `None` when the payment is no longer in `from`.
    pub async fn transition(
        &self,
        id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
        event: &NewEvent,
    ) -> Result<Option<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("transition_payment");
        let mut tx = self.pool.begin().await?;

        let payment = sqlx::query_as::<_, PaymentEntity>(&format!(
            r#"
            UPDATE payments SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        if payment.is_some() {
            EventRepository::record_in(&mut tx, event).await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(payment)
    }

    /// Completes a pending payment and confirms its booking atomically.
    ///
    /// Both rows are locked; the booking must still be awaiting payment.
    pub async fn complete_with_booking(
        &self,
        id: Uuid,
        actor: Uuid,
    ) -> Result<ProcessPaymentOutcome, sqlx::Error> {
        let timer = QueryTimer::new("complete_payment");
        let mut tx = self.pool.begin().await?;

        let payment = sqlx::query_as::<_, PaymentEntity>(&format!(
            "SELECT {} FROM payments WHERE id = $1 FOR UPDATE",
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(payment) = payment else {
            timer.record();
            return Ok(ProcessPaymentOutcome::PaymentNotFound);
        };
        if payment.status != PaymentStatus::Pending.as_str() {
            timer.record();
            return Ok(ProcessPaymentOutcome::PaymentNotPending);
        }

        let confirmed = sqlx::query(
            r#"
            UPDATE bookings SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(payment.booking_id)
        .bind(BookingStatus::PendingPayment.as_str())
        .bind(BookingStatus::Confirmed.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if confirmed == 0 {
            timer.record();
            return Ok(ProcessPaymentOutcome::BookingNotPending);
        }

        let payment = sqlx::query_as::<_, PaymentEntity>(&format!(
            r#"
            UPDATE payments SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .bind(PaymentStatus::Completed.as_str())
        .fetch_one(&mut *tx)
        .await?;

        EventRepository::record_in(
            &mut tx,
            &audit_helpers::payment_completed(actor, payment.id, payment.booking_id),
        )
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(ProcessPaymentOutcome::Completed(payment))
    }

    /// Cancels every pending payment of a booking, one PAYMENT_CANCELLED
    /// event each. Returns the cancelled payments.
    pub async fn cancel_pending_for_booking(
        &self,
        booking_id: Uuid,
        actor: Uuid,
    ) -> Result<Vec<PaymentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("cancel_pending_payments");
        let mut tx = self.pool.begin().await?;

        let cancelled = sqlx::query_as::<_, PaymentEntity>(&format!(
            r#"
            UPDATE payments SET status = $3, updated_at = NOW()
            WHERE booking_id = $1 AND status = $2
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(booking_id)
        .bind(PaymentStatus::Pending.as_str())
        .bind(PaymentStatus::Cancelled.as_str())
        .fetch_all(&mut *tx)
        .await?;

        for payment in &cancelled {
            EventRepository::record_in(
                &mut tx,
                &audit_helpers::payment_cancelled(actor, payment.id, booking_id),
            )
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(cancelled)
    }
}
