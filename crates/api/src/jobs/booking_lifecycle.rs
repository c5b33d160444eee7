//! Time-driven booking transitions.
//!
//! Bookings that were never paid are cancelled once their payment deadline
//! passes, and confirmed bookings are completed after check-out. Both free
//! the unit again.

use chrono::Utc;
use domain::models::BookingStatus;
use domain::services::audit_helpers;
use persistence::cache::AvailabilityCache;
use persistence::repositories::BookingRepository;
use sqlx::PgPool;
use tracing::{debug, info, warn};

use super::scheduler::{Job, JobFrequency};
use crate::middleware::metrics::record_booking_closed;

/// Cancels PENDING_PAYMENT bookings whose payment deadline has passed.
pub struct ExpiredBookingsJob {
    repo: BookingRepository,
    cache: AvailabilityCache,
    interval_secs: u64,
}

impl ExpiredBookingsJob {
    pub fn new(pool: PgPool, cache: AvailabilityCache, interval_secs: u64) -> Self {
        Self {
            repo: BookingRepository::new(pool),
            cache,
            interval_secs,
        }
    }
}

#[async_trait::async_trait]
impl Job for ExpiredBookingsJob {
    fn name(&self) -> &'static str {
        "expired_bookings"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.interval_secs)
    }

    async fn execute(&self) -> Result<(), String> {
        let expired = self
            .repo
            .find_expired(Utc::now())
            .await
            .map_err(|e| format!("Failed to load expired bookings: {}", e))?;

        debug!(count = expired.len(), "Found expired bookings");

        let mut cancelled = 0usize;
        for booking in expired {
            let event = audit_helpers::booking_expired(booking.user_id, booking.id);
            let result = self
                .repo
                .transition(
                    booking.id,
                    BookingStatus::PendingPayment,
                    BookingStatus::Cancelled,
                    true,
                    &event,
                )
                .await
                .map_err(|e| format!("Failed to expire booking {}: {}", booking.id, e))?;

            match result {
                Some(_) => {
                    cancelled += 1;
                    record_booking_closed(BookingStatus::Cancelled.as_str(), "expired");
                    info!(
                        booking_id = %booking.id,
                        unit_id = %booking.unit_id,
                        "Booking expired, unit released"
                    );
                }
                // Paid or cancelled since it was loaded.
                None => debug!(booking_id = %booking.id, "Booking no longer pending"),
            }
        }

        if cancelled > 0 {
            self.cache.evict().await;
            info!(cancelled = cancelled, "Expired bookings cancelled");
        }
        Ok(())
    }
}

/// Completes CONFIRMED bookings whose check-out date has passed.
pub struct CompletedBookingsJob {
    repo: BookingRepository,
    cache: AvailabilityCache,
    interval_secs: u64,
}

impl CompletedBookingsJob {
    pub fn new(pool: PgPool, cache: AvailabilityCache, interval_secs: u64) -> Self {
        Self {
            repo: BookingRepository::new(pool),
            cache,
            interval_secs,
        }
    }
}

#[async_trait::async_trait]
impl Job for CompletedBookingsJob {
    fn name(&self) -> &'static str {
        "completed_bookings"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.interval_secs)
    }

    async fn execute(&self) -> Result<(), String> {
        let finished = self
            .repo
            .find_completed(Utc::now())
            .await
            .map_err(|e| format!("Failed to load finished bookings: {}", e))?;

        let mut completed = 0usize;
        for booking in finished {
            let event = audit_helpers::booking_completed(booking.user_id, booking.id);
            match self
                .repo
                .transition(
                    booking.id,
                    BookingStatus::Confirmed,
                    BookingStatus::Completed,
                    true,
                    &event,
                )
                .await
            {
                Ok(Some(_)) => {
                    completed += 1;
                    record_booking_closed(BookingStatus::Completed.as_str(), "checked_out");
                }
                Ok(None) => debug!(booking_id = %booking.id, "Booking no longer confirmed"),
                // Keep going; the next run retries this one.
                Err(e) => warn!(booking_id = %booking.id, error = %e, "Failed to complete booking"),
            }
        }

        if completed > 0 {
            self.cache.evict().await;
            info!(completed = completed, "Bookings completed after check-out");
        }
        Ok(())
    }
}
