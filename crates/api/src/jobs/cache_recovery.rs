//! Refreshes the cached available-unit count.
//!
//! Redis may have been flushed or restarted while the service kept running
//! on database reads. Once it answers again, the count is recomputed and
//! written back so readers hit the cache.

use persistence::cache::AvailabilityCache;
use persistence::repositories::UnitRepository;
use sqlx::PgPool;
use tracing::{info, warn};

use super::scheduler::{Job, JobFrequency};

pub struct CacheRecoveryJob {
    pool: PgPool,
    cache: AvailabilityCache,
    interval_secs: u64,
}

impl CacheRecoveryJob {
    pub fn new(pool: PgPool, cache: AvailabilityCache, interval_secs: u64) -> Self {
        Self {
            pool,
            cache,
            interval_secs,
        }
    }
}

#[async_trait::async_trait]
impl Job for CacheRecoveryJob {
    fn name(&self) -> &'static str {
        "cache_recovery"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.interval_secs)
    }

    fn run_on_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> Result<(), String> {
        if !self.cache.is_enabled() {
            return Ok(());
        }

        if let Err(e) = self.cache.ping().await {
            warn!(error = %e, "Redis unavailable, skipping cache recovery");
            return Ok(());
        }

        let count = UnitRepository::new(self.pool.clone())
            .count_available()
            .await
            .map_err(|e| format!("Failed to count available units: {}", e))?;
        self.cache.put_count(count).await;

        info!(available_units = count, "Available units count cached");
        Ok(())
    }
}
