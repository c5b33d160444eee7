//! Redis-backed cache for the available-unit count.
//!
//! The cache is strictly best effort. Redis errors are logged and treated as
//! misses so the database stays the source of truth, and a cache built
//! without Redis simply passes every call through.

use bb8_redis::bb8::{Pool, RunError};
use bb8_redis::redis::{self, AsyncCommands, RedisError};
use bb8_redis::RedisConnectionManager;
use metrics::counter;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Key under which the available-unit count is stored.
pub const AVAILABLE_UNITS_COUNT_KEY: &str = "availableUnits::count";

/// Connection pool for Redis.
pub type RedisPool = Pool<RedisConnectionManager>;

/// Redis connection settings.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache is disabled")]
    Disabled,

    #[error("redis pool error: {0}")]
    Pool(#[from] RunError<RedisError>),

    #[error("redis error: {0}")]
    Redis(#[from] RedisError),
}

/// Builds a Redis pool without contacting the server, so the service can
/// start while Redis is down.
pub fn create_redis_pool(config: &RedisConfig) -> Result<RedisPool, CacheError> {
    let manager = RedisConnectionManager::new(config.url.as_str())?;
    Ok(Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build_unchecked(manager))
}

/// Cache for the number of available units.
#[derive(Clone)]
pub struct AvailabilityCache {
    pool: Option<RedisPool>,
    ttl_secs: u64,
}

impl AvailabilityCache {
    pub fn new(pool: RedisPool, ttl: Duration) -> Self {
        Self {
            pool: Some(pool),
            ttl_secs: ttl.as_secs().max(1),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            pool: None,
            ttl_secs: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    /// Cached count, or `None` on a miss or any Redis failure.
    pub async fn get_count(&self) -> Option<i64> {
        if !self.is_enabled() {
            return None;
        }
        match self.try_get().await {
            Ok(Some(count)) => {
                counter!("cache_requests_total", "result" => "hit").increment(1);
                Some(count)
            }
            Ok(None) => {
                counter!("cache_requests_total", "result" => "miss").increment(1);
                None
            }
            Err(e) => {
                counter!("cache_requests_total", "result" => "error").increment(1);
                warn!(error = %e, "Failed to read available units count from cache");
                None
            }
        }
    }

    /// Stores the count with the configured TTL.
    pub async fn put_count(&self, count: i64) {
        if !self.is_enabled() {
            return;
        }
        if let Err(e) = self.try_put(count).await {
            warn!(error = %e, "Failed to cache available units count");
        }
    }

    /// Drops the cached count so the next read recomputes it.
    pub async fn evict(&self) {
        if !self.is_enabled() {
            return;
        }
        match self.try_evict().await {
            Ok(()) => debug!("Evicted available units count"),
            Err(e) => warn!(error = %e, "Failed to evict available units count"),
        }
    }

    /// Checks that Redis answers PING.
    pub async fn ping(&self) -> Result<(), CacheError> {
        let pool = self.pool.as_ref().ok_or(CacheError::Disabled)?;
        let mut conn = pool.get().await?;
        let _pong: String = redis::cmd("PING").query_async(&mut *conn).await?;
        Ok(())
    }

    async fn try_get(&self) -> Result<Option<i64>, CacheError> {
        let pool = self.pool.as_ref().ok_or(CacheError::Disabled)?;
        let mut conn = pool.get().await?;
        let value: Option<i64> = conn.get(AVAILABLE_UNITS_COUNT_KEY).await?;
        Ok(value)
    }

    async fn try_put(&self, count: i64) -> Result<(), CacheError> {
        let pool = self.pool.as_ref().ok_or(CacheError::Disabled)?;
        let mut conn = pool.get().await?;
        let _: () = conn
            .set_ex(AVAILABLE_UNITS_COUNT_KEY, count, self.ttl_secs)
            .await?;
        Ok(())
    }

    async fn try_evict(&self) -> Result<(), CacheError> {
        let pool = self.pool.as_ref().ok_or(CacheError::Disabled)?;
        let mut conn = pool.get().await?;
        let _: () = conn.del(AVAILABLE_UNITS_COUNT_KEY).await?;
        Ok(())
    }
}
