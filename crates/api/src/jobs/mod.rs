//! Background job scheduler and job implementations.

mod booking_lifecycle;
mod cache_recovery;
mod pool_metrics;
mod scheduler;

pub use booking_lifecycle::{CompletedBookingsJob, ExpiredBookingsJob};
pub use cache_recovery::CacheRecoveryJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
