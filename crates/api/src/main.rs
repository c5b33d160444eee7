use std::time::Duration;

use anyhow::Result;
use booking_api::{
    app,
    config::Config,
    jobs::{
        CacheRecoveryJob, CompletedBookingsJob, ExpiredBookingsJob, JobScheduler, PoolMetricsJob,
    },
    middleware::{init_metrics, logging::init_logging},
    services::UnitGenerator,
};
use persistence::cache::{create_redis_pool, AvailabilityCache};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    init_logging(&config.logging)?;
    init_metrics()?;

    info!("Starting Booking Service v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.pool_config()).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    let cache = match config.redis_config() {
        Some(redis) => match create_redis_pool(&redis) {
            Ok(redis_pool) => {
                info!("Availability cache enabled");
                AvailabilityCache::new(redis_pool, config.cache_ttl())
            }
            Err(e) => {
                warn!(error = %e, "Invalid Redis configuration, caching disabled");
                AvailabilityCache::disabled()
            }
        },
        None => {
            info!("Redis URL not configured, caching disabled");
            AvailabilityCache::disabled()
        }
    };

    let generator = UnitGenerator::new(pool.clone(), config.booking.markup_percent);
    let generated_units = if config.data_initializer.enabled {
        generator
            .generate(config.data_initializer.number_of_units as usize)
            .await?
    } else {
        info!("Data initializer is disabled");
        Vec::new()
    };

    let mut scheduler = JobScheduler::new();
    scheduler.register(ExpiredBookingsJob::new(
        pool.clone(),
        cache.clone(),
        config.booking.expiry_check_secs,
    ));
    scheduler.register(CompletedBookingsJob::new(
        pool.clone(),
        cache.clone(),
        config.booking.completion_check_secs,
    ));
    scheduler.register(CacheRecoveryJob::new(
        pool.clone(),
        cache.clone(),
        config.cache.recovery_interval_secs,
    ));
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    scheduler.start();

    let addr = config.socket_addr()?;
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    let cleanup_on_shutdown = config.data_initializer.cleanup_on_shutdown;

    let app = app::create_app(config, pool, cache);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(shutdown_timeout).await;

    if cleanup_on_shutdown {
        if let Err(e) = generator.cleanup(&generated_units).await {
            error!(error = %e, "Failed to remove generated units");
        }
    } else if !generated_units.is_empty() {
        info!("Cleanup on shutdown is disabled");
    }

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
