use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use persistence::cache::AvailabilityCache;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, security_headers_middleware, trace_id};
use crate::routes::{bookings, health, openapi, payments, units, users};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub cache: AvailabilityCache,
}

pub fn create_app(config: Config, pool: PgPool, cache: AvailabilityCache) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        cache,
    };

    let cors = if config.security.cors_origins.is_empty() {
        // Development: allow any origin
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let unit_routes = Router::new()
        .route("/api/v1/units", post(units::create_unit))
        .route("/api/v1/units/search", post(units::search_units))
        .route(
            "/api/v1/units/available/count",
            get(units::available_units_count),
        )
        .route(
            "/api/v1/units/:id",
            get(units::get_unit)
                .put(units::update_unit)
                .delete(units::delete_unit),
        );

    let booking_routes = Router::new()
        .route("/api/v1/bookings", post(bookings::create_booking))
        .route("/api/v1/bookings/user", get(bookings::get_user_bookings))
        .route("/api/v1/bookings/:id", get(bookings::get_booking))
        .route(
            "/api/v1/bookings/:id/confirm",
            post(bookings::confirm_booking),
        )
        .route("/api/v1/bookings/:id/cancel", post(bookings::cancel_booking));

    let payment_routes = Router::new()
        .route("/api/v1/payments", post(payments::create_payment))
        .route("/api/v1/payments/:id", get(payments::get_payment))
        .route(
            "/api/v1/payments/:id/status",
            put(payments::update_payment_status),
        )
        .route(
            "/api/v1/payments/:id/process",
            post(payments::process_payment),
        )
        .route("/api/v1/payments/:id/refund", post(payments::refund_payment))
        .route(
            "/api/v1/payments/booking/:booking_id",
            get(payments::get_payments_by_booking),
        )
        .route(
            "/api/v1/payments/booking/:booking_id/cancel",
            post(payments::cancel_pending_payments),
        );

    let user_routes = Router::new()
        .route(
            "/api/v1/users",
            post(users::create_user).get(users::list_users),
        )
        .route(
            "/api/v1/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let openapi_routes = Router::new()
        .route("/api/docs", get(openapi::swagger_ui_redirect))
        .route("/api/docs/", get(openapi::swagger_ui))
        .route("/api/docs/openapi.yaml", get(openapi::openapi_spec))
        .route("/api/docs/*path", get(openapi::swagger_ui));

    Router::new()
        .merge(public_routes)
        .merge(openapi_routes)
        .merge(unit_routes)
        .merge(booking_routes)
        .merge(payment_routes)
        .merge(user_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            config.security.hsts_enabled,
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
