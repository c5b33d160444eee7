//! Integration tests for booking endpoints and lifecycle jobs.
//!
//! Tests cover:
//! - POST /api/v1/bookings (create, unit locking, conflicts)
//! - GET /api/v1/bookings/:id and /api/v1/bookings/user
//! - POST /api/v1/bookings/:id/confirm and /cancel
//! - expiry of unpaid bookings and completion after check-out

mod common;

use axum::http::{Method, StatusCode};
use booking_api::jobs::{CompletedBookingsJob, ExpiredBookingsJob, Job};
use common::{
    booking_payload, create_booking, create_test_app, create_test_pool, create_unit,
    empty_request, get_request, json_request, parse_response_body,
};
use persistence::cache::AvailabilityCache;
use persistence::repositories::EventRepository;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_booking_locks_unit() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let owner = Uuid::new_v4();
    let guest = Uuid::new_v4();

    let unit = create_unit(&app, owner).await;
    let unit_id = unit["id"].as_str().unwrap();
    let booking = create_booking(&app, unit_id, guest).await;

    assert_eq!(booking["status"], "PENDING_PAYMENT");
    assert_eq!(booking["userId"], guest.to_string());
    assert_eq!(booking["totalPrice"], unit["totalPrice"]);
    assert!(booking["paymentDeadline"].is_string());

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/units/{}", unit_id), owner))
        .await
        .unwrap();
    let unit = parse_response_body(response).await;
    assert_eq!(unit["available"], false);

    // The unit is no longer bookable, whatever the dates.
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/bookings",
            booking_payload(unit_id, 40, 2),
            Uuid::new_v4(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Unit is not available");
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_booking_for_unknown_unit() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/bookings",
            booking_payload(&Uuid::new_v4().to_string(), 5, 2),
            Uuid::new_v4(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_confirm_and_cancel_booking() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let guest = Uuid::new_v4();

    let unit = create_unit(&app, Uuid::new_v4()).await;
    let unit_id = unit["id"].as_str().unwrap().to_string();
    let booking = create_booking(&app, &unit_id, guest).await;
    let booking_id = booking["id"].as_str().unwrap();

    // Only the owner may confirm.
    let response = app
        .clone()
        .oneshot(empty_request(
            Method::POST,
            &format!("/api/v1/bookings/{}/confirm", booking_id),
            Uuid::new_v4(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(empty_request(
            Method::POST,
            &format!("/api/v1/bookings/{}/confirm", booking_id),
            guest,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "CONFIRMED");

    // A confirmed booking cannot be confirmed twice.
    let response = app
        .clone()
        .oneshot(empty_request(
            Method::POST,
            &format!("/api/v1/bookings/{}/confirm", booking_id),
            guest,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(empty_request(
            Method::POST,
            &format!("/api/v1/bookings/{}/cancel", booking_id),
            guest,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "CANCELLED");

    let response = app
        .clone()
        .oneshot(empty_request(
            Method::POST,
            &format!("/api/v1/bookings/{}/cancel", booking_id),
            guest,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Booking is already cancelled");

    // Cancelling released the unit.
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/units/{}", unit_id), guest))
        .await
        .unwrap();
    let unit = parse_response_body(response).await;
    assert_eq!(unit["available"], true);

    let events = EventRepository::new(pool)
        .find_by_entity(Uuid::parse_str(booking_id).unwrap())
        .await
        .unwrap();
    let types: Vec<_> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        types,
        vec!["BOOKING_CREATED", "BOOKING_CONFIRMED", "BOOKING_CANCELLED"]
    );
    assert!(events.iter().all(|e| e.user_id == guest));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_user_bookings_are_paged() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);
    let guest = Uuid::new_v4();

    for _ in 0..3 {
        let unit = create_unit(&app, Uuid::new_v4()).await;
        create_booking(&app, unit["id"].as_str().unwrap(), guest).await;
    }

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/bookings/user?page=0&size=2", guest))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["content"].as_array().unwrap().len(), 2);
    assert_eq!(body["totalElements"], 3);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["last"], false);

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/bookings/user", Uuid::new_v4()))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["content"].as_array().unwrap().len(), 0);
    assert_eq!(body["totalPages"], 1);

    // The largest page number is an empty last page.
    let response = app
        .oneshot(get_request(
            "/api/v1/bookings/user?page=4294967295&size=10",
            guest,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["content"].as_array().unwrap().len(), 0);
    assert_eq!(body["page"], 4294967295u64);
    assert_eq!(body["last"], true);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_get_missing_booking() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);

    let response = app
        .oneshot(get_request(
            &format!("/api/v1/bookings/{}", Uuid::new_v4()),
            Uuid::new_v4(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_expired_booking_is_cancelled_and_unit_released() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let guest = Uuid::new_v4();

    let unit = create_unit(&app, Uuid::new_v4()).await;
    let unit_id = unit["id"].as_str().unwrap().to_string();
    let booking = create_booking(&app, &unit_id, guest).await;
    let booking_id = Uuid::parse_str(booking["id"].as_str().unwrap()).unwrap();

    sqlx::query("UPDATE bookings SET payment_deadline = NOW() - INTERVAL '1 minute' WHERE id = $1")
        .bind(booking_id)
        .execute(&pool)
        .await
        .unwrap();

    let job = ExpiredBookingsJob::new(pool.clone(), AvailabilityCache::disabled(), 60);
    job.execute().await.unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/bookings/{}", booking_id), guest))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "CANCELLED");

    let response = app
        .oneshot(get_request(&format!("/api/v1/units/{}", unit_id), guest))
        .await
        .unwrap();
    let unit = parse_response_body(response).await;
    assert_eq!(unit["available"], true);

    // The expiry is attributed to the booking owner.
    let events = EventRepository::new(pool)
        .find_by_entity(booking_id)
        .await
        .unwrap();
    let types: Vec<_> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types, vec!["BOOKING_CREATED", "BOOKING_EXPIRED"]);
    assert!(events.iter().all(|e| e.user_id == guest));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_checked_out_booking_is_completed_and_unit_released() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let guest = Uuid::new_v4();

    let unit = create_unit(&app, Uuid::new_v4()).await;
    let unit_id = unit["id"].as_str().unwrap().to_string();
    let booking = create_booking(&app, &unit_id, guest).await;
    let booking_id = Uuid::parse_str(booking["id"].as_str().unwrap()).unwrap();

    let response = app
        .clone()
        .oneshot(empty_request(
            Method::POST,
            &format!("/api/v1/bookings/{}/confirm", booking_id),
            guest,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    sqlx::query(
        "UPDATE bookings SET check_in_date = NOW() - INTERVAL '3 days', \
         check_out_date = NOW() - INTERVAL '1 minute' WHERE id = $1",
    )
    .bind(booking_id)
    .execute(&pool)
    .await
    .unwrap();

    let job = CompletedBookingsJob::new(pool.clone(), AvailabilityCache::disabled(), 300);
    job.execute().await.unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/bookings/{}", booking_id), guest))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "COMPLETED");

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/units/{}", unit_id), guest))
        .await
        .unwrap();
    let unit = parse_response_body(response).await;
    assert_eq!(unit["available"], true);

    let response = app
        .oneshot(empty_request(
            Method::POST,
            &format!("/api/v1/bookings/{}/cancel", booking_id),
            guest,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Completed bookings cannot be cancelled");

    let events = EventRepository::new(pool)
        .find_by_entity(booking_id)
        .await
        .unwrap();
    let types: Vec<_> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        types,
        vec!["BOOKING_CREATED", "BOOKING_CONFIRMED", "BOOKING_COMPLETED"]
    );
    assert!(events.iter().all(|e| e.user_id == guest));
}
