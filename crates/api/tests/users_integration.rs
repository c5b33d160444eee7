//! Integration tests for user endpoints.
//!
//! Tests cover:
//! - POST /api/v1/users (create, duplicate email)
//! - GET/PUT/DELETE /api/v1/users/:id
//! - GET /api/v1/users (paged list)

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, create_test_pool, empty_request, get_request, json_request,
    parse_response_body, user_payload,
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_user_and_reject_duplicate_email() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);
    let actor = Uuid::new_v4();

    let mut payload = user_payload();
    payload["role"] = json!("ADMIN");
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/v1/users", payload.clone(), actor))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert_eq!(body["email"], payload["email"]);
    assert_eq!(body["role"], "USER");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    let response = app
        .oneshot(json_request(Method::POST, "/api/v1/users", payload, actor))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "User with this email already exists");
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_update_and_delete_user() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);
    let actor = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/v1/users", user_payload(), actor))
        .await
        .unwrap();
    let user = parse_response_body(response).await;
    let uri = format!("/api/v1/users/{}", user["id"].as_str().unwrap());

    let mut update = user_payload();
    update["email"] = user["email"].clone();
    update["firstName"] = json!("Renamed");
    let response = app
        .clone()
        .oneshot(json_request(Method::PUT, &uri, update, actor))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["firstName"], "Renamed");
    assert_eq!(body["role"], "USER");

    let response = app
        .clone()
        .oneshot(empty_request(Method::DELETE, &uri, actor))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get_request(&uri, actor)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_update_user_to_taken_email() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);
    let actor = Uuid::new_v4();

    let first = user_payload();
    app.clone()
        .oneshot(json_request(Method::POST, "/api/v1/users", first.clone(), actor))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/v1/users", user_payload(), actor))
        .await
        .unwrap();
    let second = parse_response_body(response).await;

    let mut update = user_payload();
    update["email"] = first["email"].clone();
    let response = app
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/v1/users/{}", second["id"].as_str().unwrap()),
            update,
            actor,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_list_users_is_paged() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool);
    let actor = Uuid::new_v4();

    for _ in 0..2 {
        app.clone()
            .oneshot(json_request(Method::POST, "/api/v1/users", user_payload(), actor))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(get_request("/api/v1/users?page=0&size=1", actor))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["content"].as_array().unwrap().len(), 1);
    assert_eq!(body["size"], 1);
    assert!(body["totalElements"].as_i64().unwrap() >= 2);
}
