//! User endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{User, UserRequest, UserResponse, UserRole};
use persistence::entities::UserEntity;
use persistence::repositories::{UserInput, UserRepository};
use shared::pagination::{PageRequest, PageResponse};
use shared::password::hash_password;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

fn to_response(entity: UserEntity) -> UserResponse {
    User::from(entity).into()
}

fn email_taken() -> ApiError {
    ApiError::Conflict("User with this email already exists".to_string())
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// Hashing is CPU-bound, keep it off the async workers.
async fn hash(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Register a user.
///
/// POST /api/v1/users
///
/// The requested role is ignored; new accounts are always USER.
/// Returns 409 if the email is already registered.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<UserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    if repo.exists_by_email(&request.email).await? {
        return Err(email_taken());
    }

    let input = UserInput {
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
        password_hash: hash(request.password).await?,
        phone_number: request.phone_number,
        role: UserRole::User,
    };
    // Unique index still guards against a concurrent registration.
    let user = repo.create(&input).await.map_err(|e| match ApiError::from(e) {
        ApiError::Conflict(_) => email_taken(),
        other => other,
    })?;

    info!(user_id = %user.id, "User created");

    Ok((StatusCode::CREATED, Json(to_response(user))))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(to_response(user)))
}

/// Replace a user's profile and password.
///
/// PUT /api/v1/users/:id
///
/// Returns 409 if the new email belongs to another user.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let existing = repo.find_by_id(id).await?.ok_or_else(user_not_found)?;

    let email_changed = !existing.email.eq_ignore_ascii_case(&request.email);
    if email_changed && repo.exists_by_email(&request.email).await? {
        return Err(email_taken());
    }

    let input = UserInput {
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
        password_hash: hash(request.password).await?,
        phone_number: request.phone_number,
        role: existing.role(),
    };
    let user = repo
        .update(id, &input)
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => email_taken(),
            other => other,
        })?
        .ok_or_else(user_not_found)?;

    info!(user_id = %id, "User updated");

    Ok(Json(to_response(user)))
}

/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !UserRepository::new(state.pool.clone()).delete(id).await? {
        return Err(user_not_found());
    }

    info!(user_id = %id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users?page=0&size=10
pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<UserResponse>>, ApiError> {
    let page = page.normalized();
    let (users, total) = UserRepository::new(state.pool.clone()).list(page).await?;

    let content = users.into_iter().map(to_response).collect();
    Ok(Json(PageResponse::new(content, page, total)))
}
