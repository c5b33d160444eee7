//! User repository for database operations.

use domain::models::UserRole;
use domain::services::audit_helpers;
use shared::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;
use crate::repositories::EventRepository;

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, password_hash, phone_number, role, created_at, updated_at";

/// Input data for inserting or replacing a user.
#[derive(Debug, Clone)]
pub struct UserInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a user and its USER_CREATED event.
    ///
    /// A duplicate email surfaces as a unique violation (23505).
    pub async fn create(&self, input: &UserInput) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (email, first_name, last_name, password_hash, phone_number, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.password_hash)
        .bind(input.phone_number.as_deref())
        .bind(input.role.as_str())
        .fetch_one(&mut *tx)
        .await?;

        EventRepository::record_in(&mut tx, &audit_helpers::user_created(user.id)).await?;

        tx.commit().await?;
        timer.record();
        Ok(user)
    }

    /// Find user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether any user already uses `email` (case-insensitive).
    pub async fn exists_by_email(&self, email: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("exists_user_by_email");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replaces a user's profile. The role is never changed here.
    pub async fn update(&self, id: Uuid, input: &UserInput) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user");
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users
            SET email = $2,
                first_name = $3,
                last_name = $4,
                password_hash = $5,
                phone_number = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.password_hash)
        .bind(input.phone_number.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(user) = &user {
            EventRepository::record_in(&mut tx, &audit_helpers::user_updated(user.id)).await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(user)
    }

    /// Deletes a user. Returns false if it did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_user");
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        if deleted {
            EventRepository::record_in(&mut tx, &audit_helpers::user_deleted(id)).await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(deleted)
    }

    /// Lists users ordered by creation time, with the total count.
    pub async fn list(&self, page: PageRequest) -> Result<(Vec<UserEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_users");

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let users = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users ORDER BY created_at, id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        timer.record();
        Ok((users, total))
    }
}
