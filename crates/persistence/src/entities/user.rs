//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{User, UserRole};
use sqlx::FromRow;
use uuid::Uuid;

use super::parse_column;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    /// Stored role; unknown values read as `USER`.
    pub fn role(&self) -> UserRole {
        parse_column(&self.role, "role", self.id, UserRole::default())
    }

    /// Convert to domain model.
    pub fn into_domain(self) -> User {
        let role = self.role();
        User {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            password_hash: self.password_hash,
            phone_number: self.phone_number,
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        entity.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        let entity = UserEntity {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            password_hash: "$argon2id$".to_string(),
            phone_number: None,
            role: "ADMIN".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(entity.role(), UserRole::Admin);
        assert_eq!(entity.clone().into_domain().role, UserRole::Admin);

        let unknown = UserEntity {
            role: "GUEST".to_string(),
            ..entity
        };
        assert_eq!(unknown.into_domain().role, UserRole::User);
    }
}
