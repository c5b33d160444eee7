//! Unit entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{AccommodationType, Unit};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use super::parse_column;

/// Database row mapping for the units table.
#[derive(Debug, Clone, FromRow)]
pub struct UnitEntity {
    pub id: Uuid,
    pub number_of_rooms: i32,
    pub accommodation_type: String,
    pub floor: i32,
    pub base_price: Decimal,
    pub total_price: Decimal,
    pub description: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UnitEntity {
    /// Convert to domain model.
    pub fn into_domain(self) -> Unit {
        let accommodation_type = parse_column(
            &self.accommodation_type,
            "accommodation_type",
            self.id,
            AccommodationType::Flat,
        );

        Unit {
            id: self.id,
            number_of_rooms: self.number_of_rooms,
            accommodation_type,
            floor: self.floor,
            base_price: self.base_price,
            total_price: self.total_price,
            description: self.description,
            available: self.available,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<UnitEntity> for Unit {
    fn from(entity: UnitEntity) -> Self {
        entity.into_domain()
    }
}
