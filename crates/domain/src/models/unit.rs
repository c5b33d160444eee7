//! Accommodation unit domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ============================================================================
// Accommodation Type Enum
// ============================================================================

/// Kind of accommodation a unit offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccommodationType {
    Home,
    Flat,
    Apartments,
}

impl AccommodationType {
    pub const ALL: [AccommodationType; 3] = [
        AccommodationType::Home,
        AccommodationType::Flat,
        AccommodationType::Apartments,
    ];

    /// Returns the string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccommodationType::Home => "HOME",
            AccommodationType::Flat => "FLAT",
            AccommodationType::Apartments => "APARTMENTS",
        }
    }
}

impl fmt::Display for AccommodationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AccommodationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HOME" => Ok(AccommodationType::Home),
            "FLAT" => Ok(AccommodationType::Flat),
            "APARTMENTS" => Ok(AccommodationType::Apartments),
            _ => Err(format!(
                "Invalid accommodation type: {}. Must be one of: HOME, FLAT, APARTMENTS",
                s
            )),
        }
    }
}

// ============================================================================
// Core Model
// ============================================================================

/// A bookable accommodation unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Uuid,
    pub number_of_rooms: i32,
    #[serde(rename = "type")]
    pub accommodation_type: AccommodationType,
    pub floor: i32,
    pub base_price: Decimal,
    pub total_price: Decimal,
    pub description: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request payload for creating or replacing a unit.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_unit_request"))]
pub struct UnitRequest {
    #[validate(range(min = 1, message = "Number of rooms must be at least 1"))]
    pub number_of_rooms: i32,

    #[serde(rename = "type")]
    pub accommodation_type: AccommodationType,

    #[validate(range(min = 0, message = "Floor must be 0 or greater"))]
    pub floor: i32,

    pub base_price: Decimal,

    #[validate(length(
        min = 10,
        max = 1000,
        message = "Description must be between 10 and 1000 characters"
    ))]
    pub description: String,
}

fn validate_unit_request(request: &UnitRequest) -> Result<(), ValidationError> {
    if request.base_price < Decimal::ZERO {
        return Err(ValidationError::new("base_price_range")
            .with_message("Base price must be 0 or greater".into()));
    }
    Ok(())
}

/// Columns a unit search may sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSortField {
    CreatedAt,
    UpdatedAt,
    TotalPrice,
    BasePrice,
    Floor,
    NumberOfRooms,
}

impl UnitSortField {
    /// Column name in the `units` table.
    pub fn column(&self) -> &'static str {
        match self {
            UnitSortField::CreatedAt => "created_at",
            UnitSortField::UpdatedAt => "updated_at",
            UnitSortField::TotalPrice => "total_price",
            UnitSortField::BasePrice => "base_price",
            UnitSortField::Floor => "floor",
            UnitSortField::NumberOfRooms => "number_of_rooms",
        }
    }
}

impl std::str::FromStr for UnitSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(UnitSortField::CreatedAt),
            "updatedAt" => Ok(UnitSortField::UpdatedAt),
            "totalPrice" => Ok(UnitSortField::TotalPrice),
            "basePrice" => Ok(UnitSortField::BasePrice),
            "floor" => Ok(UnitSortField::Floor),
            "numberOfRooms" => Ok(UnitSortField::NumberOfRooms),
            _ => Err(format!(
                "Invalid sortBy: {}. Must be one of: createdAt, updatedAt, totalPrice, basePrice, floor, numberOfRooms",
                s
            )),
        }
    }
}

/// Sort direction for searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sortDirection: {}. Must be ASC or DESC", s)),
        }
    }
}

/// Request payload for `POST /api/v1/units/search`.
///
/// Every filter is optional. When both dates are present, units with an
/// active booking intersecting `[checkInDate, checkOutDate]` are excluded.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UnitSearchRequest {
    pub number_of_rooms: Option<i32>,
    #[serde(rename = "type")]
    pub accommodation_type: Option<AccommodationType>,
    pub floor: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub check_in_date: Option<DateTime<Utc>>,
    pub check_out_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_search_size")]
    #[validate(range(min = 1, max = 100, message = "size must be between 1 and 100"))]
    pub size: u32,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_direction")]
    pub sort_direction: String,
}

fn default_search_size() -> u32 {
    shared::pagination::DEFAULT_PAGE_SIZE
}

fn default_sort_by() -> String {
    "createdAt".to_string()
}

fn default_sort_direction() -> String {
    "DESC".to_string()
}

impl Default for UnitSearchRequest {
    fn default() -> Self {
        Self {
            number_of_rooms: None,
            accommodation_type: None,
            floor: None,
            min_price: None,
            max_price: None,
            check_in_date: None,
            check_out_date: None,
            page: 0,
            size: default_search_size(),
            sort_by: default_sort_by(),
            sort_direction: default_sort_direction(),
        }
    }
}

impl UnitSearchRequest {
    /// Parses the sort options, rejecting unknown columns or directions.
    pub fn sort(&self) -> Result<(UnitSortField, SortDirection), String> {
        Ok((self.sort_by.parse()?, self.sort_direction.parse()?))
    }

    /// Date window to check for conflicts, only when both ends are given.
    pub fn stay_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.check_in_date, self.check_out_date) {
            (Some(check_in), Some(check_out)) => Some((check_in, check_out)),
            _ => None,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Unit as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitResponse {
    pub id: Uuid,
    pub number_of_rooms: i32,
    #[serde(rename = "type")]
    pub accommodation_type: AccommodationType,
    pub floor: i32,
    pub base_price: Decimal,
    pub total_price: Decimal,
    pub description: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Unit> for UnitResponse {
    fn from(unit: Unit) -> Self {
        Self {
            id: unit.id,
            number_of_rooms: unit.number_of_rooms,
            accommodation_type: unit.accommodation_type,
            floor: unit.floor,
            base_price: unit.base_price,
            total_price: unit.total_price,
            description: unit.description,
            available: unit.available,
            created_at: unit.created_at,
            updated_at: unit.updated_at,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
