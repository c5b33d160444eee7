//! Unit repository for database operations.

use domain::models::{AccommodationType, UnitSearchRequest};
use domain::services::audit_helpers;
use rust_decimal::Decimal;
use shared::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use super::UNIT_COLUMNS;
use crate::entities::UnitEntity;
use crate::metrics::QueryTimer;
use crate::repositories::EventRepository;

/// Input data for inserting or replacing a unit.
#[derive(Debug, Clone)]
pub struct UnitInput {
    pub number_of_rooms: i32,
    pub accommodation_type: AccommodationType,
    pub floor: i32,
    pub base_price: Decimal,
    pub total_price: Decimal,
    pub description: String,
}

/// Repository for unit database operations.
#[derive(Clone)]
pub struct UnitRepository {
    pool: PgPool,
}

impl UnitRepository {
    /// Creates a new UnitRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an available unit and its UNIT_CREATED event.
    pub async fn create(&self, input: &UnitInput, actor: Uuid) -> Result<UnitEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_unit");
        let mut tx = self.pool.begin().await?;

        let unit = sqlx::query_as::<_, UnitEntity>(&format!(
            r#"
            INSERT INTO units (number_of_rooms, accommodation_type, floor, base_price, total_price, description, available)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE)
            RETURNING {}
            "#,
            UNIT_COLUMNS
        ))
        .bind(input.number_of_rooms)
        .bind(input.accommodation_type.as_str())
        .bind(input.floor)
        .bind(input.base_price)
        .bind(input.total_price)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await?;

        EventRepository::record_in(&mut tx, &audit_helpers::unit_created(actor, unit.id)).await?;

        tx.commit().await?;
        timer.record();
        Ok(unit)
    }

    /// Find unit by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UnitEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_unit_by_id");
        let result = sqlx::query_as::<_, UnitEntity>(&format!(
            "SELECT {} FROM units WHERE id = $1",
            UNIT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replaces the descriptive fields of a unit. Availability is untouched.
    ///
    /// Returns `None` if the unit does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: &UnitInput,
        actor: Uuid,
    ) -> Result<Option<UnitEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_unit");
        let mut tx = self.pool.begin().await?;

        let unit = sqlx::query_as::<_, UnitEntity>(&format!(
            r#"
            UPDATE units
            SET number_of_rooms = $2,
                accommodation_type = $3,
                floor = $4,
                base_price = $5,
                total_price = $6,
                description = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            UNIT_COLUMNS
        ))
        .bind(id)
        .bind(input.number_of_rooms)
        .bind(input.accommodation_type.as_str())
        .bind(input.floor)
        .bind(input.base_price)
        .bind(input.total_price)
        .bind(&input.description)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(unit) = unit else {
            timer.record();
            return Ok(None);
        };

        EventRepository::record_in(&mut tx, &audit_helpers::unit_updated(actor, unit.id)).await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(unit))
    }

    /// Deletes a unit (bookings and payments cascade). Returns false if it
    /// did not exist.
    pub async fn delete(&self, id: Uuid, actor: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_unit");
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        if deleted {
            EventRepository::record_in(&mut tx, &audit_helpers::unit_deleted(actor, id)).await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(deleted)
    }

    /// Deletes a batch of units without recording events.
    pub async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_units_batch");
        let result = sqlx::query("DELETE FROM units WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }

    /// Counts units currently flagged as available.
    pub async fn count_available(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_available_units");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM units WHERE available = TRUE")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Searches available units.
    ///
    /// Price bounds apply to the total price. When the request carries both a
    /// check-in and a check-out date, units with an active booking
    /// intersecting that window are excluded. Returns the page and the total
    /// match count.
    pub async fn search(
        &self,
        query: &UnitSearchRequest,
        page: PageRequest,
    ) -> Result<(Vec<UnitEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("search_units");

        // Unparseable sort options are rejected before we get here; fall
        // back to the default ordering rather than fail the query.
        let (sort_column, sort_direction) = query
            .sort()
            .map(|(field, direction)| (field.column(), direction.as_sql()))
            .unwrap_or(("created_at", "DESC"));

        let mut conditions = vec!["u.available = TRUE".to_string()];
        let mut param_count = 0;

        if query.number_of_rooms.is_some() {
            param_count += 1;
            conditions.push(format!("u.number_of_rooms = ${}", param_count));
        }
        if query.accommodation_type.is_some() {
            param_count += 1;
            conditions.push(format!("u.accommodation_type = ${}", param_count));
        }
        if query.floor.is_some() {
            param_count += 1;
            conditions.push(format!("u.floor = ${}", param_count));
        }
        if query.min_price.is_some() {
            param_count += 1;
            conditions.push(format!("u.total_price >= ${}", param_count));
        }
        if query.max_price.is_some() {
            param_count += 1;
            conditions.push(format!("u.total_price <= ${}", param_count));
        }
        let window = query.stay_window();
        if window.is_some() {
            conditions.push(format!(
                r#"NOT EXISTS (
                    SELECT 1 FROM bookings b
                    WHERE b.unit_id = u.id
                      AND b.status IN ('CONFIRMED', 'PENDING_PAYMENT')
                      AND b.check_in_date <= ${}
                      AND b.check_out_date >= ${}
                )"#,
                param_count + 1,
                param_count + 2
            ));
            param_count += 2;
        }

        let where_clause = conditions.join(" AND ");

        // Count query
        let count_sql = format!("SELECT COUNT(*) FROM units u WHERE {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(rooms) = query.number_of_rooms {
            count_query = count_query.bind(rooms);
        }
        if let Some(kind) = query.accommodation_type {
            count_query = count_query.bind(kind.as_str());
        }
        if let Some(floor) = query.floor {
            count_query = count_query.bind(floor);
        }
        if let Some(min) = query.min_price {
            count_query = count_query.bind(min);
        }
        if let Some(max) = query.max_price {
            count_query = count_query.bind(max);
        }
        if let Some((check_in, check_out)) = window {
            count_query = count_query.bind(check_out).bind(check_in);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        // List query
        let list_sql = format!(
            r#"
            SELECT {}
            FROM units u
            WHERE {}
            ORDER BY u.{} {}, u.id
            LIMIT ${} OFFSET ${}
            "#,
            UNIT_COLUMNS,
            where_clause,
            sort_column,
            sort_direction,
            param_count + 1,
            param_count + 2
        );
        let mut list_query = sqlx::query_as::<_, UnitEntity>(&list_sql);
        if let Some(rooms) = query.number_of_rooms {
            list_query = list_query.bind(rooms);
        }
        if let Some(kind) = query.accommodation_type {
            list_query = list_query.bind(kind.as_str());
        }
        if let Some(floor) = query.floor {
            list_query = list_query.bind(floor);
        }
        if let Some(min) = query.min_price {
            list_query = list_query.bind(min);
        }
        if let Some(max) = query.max_price {
            list_query = list_query.bind(max);
        }
        if let Some((check_in, check_out)) = window {
            list_query = list_query.bind(check_out).bind(check_in);
        }
        let units = list_query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((units, total))
    }
}
